//! Prompt templates for classification and reply drafting.

/// Characters of the original email quoted in the productive-reply prompt.
pub const PRODUCTIVE_EXCERPT_CHARS: usize = 100;

/// Build the classification prompt. The email is embedded verbatim between
/// `---` delimiter lines.
pub fn classification_prompt(email_text: &str) -> String {
    format!(
        "\
Você é um classificador de emails para uma grande instituição financeira.
Classifique o email a seguir estritamente em uma das duas categorias: 'Produtivo' ou 'Improdutivo'.
- 'Produtivo': Requer uma ação imediata (suporte, atualização de status, dúvida sobre o sistema).
- 'Improdutivo': Não requer ação (felicitação, agradecimento, mensagem não relevante).

Email a classificar:
---
{email_text}
---
Responda apenas com a palavra da categoria (ex: Produtivo ou Improdutivo)."
    )
}

/// Build the reply prompt for a productive email.
///
/// Only the first [`PRODUCTIVE_EXCERPT_CHARS`] characters of the email are
/// quoted, followed by an ellipsis.
pub fn productive_reply_prompt(email_text: &str) -> String {
    let excerpt = excerpt(email_text, PRODUCTIVE_EXCERPT_CHARS);
    format!(
        "\
O email abaixo foi classificado como 'Produtivo'.
Gere uma resposta automática profissional e empática para o cliente de uma instituição financeira. A resposta deve:
1. Confirmar o recebimento da solicitação.
2. Informar que a equipe irá iniciar a análise e responder em breve.
3. Ser concisa (máximo de 3 frases).

Email original: \"{excerpt}...\""
    )
}

/// Reply prompt for an unproductive email. The email itself is not quoted.
pub const UNPRODUCTIVE_REPLY_PROMPT: &str = "\
O email foi classificado como 'Improdutivo'.
Gere uma resposta automática breve e cordial, agradecendo pela mensagem e desejando o mesmo \
(Ex: 'Agradecemos a gentileza e desejamos um ótimo final de ano!'). \
A resposta deve ter no máximo 2 frases.";

/// First `max_chars` characters of `text`, never splitting a character.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
