//! Reply drafting for classified emails.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::llm::provider::{CompletionRequest, LlmProvider};

use super::category::Category;
use super::prompts::{UNPRODUCTIVE_REPLY_PROMPT, productive_reply_prompt};

/// Returned when no LLM client is configured.
pub const RESPONSE_INIT_ERROR: &str = "Não foi possível gerar a resposta devido a um erro na API.";
/// Returned when the provider rejects the reply call.
pub const RESPONSE_API_ERROR: &str = "Erro na Geração de Resposta (API)";
/// Returned when the reply call fails for any other reason.
pub const RESPONSE_UNEXPECTED_ERROR: &str = "Erro Inesperado";
/// Returned for categories that have no reply template.
pub const UNKNOWN_CATEGORY_REPLY: &str = "Categoria desconhecida para gerar resposta.";

/// Drafts a short reply suited to an email's category.
#[derive(Clone)]
pub struct Responder {
    llm: Option<Arc<dyn LlmProvider>>,
}

impl Responder {
    /// Create a responder. `None` means no credential was configured.
    pub fn new(llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { llm }
    }

    pub async fn generate_response(&self, category: Category, email_text: &str) -> String {
        let Some(llm) = self.llm.as_ref() else {
            warn!("Reply generation skipped: LLM client is not configured");
            return RESPONSE_INIT_ERROR.to_string();
        };

        let Some(prompt) = reply_prompt(category, email_text) else {
            debug!(%category, "No reply template for category");
            return UNKNOWN_CATEGORY_REPLY.to_string();
        };

        match llm.complete(CompletionRequest::new(prompt)).await {
            Ok(response) => response.content.trim().to_string(),
            Err(e) if e.is_provider_error() => {
                error!(error = %e, %category, "API error during reply generation");
                RESPONSE_API_ERROR.to_string()
            }
            Err(e) => {
                error!(error = %e, %category, "Unexpected error during reply generation");
                RESPONSE_UNEXPECTED_ERROR.to_string()
            }
        }
    }
}

/// Prompt for the category, or `None` if it has no reply template.
fn reply_prompt(category: Category, email_text: &str) -> Option<String> {
    match category {
        Category::Productive => Some(productive_reply_prompt(email_text)),
        Category::Unproductive => Some(UNPRODUCTIVE_REPLY_PROMPT.to_string()),
        _ => None,
    }
}
