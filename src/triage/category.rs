//! Email categories and the error sentinels that share their channel.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of classifying an email.
///
/// Only `Productive` and `Unproductive` are real classifications; the other
/// variants are sentinels returned through the same field. The wire form is
/// always one of the fixed strings from [`Category::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    /// Needs action (support request, status update, question).
    Productive,
    /// Needs no action (greetings, thanks, irrelevant messages).
    Unproductive,
    /// No API credential was configured.
    InitializationError,
    /// The provider rejected the classification call.
    ApiError,
    /// The classification call failed for any other reason.
    UnexpectedError,
    /// The request carried no text to classify.
    InvalidInput,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Productive,
        Category::Unproductive,
        Category::InitializationError,
        Category::ApiError,
        Category::UnexpectedError,
        Category::InvalidInput,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Productive => "Produtivo",
            Category::Unproductive => "Improdutivo",
            Category::InitializationError => "Erro de Inicialização da API",
            Category::ApiError => "Erro na Classificação (API)",
            Category::UnexpectedError => "Erro Inesperado",
            Category::InvalidInput => "Erro",
        }
    }

    /// Parse one of the fixed wire strings.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// True for the two business labels.
    pub fn is_classification(self) -> bool {
        matches!(self, Category::Productive | Category::Unproductive)
    }

    /// Interpret raw model output.
    ///
    /// Trims and capitalizes the text, then accepts it only if it is one of
    /// the two business labels. Anything else is `Unproductive`.
    pub fn from_model_output(raw: &str) -> Self {
        match Self::from_label(&capitalize(raw.trim())) {
            Some(category) if category.is_classification() => category,
            _ => Category::Unproductive,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Category::from_label(&value).ok_or_else(|| format!("unknown category: {value:?}"))
    }
}

/// First character uppercased, the rest lowercased.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
