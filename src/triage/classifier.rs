//! Email classifier. Asks the LLM for one of the two category words.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::llm::provider::{CompletionRequest, LlmProvider};

use super::category::Category;
use super::prompts::classification_prompt;

/// Classifies email text as productive or unproductive.
///
/// Failures never escape: they are logged and mapped to a sentinel
/// [`Category`].
#[derive(Clone)]
pub struct Classifier {
    llm: Option<Arc<dyn LlmProvider>>,
}

impl Classifier {
    /// Create a classifier. `None` means no credential was configured.
    pub fn new(llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { llm }
    }

    pub async fn classify(&self, email_text: &str) -> Category {
        let Some(llm) = self.llm.as_ref() else {
            warn!("Classification skipped: LLM client is not configured");
            return Category::InitializationError;
        };

        let request = CompletionRequest::new(classification_prompt(email_text));

        match llm.complete(request).await {
            Ok(response) => {
                let category = Category::from_model_output(&response.content);
                if category == Category::Unproductive
                    && !response.content.trim().eq_ignore_ascii_case(category.as_str())
                {
                    warn!(
                        raw = %response.content,
                        "Unrecognized classification output, defaulting to {category}"
                    );
                }
                debug!(%category, "Email classified");
                category
            }
            Err(e) if e.is_provider_error() => {
                error!(error = %e, "API error during classification");
                Category::ApiError
            }
            Err(e) => {
                error!(error = %e, "Unexpected error during classification");
                Category::UnexpectedError
            }
        }
    }
}
