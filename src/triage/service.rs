//! Request orchestration: validate, classify, then draft a reply.

use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::llm::provider::LlmProvider;

use super::category::Category;
use super::classifier::Classifier;
use super::responder::Responder;
use super::types::ClassificationResult;

/// Reply returned when the request carries no text.
pub const EMPTY_INPUT_REPLY: &str = "Por favor, insira o texto do email.";

/// Runs the classify → respond flow for one email.
///
/// Holds no mutable state; clone it freely across request handlers.
#[derive(Clone)]
pub struct TriageService {
    classifier: Classifier,
    responder: Responder,
    llm_configured: bool,
}

impl TriageService {
    /// Build the service around one shared provider. `None` means no
    /// credential was configured; every request then yields the
    /// initialization sentinels.
    pub fn new(llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            llm_configured: llm.is_some(),
            classifier: Classifier::new(llm.clone()),
            responder: Responder::new(llm),
        }
    }

    /// Whether an LLM client is available.
    pub fn llm_configured(&self) -> bool {
        self.llm_configured
    }

    /// Classify the email and draft a reply.
    ///
    /// Never fails: every error condition is reported through the returned
    /// category and reply strings.
    pub async fn process(&self, email_text: &str) -> ClassificationResult {
        let request_id = Uuid::new_v4();
        let span = info_span!("triage", %request_id);

        async move {
            let email_text = email_text.trim();
            if email_text.is_empty() {
                debug!("Rejecting empty email text");
                return ClassificationResult {
                    category: Category::InvalidInput,
                    response_suggestion: EMPTY_INPUT_REPLY.to_string(),
                };
            }

            let category = self.classifier.classify(email_text).await;
            let response_suggestion = self
                .responder
                .generate_response(category, email_text)
                .await;

            info!(%category, chars = email_text.chars().count(), "Email triaged");

            ClassificationResult {
                category,
                response_suggestion,
            }
        }
        .instrument(span)
        .await
    }
}
