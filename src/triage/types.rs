//! Request and result types for the triage endpoint.

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Inbound classification request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    /// Raw email text. May be empty or whitespace-only.
    pub email_text: String,
}

/// Category plus the suggested reply, returned once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub response_suggestion: String,
}
