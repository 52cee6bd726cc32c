//! Email triage: classify an email, then draft a reply for its category.
//!
//! Flow per request:
//! 1. Trim the text; empty input short-circuits with no LLM call
//! 2. `Classifier::classify()`: one LLM call, normalized to a `Category`
//! 3. `Responder::generate_response()`: one LLM call for the two business
//!    categories, a fixed string for everything else
//!
//! Errors never propagate out of this module. They are logged and turned into
//! sentinel strings in the result.

pub mod category;
pub mod classifier;
pub mod prompts;
pub mod responder;
pub mod service;
pub mod types;

pub use category::Category;
pub use classifier::Classifier;
pub use responder::Responder;
pub use service::TriageService;
pub use types::{ClassificationResult, EmailRequest};
