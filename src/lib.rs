//! Email triage service: LLM-backed email classification and reply drafting.

pub mod config;
pub mod error;
pub mod llm;
pub mod triage;
pub mod web;
