//! Smart Health: symptom triage and medical report summaries on Gemini
//!
//! # Overview
//!
//! The assistant runs two independent workflows against a generative-language
//! API:
//!
//! - **Symptom analysis**: a YES/NO classification call decides whether the
//!   text describes a health symptom. Only then is a second call made for
//!   possible conditions, self-care, when to see a doctor and a recommended
//!   specialty, which is pulled out of the reply text.
//! - **Report summarization**: an uploaded PDF, JPEG or PNG (up to 5 MB) is
//!   base64-encoded once and summarized in English, Hindi and Marathi by
//!   three concurrent requests. The summaries appear all together or not at all.
//!
//! [`SmartAssistant`] holds the page state (input, loading flags, results,
//! error notices). [`SymptomAnalyzer`] and [`ReportSummarizer`] are the
//! orchestrators and work with any [`GenerativeClient`]; [`GeminiClient`]
//! is the HTTP implementation.
//!
//! # Quick Start
//!
//! ```no_run
//! use smart_health::{GeminiClient, SmartAssistant};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::from_env()?;
//!     let mut assistant = SmartAssistant::new(client);
//!
//!     assistant.set_symptoms("Itchy red rash on both forearms for a week");
//!     assistant.submit_symptoms().await?;
//!
//!     println!("{}", assistant.symptom_response().unwrap_or_default());
//!     println!("See a: {}", assistant.matched_specialty().unwrap_or("-"));
//!     Ok(())
//! }
//! ```
mod assistant;
mod backend;
mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod report;
pub mod symptom;

// Re-exports for convenience
pub use assistant::{
    DISCLAIMER, Navigator, Notices, RequestState, SmartAssistant, Workflow, doctor_route,
};
pub use backend::{GeminiClient, GeminiConfig, GeminiModel, GenerativeClient, MediaFile};
pub use error::{Result, SmartHealthError, ValidationIssue};
pub use report::{
    EncodedReport, Language, MAX_REPORT_BYTES, ReportFile, ReportMediaType, ReportSummarizer,
    ReportSummarySet,
};
pub use symptom::{
    Classification, FALLBACK_SPECIALTY, SYMPTOM_PRESETS, SymptomAnalysis, SymptomAnalyzer,
    extract_specialty, recommended_specialty,
};
