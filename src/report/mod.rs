//! Multilingual medical report summaries.
//!
//! One encoded report is sent with three prompts, one per [`Language`],
//! concurrently. The batch succeeds only if every request does.

mod file;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::backend::{GenerativeClient, MediaFile};
use crate::error::Result;

pub use file::{ACCEPTED_EXTENSIONS, EncodedReport, MAX_REPORT_BYTES, ReportFile, ReportMediaType};

/// Substituted when a summary reply carries no text.
pub const NO_SUMMARY: &str = "No summary available";

/// Shown for the active tab when it has no summary.
pub const NO_SUMMARY_IN_LANGUAGE: &str = "No summary available in this language";

/// Target languages for report summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Marathi,
}

impl Language {
    /// All languages, in tab order.
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Marathi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Marathi => "Marathi",
        }
    }

    fn index(self) -> usize {
        match self {
            Language::English => 0,
            Language::Hindi => 1,
            Language::Marathi => 2,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown language: {}", s))
    }
}

/// Summaries keyed by language.
///
/// Either empty or fully populated: the only way to fill it is
/// [`ReportSummarySet::complete`] with one summary per language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummarySet {
    summaries: [Option<String>; 3],
}

impl ReportSummarySet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn complete(english: String, hindi: String, marathi: String) -> Self {
        Self {
            summaries: [Some(english), Some(hindi), Some(marathi)],
        }
    }

    pub fn get(&self, language: Language) -> Option<&str> {
        self.summaries[language.index()].as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.iter().all(Option::is_none)
    }

    pub fn is_complete(&self) -> bool {
        self.summaries.iter().all(Option::is_some)
    }

    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// Iterate `(language, summary)` pairs in tab order.
    pub fn iter(&self) -> impl Iterator<Item = (Language, Option<&str>)> {
        Language::ALL
            .into_iter()
            .map(move |lang| (lang, self.get(lang)))
    }
}

pub fn summary_prompt(language: Language) -> String {
    format!(
        "Extract and summarize this medical report in {} (simple terms). Include:\n\
         1. Key findings\n\
         2. Abnormal values\n\
         3. Recommended actions\n\
         Keep it concise (150-200 words).\n\
         Ensure the response is in plain text format without any special characters like *, #, or markdown symbols.",
        language
    )
}

/// Produces the three-language summary set for an encoded report.
pub struct ReportSummarizer<C> {
    client: Arc<C>,
}

impl<C> Clone for ReportSummarizer<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: GenerativeClient> ReportSummarizer<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    async fn summarize_in(&self, payload: &MediaFile, language: Language) -> Result<String> {
        let summary = self
            .client
            .generate_with_media(&summary_prompt(language), std::slice::from_ref(payload))
            .await?
            .filter(|text| !text.trim().is_empty());
        debug!(%language, has_text = summary.is_some(), "Summary request finished");
        Ok(summary.unwrap_or_else(|| NO_SUMMARY.to_string()))
    }

    /// Request all three summaries concurrently.
    ///
    /// Waits for every request before looking at any result; if one fails
    /// the whole batch fails and nothing is returned.
    #[instrument(
        name = "summarize_report",
        skip(self, payload),
        fields(mime_type = %payload.mime_type, payload_len = payload.data.len())
    )]
    pub async fn summarize(&self, payload: &MediaFile) -> Result<ReportSummarySet> {
        let (english, hindi, marathi) = tokio::join!(
            self.summarize_in(payload, Language::English),
            self.summarize_in(payload, Language::Hindi),
            self.summarize_in(payload, Language::Marathi),
        );

        let summaries = ReportSummarySet::complete(english?, hindi?, marathi?);
        info!("Report summarized in all languages");
        Ok(summaries)
    }
}
