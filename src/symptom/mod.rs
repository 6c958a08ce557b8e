//! Symptom triage: a yes/no classification call, then an analysis call only
//! when the text actually describes a health symptom.

mod specialty;

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::backend::GenerativeClient;
use crate::error::{Result, ValidationIssue};

pub use specialty::{FALLBACK_SPECIALTY, KNOWN_SPECIALTIES, extract_specialty, recommended_specialty};

/// Canned symptom descriptions offered as quick-fill buttons.
pub const SYMPTOM_PRESETS: [&str; 4] = [
    "Headache, fever, fatigue",
    "Cough, sore throat, congestion",
    "Stomach pain, nausea, diarrhea",
    "Joint pain, swelling, stiffness",
];

/// Reply shown when the text isn't about health.
pub const NOT_MEDICAL_MESSAGE: &str = "It seems your message isn't about health symptoms. Could you please describe how you're feeling or what symptoms you're experiencing?";

/// Substituted when the analysis reply carries no text.
pub const NO_ANALYSIS: &str = "No analysis available";

/// Whether a piece of text describes a health symptom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Medical,
    NotMedical,
}

impl Classification {
    /// Interpret the model's YES/NO reply.
    ///
    /// Missing or blank replies count as "NO", and so does any reply that
    /// contains "NO" anywhere (case-insensitive). Only what's left is medical.
    pub fn from_reply(reply: Option<&str>) -> Self {
        let normalized = reply.map(|r| r.trim().to_uppercase()).unwrap_or_default();
        if normalized.is_empty() || normalized.contains("NO") {
            Classification::NotMedical
        } else {
            Classification::Medical
        }
    }
}

/// Outcome of one symptom submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymptomAnalysis {
    /// The text wasn't about health; no analysis was requested.
    NotMedical { message: String },
    /// Full analysis text and the specialty derived from it.
    Medical { analysis: String, specialty: String },
}

impl SymptomAnalysis {
    /// Text to show in the result area.
    pub fn text(&self) -> &str {
        match self {
            SymptomAnalysis::NotMedical { message } => message,
            SymptomAnalysis::Medical { analysis, .. } => analysis,
        }
    }

    pub fn specialty(&self) -> Option<&str> {
        match self {
            SymptomAnalysis::NotMedical { .. } => None,
            SymptomAnalysis::Medical { specialty, .. } => Some(specialty),
        }
    }

    pub fn classification(&self) -> Classification {
        match self {
            SymptomAnalysis::NotMedical { .. } => Classification::NotMedical,
            SymptomAnalysis::Medical { .. } => Classification::Medical,
        }
    }
}

pub fn classification_prompt(symptoms: &str) -> String {
    format!(
        "Does the following text describe a real human health symptom?\nText: \"{}\"\nRespond only with \"YES\" or \"NO\". Do not explain.",
        symptoms
    )
}

pub fn analysis_prompt(symptoms: &str) -> String {
    format!(
        "Analyze these symptoms: \"{}\".\n\
         Provide:\n\
         1. 2-3 possible conditions (most likely first)\n\
         2. Immediate self-care measures\n\
         3. When to see a doctor\n\
         4. Based on the symptoms and conditions, recommend the most suitable doctor specialty from this list: {}.\n\
         \n\
         Format response as:\n\
         Possible Conditions: [bullet points]\n\
         Self-Care: [bullet points]\n\
         See a Doctor If: [bullet points]\n\
         Recommended Doctor: [Specialty]\n\
         \n\
         Ensure the response is in plain text format without any special characters like *, #, or markdown symbols.",
        symptoms,
        KNOWN_SPECIALTIES.join(", ")
    )
}

/// Runs the classify-then-analyze pipeline against a generative client.
pub struct SymptomAnalyzer<C> {
    client: Arc<C>,
}

impl<C> Clone for SymptomAnalyzer<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: GenerativeClient> SymptomAnalyzer<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Classify and, if medical, analyze the given symptom text.
    ///
    /// The two calls are strictly sequential. A failure in either one fails
    /// the whole submission; no partial result is returned.
    ///
    /// # Errors
    ///
    /// `ValidationError(EmptySymptoms)` for blank input (no call is made),
    /// otherwise whatever the client returns.
    #[instrument(name = "analyze_symptoms", skip(self, symptoms), fields(input_len = symptoms.len()))]
    pub async fn analyze(&self, symptoms: &str) -> Result<SymptomAnalysis> {
        let symptoms = symptoms.trim();
        if symptoms.is_empty() {
            return Err(ValidationIssue::EmptySymptoms.into());
        }

        let reply = self.client.generate(&classification_prompt(symptoms)).await?;
        let classification = Classification::from_reply(reply.as_deref());
        debug!(reply = ?reply, ?classification, "Classified symptom text");

        if classification == Classification::NotMedical {
            info!("Text is not about health symptoms, skipping analysis");
            return Ok(SymptomAnalysis::NotMedical {
                message: NOT_MEDICAL_MESSAGE.to_string(),
            });
        }

        let analysis = self
            .client
            .generate(&analysis_prompt(symptoms))
            .await?
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| NO_ANALYSIS.to_string());
        let specialty = recommended_specialty(&analysis);
        info!(specialty = %specialty, "Symptom analysis complete");

        Ok(SymptomAnalysis::Medical {
            analysis,
            specialty,
        })
    }
}
