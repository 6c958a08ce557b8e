//! Page-level controller holding all transient state for both workflows.

mod state;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::backend::{GenerativeClient, MediaFile};
use crate::error::{Result, SmartHealthError, ValidationIssue};
use crate::report::{
    EncodedReport, Language, NO_SUMMARY_IN_LANGUAGE, ReportFile, ReportSummarizer,
    ReportSummarySet,
};
use crate::symptom::{SYMPTOM_PRESETS, SymptomAnalysis, SymptomAnalyzer};

pub use state::{Notices, RequestState, Workflow};

/// Informational note shown next to the assistant.
pub const DISCLAIMER: &str =
    "This AI analysis is for informational purposes only. Always consult a doctor for medical advice.";

/// Route to the doctor directory for a specialty.
///
/// ```
/// assert_eq!(smart_health::doctor_route("General physician"), "/doctors/General%20physician");
/// ```
pub fn doctor_route(specialty: &str) -> String {
    format!("/doctors/{}", urlencoding::encode(specialty))
}

/// Client-side navigation, implemented by whatever hosts the assistant.
pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// Holds the input, loading state, results and error notices of the
/// symptom and report workflows.
///
/// `submit_symptoms` and `submit_report` run one workflow end to end. To
/// keep both in flight at once, split each into its `begin_*` and
/// `finish_*` halves and drive the orchestrators yourself:
///
/// ```no_run
/// # async fn example() -> smart_health::Result<()> {
/// use smart_health::{GeminiClient, SmartAssistant};
///
/// let mut assistant = SmartAssistant::new(GeminiClient::from_env()?);
/// assistant.apply_preset(0);
/// assistant.select_file_from_path("labs.pdf")?;
///
/// let symptoms = assistant.begin_symptom_submit()?;
/// let payload = assistant.begin_report_submit()?;
/// let analyzer = assistant.symptom_analyzer();
/// let summarizer = assistant.report_summarizer();
/// let (analysis, summaries) = tokio::join!(
///     analyzer.analyze(&symptoms),
///     summarizer.summarize(&payload),
/// );
/// assistant.finish_symptom_submit(analysis)?;
/// assistant.finish_report_submit(summaries)?;
/// # Ok(())
/// # }
/// ```
pub struct SmartAssistant<C> {
    analyzer: SymptomAnalyzer<C>,
    summarizer: ReportSummarizer<C>,

    symptoms: String,
    symptom_state: RequestState,
    symptom_result: Option<SymptomAnalysis>,

    report: Option<EncodedReport>,
    report_state: RequestState,
    summaries: ReportSummarySet,
    active_language: Language,

    notices: Notices,
}

impl<C: GenerativeClient> SmartAssistant<C> {
    pub fn new(client: C) -> Self {
        Self::with_shared_client(Arc::new(client))
    }

    pub fn with_shared_client(client: Arc<C>) -> Self {
        Self {
            analyzer: SymptomAnalyzer::new(Arc::clone(&client)),
            summarizer: ReportSummarizer::new(client),
            symptoms: String::new(),
            symptom_state: RequestState::Idle,
            symptom_result: None,
            report: None,
            report_state: RequestState::Idle,
            summaries: ReportSummarySet::empty(),
            active_language: Language::default(),
            notices: Notices::default(),
        }
    }

    pub fn symptom_analyzer(&self) -> SymptomAnalyzer<C> {
        self.analyzer.clone()
    }

    pub fn report_summarizer(&self) -> ReportSummarizer<C> {
        self.summarizer.clone()
    }

    // Symptom workflow

    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }

    /// Replace the symptom text. Ignored while a symptom request is in flight.
    pub fn set_symptoms(&mut self, text: impl Into<String>) -> bool {
        if self.symptom_state.is_submitting() {
            debug!("Ignoring symptom edit while a request is in flight");
            return false;
        }
        self.symptoms = text.into();
        true
    }

    /// Fill the symptom text from one of [`SYMPTOM_PRESETS`].
    pub fn apply_preset(&mut self, index: usize) -> bool {
        match SYMPTOM_PRESETS.get(index) {
            Some(preset) => self.set_symptoms(*preset),
            None => false,
        }
    }

    pub fn symptom_state(&self) -> RequestState {
        self.symptom_state
    }

    pub fn can_submit_symptoms(&self) -> bool {
        !self.symptom_state.is_submitting() && !self.symptoms.trim().is_empty()
    }

    pub fn symptom_button_label(&self) -> &'static str {
        if self.symptom_state.is_submitting() {
            "Analyzing..."
        } else {
            "Analyze Symptoms"
        }
    }

    pub fn symptom_result(&self) -> Option<&SymptomAnalysis> {
        self.symptom_result.as_ref()
    }

    /// Text for the analysis area: the analysis or the clarifying message.
    pub fn symptom_response(&self) -> Option<&str> {
        self.symptom_result.as_ref().map(SymptomAnalysis::text)
    }

    pub fn matched_specialty(&self) -> Option<&str> {
        self.symptom_result.as_ref().and_then(SymptomAnalysis::specialty)
    }

    /// Validate the input and move the symptom workflow to `Submitting`.
    ///
    /// Clears the previous result and notice. Returns the trimmed text to
    /// pass to [`SymptomAnalyzer::analyze`].
    pub fn begin_symptom_submit(&mut self) -> Result<String> {
        if self.symptom_state.is_submitting() {
            return Err(ValidationIssue::InFlight.into());
        }
        let symptoms = self.symptoms.trim();
        if symptoms.is_empty() {
            return Err(self.reject(Workflow::Symptoms, ValidationIssue::EmptySymptoms));
        }
        let symptoms = symptoms.to_string();

        self.notices.clear(Workflow::Symptoms);
        self.symptom_result = None;
        self.symptom_state = RequestState::Submitting;
        Ok(symptoms)
    }

    /// Apply the outcome of a symptom analysis started with `begin_symptom_submit`.
    ///
    /// Failures are recorded as a generic notice and passed back.
    pub fn finish_symptom_submit(&mut self, outcome: Result<SymptomAnalysis>) -> Result<()> {
        match outcome {
            Ok(result) => {
                info!(specialty = ?result.specialty(), "Symptom workflow succeeded");
                self.symptom_result = Some(result);
                self.symptom_state = RequestState::Succeeded;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Symptom workflow failed");
                self.symptom_result = None;
                self.symptom_state = RequestState::Failed;
                self.notices.set(Workflow::Symptoms, failure_message(Workflow::Symptoms, &e));
                Err(e)
            }
        }
    }

    /// Run the symptom workflow end to end.
    ///
    /// Any error is also recorded in the symptom notice slot.
    #[instrument(name = "submit_symptoms", skip(self))]
    pub async fn submit_symptoms(&mut self) -> Result<()> {
        let symptoms = self.begin_symptom_submit()?;
        let outcome = self.analyzer.analyze(&symptoms).await;
        self.finish_symptom_submit(outcome)
    }

    /// Navigate to the directory for the matched specialty.
    ///
    /// # Errors
    ///
    /// `ValidationError(NoSpecialty)` when no specialty has been matched; no
    /// navigation happens.
    pub fn find_doctor(&mut self, navigator: &mut impl Navigator) -> Result<()> {
        match self.matched_specialty() {
            Some(specialty) => {
                let route = doctor_route(specialty);
                info!(route = %route, "Navigating to doctor directory");
                navigator.navigate(&route);
                Ok(())
            }
            None => Err(self.reject(Workflow::Symptoms, ValidationIssue::NoSpecialty)),
        }
    }

    // Report workflow

    /// Accept an uploaded report. A valid file replaces any previous
    /// selection and its preview; an invalid one leaves state untouched
    /// apart from the notice.
    pub fn select_file(&mut self, name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<()> {
        self.ensure_report_idle()?;
        let file = ReportFile::new(name, mime_type, bytes);
        self.accept_file(file)
    }

    /// Like [`select_file`](Self::select_file), reading the report from disk.
    pub fn select_file_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.ensure_report_idle()?;
        let file = ReportFile::open(path);
        self.accept_file(file)
    }

    fn accept_file(&mut self, file: Result<ReportFile>) -> Result<()> {
        match file {
            Ok(file) => {
                debug!(file = %file.name(), "Holding report for summarization");
                self.report = Some(EncodedReport::from(file));
                self.notices.clear(Workflow::Report);
                Ok(())
            }
            Err(e) => {
                self.notices.set(Workflow::Report, failure_message(Workflow::Report, &e));
                Err(e)
            }
        }
    }

    fn ensure_report_idle(&self) -> Result<()> {
        if self.report_state.is_submitting() {
            return Err(ValidationIssue::InFlight.into());
        }
        Ok(())
    }

    pub fn held_file(&self) -> Option<&ReportFile> {
        self.report.as_ref().map(|report| &report.file)
    }

    /// `data:` URL preview of the held image, if any.
    pub fn preview(&self) -> Option<&str> {
        self.report.as_ref().and_then(|report| report.preview.as_deref())
    }

    pub fn report_state(&self) -> RequestState {
        self.report_state
    }

    pub fn can_submit_report(&self) -> bool {
        self.report.is_some() && !self.report_state.is_submitting()
    }

    pub fn report_button_label(&self) -> &'static str {
        if self.report_state.is_submitting() {
            "Generating Summaries..."
        } else {
            "Analyze Report"
        }
    }

    /// Move the report workflow to `Submitting` and hand out the encoded file.
    ///
    /// Previous summaries are cleared so a failure leaves the set empty.
    pub fn begin_report_submit(&mut self) -> Result<MediaFile> {
        self.ensure_report_idle()?;
        let Some(report) = self.report.as_ref() else {
            return Err(self.reject(Workflow::Report, ValidationIssue::MissingFile));
        };
        let payload = report.payload.clone();

        self.notices.clear(Workflow::Report);
        self.summaries.clear();
        self.report_state = RequestState::Submitting;
        Ok(payload)
    }

    /// Apply the outcome of a summarization started with `begin_report_submit`.
    ///
    /// On success the summary set is replaced as a whole and the held file
    /// and preview are consumed.
    pub fn finish_report_submit(&mut self, outcome: Result<ReportSummarySet>) -> Result<()> {
        match outcome {
            Ok(summaries) => {
                info!("Report workflow succeeded");
                self.summaries = summaries;
                self.report = None;
                self.report_state = RequestState::Succeeded;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Report workflow failed");
                self.summaries.clear();
                self.report_state = RequestState::Failed;
                self.notices.set(Workflow::Report, failure_message(Workflow::Report, &e));
                Err(e)
            }
        }
    }

    /// Run the report workflow end to end.
    #[instrument(name = "submit_report", skip(self))]
    pub async fn submit_report(&mut self) -> Result<()> {
        let payload = self.begin_report_submit()?;
        let outcome = self.summarizer.summarize(&payload).await;
        self.finish_report_submit(outcome)
    }

    pub fn summaries(&self) -> &ReportSummarySet {
        &self.summaries
    }

    pub fn has_summaries(&self) -> bool {
        !self.summaries.is_empty()
    }

    pub fn select_language(&mut self, language: Language) {
        self.active_language = language;
    }

    pub fn active_language(&self) -> Language {
        self.active_language
    }

    /// Summary for the selected language tab.
    pub fn active_summary(&self) -> &str {
        self.summaries
            .get(self.active_language)
            .unwrap_or(NO_SUMMARY_IN_LANGUAGE)
    }

    /// Drop all summaries and the held file. Idempotent.
    ///
    /// Ignored while a report request is in flight.
    pub fn clear_summaries(&mut self) -> bool {
        if self.report_state.is_submitting() {
            debug!("Ignoring clear while a report request is in flight");
            return false;
        }
        self.summaries.clear();
        self.report = None;
        true
    }

    // Notices

    pub fn notice(&self, workflow: Workflow) -> Option<&str> {
        self.notices.get(workflow)
    }

    /// The most recent error message from either workflow.
    pub fn notification(&self) -> Option<&str> {
        self.notices.latest()
    }

    fn reject(&mut self, workflow: Workflow, issue: ValidationIssue) -> SmartHealthError {
        debug!(%workflow, issue = %issue, "Rejected input");
        self.notices.set(workflow, issue.to_string());
        issue.into()
    }
}

// Validation issues keep their own text, everything else gets the generic message
fn failure_message(workflow: Workflow, e: &SmartHealthError) -> String {
    match e.validation_issue() {
        Some(issue) => issue.to_string(),
        None => workflow.failure_message().to_string(),
    }
}
