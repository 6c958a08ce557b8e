use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use smart_health::{GenerativeClient, MediaFile, Result, SmartHealthError};

type Responder = Box<dyn Fn(&str) -> Result<Option<String>> + Send + Sync>;
type Delay = Box<dyn Fn(&str) -> Duration + Send + Sync>;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub media: Vec<MediaFile>,
}

/// In-memory stand-in for the generative API.
///
/// Replies are computed from the prompt, every call is recorded, and the
/// peak number of overlapping calls is tracked.
pub struct ScriptedClient {
    responder: Responder,
    delay: Option<Delay>,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedClient {
    pub fn new(responder: impl Fn(&str) -> Result<Option<String>> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            delay: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: impl Fn(&str) -> Duration + Send + Sync + 'static) -> Self {
        self.delay = Some(Box::new(delay));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock poisoned").len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeClient for ScriptedClient {
    async fn generate_with_media(
        &self,
        prompt: &str,
        media: &[MediaFile],
    ) -> Result<Option<String>> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(RecordedCall {
                prompt: prompt.to_string(),
                media: media.to_vec(),
            });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = &self.delay {
            tokio::time::sleep(delay(prompt)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        (self.responder)(prompt)
    }
}

#[allow(dead_code)]
pub fn is_classification(prompt: &str) -> bool {
    prompt.starts_with("Does the following text describe a real human health symptom?")
}

#[allow(dead_code)]
pub fn is_analysis(prompt: &str) -> bool {
    prompt.starts_with("Analyze these symptoms:")
}

#[allow(dead_code)]
pub fn summary_language(prompt: &str) -> Option<&'static str> {
    ["English", "Hindi", "Marathi"]
        .into_iter()
        .find(|lang| prompt.contains(&format!("medical report in {} ", lang)))
}

#[allow(dead_code)]
pub fn text(reply: &str) -> Result<Option<String>> {
    Ok(Some(reply.to_string()))
}

#[allow(dead_code)]
pub fn service_down() -> Result<Option<String>> {
    Err(SmartHealthError::ApiError("Gemini API error: 503 Service Unavailable".to_string()))
}

#[allow(dead_code)]
pub const DERMATOLOGY_ANALYSIS: &str = "Possible Conditions:\n- Contact dermatitis\n- Eczema\nSelf-Care:\n- Avoid irritants\n- Apply moisturizer\nSee a Doctor If:\n- The rash spreads or blisters\nRecommended Doctor: Dermatologist\n";
