use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument, trace, warn};

use crate::backend::{
    GenerativeClient, MediaFile, check_media, check_response_status, handle_http_error,
};
use crate::error::{Result, SmartHealthError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini models usable with `generateContent`
///
/// Any other model name can be given through `Custom` or `FromStr`:
///
/// ```rust
/// use smart_health::GeminiModel;
/// use std::str::FromStr;
///
/// let model = GeminiModel::from_str("gemini-custom").unwrap();
/// assert_eq!(model, GeminiModel::Custom("gemini-custom".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Model {
    /// Gemini 2.5 Pro
    Gemini25Pro,
    /// Gemini 2.5 Flash
    Gemini25Flash,
    /// Gemini 2.5 Flash Lite
    Gemini25FlashLite,
    /// Gemini 2.0 Flash (multimodal, handles PDF and images inline)
    Gemini20Flash,
    /// Gemini Flash Latest (alias for latest Flash model)
    GeminiFlashLatest,
    /// Custom model name (for new models or Gemini-compatible endpoints)
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::GeminiFlashLatest => "gemini-flash-latest",
            Model::Custom(name) => name,
        }
    }

    /// Create a model from a string. Unknown names become `Custom(name)`.
    pub fn from_string(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.as_str() {
            "gemini-2.5-pro" => Model::Gemini25Pro,
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.0-flash" => Model::Gemini20Flash,
            "gemini-flash-latest" => Model::GeminiFlashLatest,
            _ => Model::Custom(name),
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from_string(s))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::from_string(s)
    }
}

/// Configuration for the Gemini client
///
/// Passed in explicitly at construction so tests and alternative
/// deployments can point the assistant at any compatible endpoint.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: Model,
    /// Full `generateContent` URL. Takes precedence over `base_url` + `model`.
    pub endpoint: Option<String>,
    /// Base URL for Gemini-compatible APIs, without trailing slash.
    /// Defaults to "https://generativelanguage.googleapis.com/v1beta" if not set
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Model::Gemini20Flash,
            endpoint: None,
            base_url: None,
            temperature: None,
            max_tokens: None,
            timeout: None,
        }
    }

    /// The URL requests are posted to, without the key parameter.
    pub fn request_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!(
                "{}/models/{}:generateContent",
                self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
                self.model.as_str()
            ),
        }
    }
}

/// Gemini client for generating completions
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

// Gemini API request and response structures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

// Every level is optional: an unexpected shape means "no text", not an error
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

fn build_request(
    prompt: &str,
    media: &[MediaFile],
    config: &GeminiConfig,
) -> GenerateContentRequest {
    let mut parts = vec![Part::Text {
        text: prompt.to_string(),
    }];
    parts.extend(media.iter().map(|file| Part::InlineData {
        inline_data: InlineData {
            mime_type: file.mime_type.clone(),
            data: file.data.clone(),
        },
    }));

    let generation_config = if config.temperature.is_some() || config.max_tokens.is_some() {
        Some(GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
        })
    } else {
        None
    };

    GenerateContentRequest {
        contents: vec![Content { parts }],
        generation_config,
    }
}

/// Pull the first candidate's first text part out of a response body.
///
/// Returns `None` for bodies that aren't JSON or don't have that path.
fn first_candidate_text(body: &str) -> Option<String> {
    let completion: GenerateContentResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Gemini response body has an unexpected shape");
            return None;
        }
    };

    let candidate = completion.candidates?.into_iter().next()?;
    trace!(finish_reason = ?candidate.finish_reason, "Completion finish reason");
    candidate.content?.parts?.into_iter().next()?.text
}

impl GeminiClient {
    /// Create a new Gemini client with the provided API key and default settings.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use smart_health::GeminiClient;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GeminiClient::new("your-gemini-api-key")?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_client_new", skip(api_key))]
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Create a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be built.
    #[instrument(name = "gemini_client_with_config", skip(config), fields(model = %config.model.as_str()))]
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(SmartHealthError::ApiError(
                "API key cannot be empty. Use GeminiClient::from_env() to read from GEMINI_API_KEY environment variable.".to_string(),
            ));
        }

        let client = match config.timeout {
            Some(timeout) => reqwest::Client::builder().timeout(timeout).build()?,
            None => reqwest::Client::new(),
        };

        info!(
            model = %config.model.as_str(),
            custom_endpoint = config.endpoint.is_some(),
            "Created Gemini client"
        );

        Ok(Self { config, client })
    }

    /// Create a client from the environment.
    ///
    /// `GEMINI_API_KEY` is required. `GEMINI_API_URL`, when set, is used as the
    /// full `generateContent` endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `GEMINI_API_KEY` is not set.
    #[instrument(name = "gemini_client_from_env")]
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            SmartHealthError::ApiError("GEMINI_API_KEY environment variable is not set".to_string())
        })?;

        let mut config = GeminiConfig::new(api_key);
        config.endpoint = std::env::var("GEMINI_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self::with_config(config)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Set a custom base URL for Gemini-compatible APIs.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL without trailing slash (e.g., "http://localhost:1234/v1beta")
    #[tracing::instrument(skip(self, base_url))]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url_str = base_url.into();
        tracing::debug!(
            previous_base_url = ?self.config.base_url,
            new_base_url = %base_url_str,
            "Setting custom base URL"
        );
        self.config.base_url = Some(base_url_str);
        self
    }

    /// Set the full `generateContent` endpoint, overriding base URL and model.
    #[tracing::instrument(skip(self, endpoint))]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint_str = endpoint.into();
        tracing::debug!(
            previous_endpoint = ?self.config.endpoint,
            new_endpoint = %endpoint_str,
            "Setting custom endpoint"
        );
        self.config.endpoint = Some(endpoint_str);
        self
    }
}

// Generate builder methods using macro
crate::impl_client_builder_methods! {
    client_type: GeminiClient,
    config_type: GeminiConfig,
    model_type: Model,
    provider_name: "Gemini"
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    #[instrument(
        name = "gemini_generate",
        skip(self, prompt, media),
        fields(
            model = %self.config.model.as_str(),
            prompt_len = prompt.len(),
            attachments = media.len()
        )
    )]
    async fn generate_with_media(
        &self,
        prompt: &str,
        media: &[MediaFile],
    ) -> Result<Option<String>> {
        check_media(media, "Gemini")?;

        debug!("Building Gemini API request");
        let request = build_request(prompt, media, &self.config);

        let url = self.config.request_url();
        debug!(url = %url, "Sending request to Gemini API");
        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.config.api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| handle_http_error(e, "Gemini"))?;

        let response = check_response_status(response, "Gemini").await?;
        let body = response
            .text()
            .await
            .map_err(|e| handle_http_error(e, "Gemini"))?;

        debug!(body_len = body.len(), "Received response from Gemini API");
        let text = first_candidate_text(&body);
        match &text {
            Some(text) => trace!(content = %text, "Extracted text content from response"),
            None => warn!("No text content in Gemini response"),
        }
        Ok(text)
    }
}
