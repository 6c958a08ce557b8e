use crate::error::{Result, SmartHealthError};
use reqwest::Response;
use tracing::error;

/// Convert a reqwest error to a SmartHealthError, handling timeout errors specially.
pub fn handle_http_error(e: reqwest::Error, provider_name: &str) -> SmartHealthError {
    error!(error = %e, "HTTP request to {} failed", provider_name);
    if e.is_timeout() {
        SmartHealthError::Timeout
    } else {
        SmartHealthError::HttpError(e)
    }
}

/// Check HTTP response status and extract error message if unsuccessful.
pub async fn check_response_status(response: Response, provider_name: &str) -> Result<Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        error!(
            status = %status,
            error = %error_text,
            "{} API returned error response", provider_name
        );
        return Err(SmartHealthError::api_error(
            provider_name,
            format!("{} {}", status, error_text),
        ));
    }
    Ok(response)
}

/// Macro to generate the standard builder methods for API clients.
///
/// This macro generates `model()`, `temperature()`, `max_tokens()`, and `timeout()`
/// methods operating on the client's `config` field.
#[macro_export]
macro_rules! impl_client_builder_methods {
    (
        client_type: $client:ty,
        config_type: $config:ty,
        model_type: $model:ty,
        provider_name: $provider:expr
    ) => {
        impl $client {
            /// Set the model to use
            #[tracing::instrument(skip(self))]
            pub fn model(mut self, model: $model) -> Self {
                tracing::debug!(
                    previous_model = ?self.config.model,
                    new_model = ?model,
                    "Setting {} model", $provider
                );
                self.config.model = model;
                self
            }

            /// Set the sampling temperature (0.0 to 1.0, lower = more deterministic).
            ///
            /// When unset the provider's default is used.
            #[tracing::instrument(skip(self))]
            pub fn temperature(mut self, temp: f32) -> Self {
                tracing::debug!(
                    previous_temp = ?self.config.temperature,
                    new_temp = temp,
                    "Setting temperature"
                );
                self.config.temperature = Some(temp);
                self
            }

            /// Set the maximum tokens to generate
            #[tracing::instrument(skip(self))]
            pub fn max_tokens(mut self, max: u32) -> Self {
                tracing::debug!(
                    previous_max = ?self.config.max_tokens,
                    new_max = max,
                    "Setting max_tokens"
                );
                // At least 1, the API rejects 0
                self.config.max_tokens = Some(max.max(1));
                self
            }

            /// Set the timeout for HTTP requests.
            ///
            /// By default no timeout is enforced beyond the connection
            /// behaviour of the underlying HTTP client. A request that runs
            /// past the timeout fails with `SmartHealthError::Timeout`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP client cannot be rebuilt.
            #[tracing::instrument(skip(self))]
            pub fn timeout(mut self, timeout: std::time::Duration) -> $crate::Result<Self> {
                tracing::debug!(
                    previous_timeout = ?self.config.timeout,
                    new_timeout = ?timeout,
                    "Setting timeout"
                );
                self.client = reqwest::Client::builder().timeout(timeout).build()?;
                self.config.timeout = Some(timeout);
                Ok(self)
            }
        }
    };
}
