use async_trait::async_trait;

use crate::backend::MediaFile;
use crate::error::Result;

/// GenerativeClient defines the interface the assistant needs from a
/// generative-language API.
///
/// A call sends one user message made of a text prompt plus optional inline
/// attachments and returns the first candidate's text. `Ok(None)` means the
/// call succeeded but the reply carried no usable text (an unexpected
/// response shape); callers substitute their own default instead of failing.
///
/// `GeminiClient` is the production implementation. Tests substitute a
/// scripted fake through this trait.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use smart_health::{GeminiClient, GenerativeClient};
///
/// let client = GeminiClient::from_env()?;
/// let reply = client.generate("Say hello").await?;
/// println!("{}", reply.unwrap_or_default());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Send a prompt together with inline binary attachments.
    async fn generate_with_media(
        &self,
        prompt: &str,
        media: &[MediaFile],
    ) -> Result<Option<String>>;

    /// Send a text-only prompt.
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        self.generate_with_media(prompt, &[]).await
    }
}

