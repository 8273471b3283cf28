//! The external text-generation service behind `/chat`.
//!
//! [`ChatProvider`] uses native async fn in traits, which is not object safe;
//! [`BoxChatProvider`] erases it through a boxed-future twin trait so the
//! provider can live in [`crate::AppState`].

mod gemini;

use std::{future::Future, sync::Arc};

use futures_util::future::BoxFuture;

pub use gemini::{GeminiProvider, DEFAULT_BASE_URL};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{0}")]
    Unavailable(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Api { status: u16, message: String },
    #[error("no text in response ({reason})")]
    EmptyResponse { reason: String },
}

pub trait ChatProvider: Send + Sync {
    /// Human-readable name used in inline error replies, e.g. "Gemini".
    fn name(&self) -> &str;

    /// Sends one message and returns the generated reply text.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

trait ChatProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ProviderError>>;
}

impl<T: ChatProvider> ChatProviderDyn for T {
    fn name(&self) -> &str {
        ChatProvider::name(self)
    }

    fn generate_boxed<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ProviderError>> {
        Box::pin(self.generate(prompt))
    }
}

#[derive(Clone)]
pub struct BoxChatProvider {
    inner: Arc<dyn ChatProviderDyn>,
}

impl BoxChatProvider {
    pub fn new<T: ChatProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Arc::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.inner.generate_boxed(prompt).await
    }

    /// The provider's reply, or a readable diagnostic standing in for it.
    ///
    /// Provider failures never fail the request; they become the reply text.
    pub async fn reply_or_diagnostic(&self, prompt: &str) -> String {
        match self.generate(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(provider = self.name(), error = %e, "provider call failed");
                format!("⚠️ {} API Error: {e}", self.name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<&'static str, &'static str>);

    impl ChatProvider for Fixed {
        fn name(&self) -> &str {
            "Fixed"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            self.0
                .map(str::to_owned)
                .map_err(|e| ProviderError::Unavailable(e.to_owned()))
        }
    }

    #[tokio::test]
    async fn reply_passes_through_verbatim() {
        let provider = BoxChatProvider::new(Fixed(Ok("hi")));
        assert_eq!(provider.reply_or_diagnostic("hello").await, "hi");
    }

    #[tokio::test]
    async fn failure_becomes_prefixed_diagnostic() {
        let provider = BoxChatProvider::new(Fixed(Err("quota exceeded")));
        let reply = provider.reply_or_diagnostic("hello").await;

        assert_eq!(reply, "⚠️ Fixed API Error: quota exceeded");
    }
}
