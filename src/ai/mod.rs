//! Generation backend integration
//!
//! Provides the trait seam to the large-language-model backend used for
//! one-shot structured generation and multi-turn chat, with a Gemini
//! implementation and a mock for tests.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;

use crate::models::{ChatParams, GenerationRequest, Turn};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// One-shot generation call. `Ok(None)` means the backend answered but
    /// produced no text.
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>>;

    /// One chat turn. Sessions are request/response chains keyed by the
    /// accumulated `history`; there is no server-held session resource.
    async fn chat_turn(&self, params: &ChatParams, history: &[Turn]) -> Result<Option<String>>;
}
