use super::GenerationBackend;
use crate::models::{ChatParams, GenerationRequest, Turn};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Keyed chat reply: matched against the latest user turn's text, with an
/// optional delay to script completion order in overlap tests.
struct KeyedReply {
    needle: String,
    text: String,
    delay: Duration,
}

#[derive(Clone)]
pub struct MockBackend {
    responses: Arc<Mutex<VecDeque<Option<String>>>>,
    keyed_replies: Arc<Mutex<Vec<KeyedReply>>>,
    error: Arc<Mutex<Option<String>>>,
    generate_count: Arc<Mutex<usize>>,
    chat_count: Arc<Mutex<usize>>,
    last_generate_request: Arc<Mutex<Option<GenerationRequest>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            keyed_replies: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(None)),
            generate_count: Arc::new(Mutex::new(0)),
            chat_count: Arc::new(Mutex::new(0)),
            last_generate_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Queue a text response, consumed in FIFO order by either method.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Some(response.into()));
        self
    }

    /// Queue a "backend answered but produced no text" response.
    pub fn with_empty_response(self) -> Self {
        self.responses.lock().unwrap().push_back(None);
        self
    }

    /// Make every call fail with `BackendUnavailable`.
    pub fn with_unavailable(self, message: impl Into<String>) -> Self {
        *self.error.lock().unwrap() = Some(message.into());
        self
    }

    /// Reply used when the latest user turn contains `needle`, delivered
    /// after `delay_ms`.
    pub fn with_keyed_reply(
        self,
        needle: impl Into<String>,
        text: impl Into<String>,
        delay_ms: u64,
    ) -> Self {
        self.keyed_replies.lock().unwrap().push(KeyedReply {
            needle: needle.into(),
            text: text.into(),
            delay: Duration::from_millis(delay_ms),
        });
        self
    }

    pub fn get_generate_count(&self) -> usize {
        *self.generate_count.lock().unwrap()
    }

    pub fn get_chat_count(&self) -> usize {
        *self.chat_count.lock().unwrap()
    }

    pub fn last_generate_request(&self) -> Option<GenerationRequest> {
        self.last_generate_request.lock().unwrap().clone()
    }

    fn check_error(&self) -> Result<()> {
        if let Some(message) = self.error.lock().unwrap().clone() {
            return Err(Error::BackendUnavailable(message));
        }
        Ok(())
    }

    fn next_queued(&self) -> Option<Option<String>> {
        self.responses.lock().unwrap().pop_front()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>> {
        self.check_error()?;

        *self.generate_count.lock().unwrap() += 1;
        *self.last_generate_request.lock().unwrap() = Some(request.clone());

        Ok(self.next_queued().unwrap_or(Some("{}".to_string())))
    }

    async fn chat_turn(&self, _params: &ChatParams, history: &[Turn]) -> Result<Option<String>> {
        self.check_error()?;

        *self.chat_count.lock().unwrap() += 1;

        let last_user_text = history
            .iter()
            .rev()
            .find(|turn| turn.role == crate::models::Role::User)
            .map(Turn::text)
            .unwrap_or_default();

        let keyed = {
            let replies = self.keyed_replies.lock().unwrap();
            replies
                .iter()
                .find(|reply| last_user_text.contains(&reply.needle))
                .map(|reply| (reply.text.clone(), reply.delay))
        };
        if let Some((text, delay)) = keyed {
            tokio::time::sleep(delay).await;
            return Ok(Some(text));
        }

        if let Some(queued) = self.next_queued() {
            return Ok(queued);
        }

        Ok(Some(format!("Reply to: {}", last_user_text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentUnit;

    fn params() -> ChatParams {
        ChatParams {
            system_instruction: "coach".to_string(),
            temperature: Some(0.7),
        }
    }

    #[tokio::test]
    async fn test_queued_responses_are_consumed_in_order() {
        let backend = MockBackend::new()
            .with_response("first")
            .with_empty_response();

        let request = crate::compose::compose(
            "system",
            None,
            ContentUnit::text("doc"),
            "context",
            None,
        );

        assert_eq!(
            backend.generate(&request).await.unwrap().as_deref(),
            Some("first")
        );
        assert!(backend.generate(&request).await.unwrap().is_none());
        assert_eq!(backend.get_generate_count(), 2);
    }

    #[tokio::test]
    async fn test_keyed_replies_match_the_latest_user_turn() {
        let backend = MockBackend::new().with_keyed_reply("Why Go?", "Because of goroutines.", 0);

        let history = vec![Turn::user(vec![ContentUnit::text("Why Go?")])];
        let text = backend.chat_turn(&params(), &history).await.unwrap();
        assert_eq!(text.as_deref(), Some("Because of goroutines."));
    }

    #[tokio::test]
    async fn test_unavailable_fails_without_recording_a_call() {
        let backend = MockBackend::new().with_unavailable("connection refused");

        let history = vec![Turn::user(vec![ContentUnit::text("hi")])];
        let err = backend.chat_turn(&params(), &history).await.unwrap_err();
        assert!(matches!(err, Error::BackendUnavailable(_)));
        assert_eq!(backend.get_chat_count(), 0);
    }

    #[tokio::test]
    async fn test_default_chat_reply_echoes_the_message() {
        let backend = MockBackend::new();
        let history = vec![Turn::user(vec![ContentUnit::text("hello")])];
        let text = backend.chat_turn(&params(), &history).await.unwrap();
        assert_eq!(text.as_deref(), Some("Reply to: hello"));
    }
}
