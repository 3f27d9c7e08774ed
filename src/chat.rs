//! Stateful multi-turn chat sessions
//!
//! A session owns its transcript and fixed generation parameters. Sessions
//! are request/response chains keyed by accumulated history; closing one is
//! purely local and needs no backend teardown.

use crate::ai::GenerationBackend;
use crate::models::{ChatParams, ContentUnit, Role, Turn};
use crate::{Error, Result};
use std::sync::{Arc, Mutex};

/// Appended in place of a model reply when the backend answers with no text,
/// so the transcript never silently drops a turn.
pub const NO_REPLY_PLACEHOLDER: &str = "Could not generate an answer. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Sending,
    Closed,
}

struct Entry {
    seq: u64,
    turn: Turn,
}

struct SessionInner {
    entries: Vec<Entry>,
    next_seq: u64,
    in_flight: usize,
    closed: bool,
}

/// One conversational surface's session. The owning surface holds exactly
/// one instance and discards it on close.
pub struct ChatSession {
    backend: Arc<dyn GenerationBackend>,
    params: ChatParams,
    inner: Mutex<SessionInner>,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn GenerationBackend>, params: ChatParams) -> Self {
        Self {
            backend,
            params,
            inner: Mutex::new(SessionInner {
                entries: Vec::new(),
                next_seq: 0,
                in_flight: 0,
                closed: false,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        let inner = self.inner.lock().unwrap();
        if inner.closed {
            SessionState::Closed
        } else if inner.in_flight > 0 {
            SessionState::Sending
        } else {
            SessionState::Ready
        }
    }

    /// Session-wide parameters; fixed for the session's lifetime.
    pub fn params(&self) -> &ChatParams {
        &self.params
    }

    /// UI-facing transcript view, in submission order.
    pub fn transcript(&self) -> Vec<(Role, String)> {
        let inner = self.inner.lock().unwrap();
        inner
            .entries
            .iter()
            .map(|entry| (entry.turn.role, entry.turn.text()))
            .collect()
    }

    pub async fn send(&self, message: impl Into<String>) -> Result<String> {
        self.send_parts(vec![ContentUnit::text(message.into())])
            .await
    }

    /// Submit one user turn and wait for the reply.
    ///
    /// The user turn is appended optimistically before the backend call, so
    /// the transcript always reflects submission order. The reply is
    /// inserted directly after its own user turn: overlapping sends that
    /// complete out of order cannot reorder the transcript.
    pub async fn send_parts(&self, parts: Vec<ContentUnit>) -> Result<String> {
        let (seq, history) = {
            let mut inner = self.inner.lock().unwrap();
            if inner.closed {
                return Err(Error::SessionClosed);
            }
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.entries.push(Entry {
                seq,
                turn: Turn::user(parts),
            });
            inner.in_flight += 1;
            let history: Vec<Turn> = inner.entries.iter().map(|e| e.turn.clone()).collect();
            (seq, history)
        };

        let outcome = self.backend.chat_turn(&self.params, &history).await;

        let mut inner = self.inner.lock().unwrap();
        inner.in_flight -= 1;

        if inner.closed {
            // Surface was dismissed mid-flight; the reply is discarded.
            tracing::debug!("Discarding chat reply for closed session");
            return Err(Error::SessionClosed);
        }

        let reply = match outcome {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::warn!("Backend returned no text for chat turn");
                NO_REPLY_PLACEHOLDER.to_string()
            }
            Err(e) => return Err(e),
        };

        let position = inner
            .entries
            .iter()
            .position(|entry| entry.seq == seq)
            .map(|idx| idx + 1)
            .unwrap_or(inner.entries.len());
        let reply_seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(
            position,
            Entry {
                seq: reply_seq,
                turn: Turn::model(reply.clone()),
            },
        );

        Ok(reply)
    }

    /// Dismiss the session. In-flight calls are allowed to complete; their
    /// results are discarded without touching the transcript.
    pub fn close(&self) {
        self.inner.lock().unwrap().closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use std::time::Duration;

    fn params() -> ChatParams {
        ChatParams {
            system_instruction: "You are an interview coach.".to_string(),
            temperature: Some(0.7),
        }
    }

    fn session_with(backend: MockBackend) -> ChatSession {
        ChatSession::new(Arc::new(backend), params())
    }

    #[tokio::test]
    async fn test_turns_alternate_in_request_response_pairs() {
        let session = session_with(
            MockBackend::new()
                .with_response("first reply")
                .with_response("second reply"),
        );

        session.send("first question").await.unwrap();
        session.send("second question").await.unwrap();

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 4);
        assert_eq!(
            transcript[0],
            (Role::User, "first question".to_string())
        );
        assert_eq!(transcript[1], (Role::Model, "first reply".to_string()));
        assert_eq!(
            transcript[2],
            (Role::User, "second question".to_string())
        );
        assert_eq!(transcript[3], (Role::Model, "second reply".to_string()));
    }

    #[tokio::test]
    async fn test_overlapping_sends_keep_submission_order() {
        // "A" resolves long after "B"; the transcript must still read
        // A, reply-to-A, B, reply-to-B.
        let session = session_with(
            MockBackend::new()
                .with_keyed_reply("A", "reply to A", 80)
                .with_keyed_reply("B", "reply to B", 5),
        );

        let (a, b) = tokio::join!(session.send("A"), session.send("B"));
        assert_eq!(a.unwrap(), "reply to A");
        assert_eq!(b.unwrap(), "reply to B");

        let transcript = session.transcript();
        assert_eq!(
            transcript,
            vec![
                (Role::User, "A".to_string()),
                (Role::Model, "reply to A".to_string()),
                (Role::User, "B".to_string()),
                (Role::Model, "reply to B".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_text_reply_appends_placeholder_instead_of_throwing() {
        let session = session_with(MockBackend::new().with_empty_response());

        let reply = session.send("hello").await.unwrap();
        assert_eq!(reply, NO_REPLY_PLACEHOLDER);

        let transcript = session.transcript();
        assert_eq!(transcript[1], (Role::Model, NO_REPLY_PLACEHOLDER.to_string()));
    }

    #[tokio::test]
    async fn test_backend_errors_propagate_and_keep_the_user_turn() {
        let session = session_with(MockBackend::new().with_unavailable("down"));

        let err = session.send("hello").await.unwrap_err();
        assert!(matches!(err, Error::BackendUnavailable(_)));

        let transcript = session.transcript();
        assert_eq!(transcript, vec![(Role::User, "hello".to_string())]);
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_send_after_close_fails() {
        let session = session_with(MockBackend::new());
        session.close();

        let err = session.send("hello").await.unwrap_err();
        assert!(matches!(err, Error::SessionClosed));
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_close_during_flight_discards_the_reply() {
        let backend = MockBackend::new().with_keyed_reply("slow", "late reply", 50);
        let session = Arc::new(session_with(backend));

        let sender = {
            let session = session.clone();
            tokio::spawn(async move { session.send("slow question").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        session.close();

        let outcome = sender.await.unwrap();
        assert!(matches!(outcome.unwrap_err(), Error::SessionClosed));

        // Only the optimistic user turn remains; the late reply never lands.
        let transcript = session.transcript();
        assert_eq!(transcript, vec![(Role::User, "slow question".to_string())]);
    }

    #[tokio::test]
    async fn test_state_reflects_in_flight_sends() {
        let backend = MockBackend::new().with_keyed_reply("ping", "pong", 50);
        let session = Arc::new(session_with(backend));
        assert_eq!(session.state(), SessionState::Ready);

        let sender = {
            let session = session.clone();
            tokio::spawn(async move { session.send("ping").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(session.state(), SessionState::Sending);

        sender.await.unwrap().unwrap();
        assert_eq!(session.state(), SessionState::Ready);
    }
}
