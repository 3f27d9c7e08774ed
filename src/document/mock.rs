use super::TextExtractor;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockTextExtractor {
    text: Arc<Mutex<Option<String>>>,
    failure: Arc<Mutex<Option<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockTextExtractor {
    pub fn new() -> Self {
        Self {
            text: Arc::new(Mutex::new(None)),
            failure: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_text(self, text: String) -> Self {
        *self.text.lock().unwrap() = Some(text);
        self
    }

    pub fn with_failure(self, message: String) -> Self {
        *self.failure.lock().unwrap() = Some(message);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for MockTextExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::DocumentRead(message));
        }

        Ok(self
            .text
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| format!("extracted text ({} bytes)", bytes.len())))
    }
}
