use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::GenerationError;
use crate::provider::GenerationProvider;

/// Pre-programmed provider for deterministic tests without network.
/// Each call (copy or image) pops the next configured reply in order.
pub struct MockProvider {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    call_count: AtomicUsize,
}

impl MockProvider {
    pub fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Convenience: a provider that always has one successful reply.
    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_owned())])
    }

    /// Convenience: a provider whose next call fails.
    pub fn failing(error: GenerationError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    fn next_reply(&self) -> Result<String, GenerationError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.replies.lock().pop_front().unwrap_or(Err(
            GenerationError::InvalidRequest("MockProvider: no reply configured".into()),
        ))
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_copy(
        &self,
        _product_name: &str,
        _audience: &str,
        _tone: &str,
    ) -> Result<String, GenerationError> {
        self.next_reply()
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.next_reply()
    }
}
