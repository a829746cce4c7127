use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::InferenceResult;
use crate::client::{CompletionRequest, TextCompletion};
use errors::InferenceError;

/// Scripted [`TextCompletion`] for tests.
///
/// Queued results are returned in order; once the queue is empty the
/// fallback result (if any) is returned for every further call.
pub struct MockCompletion {
    responses: Mutex<VecDeque<InferenceResult<String>>>,
    fallback: Option<InferenceResult<String>>,
    calls: Mutex<Vec<CompletionRequest>>
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: None,
            calls: Mutex::new(Vec::new())
        }
    }

    /// Queues a successful completion.
    #[must_use]
    pub fn respond(mut self, content: impl Into<String>) -> Self {
        self.responses.get_mut().push_back(Ok(content.into()));
        self
    }

    /// Queues a failed completion.
    #[must_use]
    pub fn fail(mut self, error: InferenceError) -> Self {
        self.responses.get_mut().push_back(Err(error));
        self
    }

    /// Answers every call with `content` once the queue is drained.
    #[must_use]
    pub fn always(mut self, content: impl Into<String>) -> Self {
        self.fallback = Some(Ok(content.into()));
        self
    }

    /// Fails every call with `error` once the queue is drained.
    #[must_use]
    pub fn always_fail(mut self, error: InferenceError) -> Self {
        self.fallback = Some(Err(error));
        self
    }

    /// Requests received so far, oldest first.
    pub async fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl TextCompletion for MockCompletion {
    async fn complete(&self, request: &CompletionRequest) -> InferenceResult<String> {
        self.calls.lock().await.push(request.clone());

        if let Some(next) = self.responses.lock().await.pop_front() {
            return next;
        }
        self.fallback
            .clone()
            .unwrap_or_else(|| Err(InferenceError::call_failed("mock has no scripted response")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "system".to_string(),
            user: "user".to_string(),
            temperature: 0.3
        }
    }

    #[tokio::test]
    async fn test_queue_then_fallback() {
        let mock = MockCompletion::new()
            .respond("first")
            .fail(InferenceError::call_failed("boom"))
            .always("rest");

        assert_eq!(mock.complete(&request()).await.unwrap(), "first");
        assert!(mock.complete(&request()).await.is_err());
        assert_eq!(mock.complete(&request()).await.unwrap(), "rest");
        assert_eq!(mock.complete(&request()).await.unwrap(), "rest");
        assert_eq!(mock.call_count().await, 4);
    }

    #[tokio::test]
    async fn test_unscripted_mock_fails() {
        let mock = MockCompletion::new();
        let err = mock.complete(&request()).await.unwrap_err();
        assert!(matches!(err, InferenceError::UpstreamCallFailed { .. }));
    }
}
