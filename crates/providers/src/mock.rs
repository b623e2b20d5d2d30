//! Mock adapter for offline runs and tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use dcl_core::{AdapterError, GenerationAdapter, InvocationContext};
use tracing::debug;

/// Returns a fixed response, or a frame-count summary when none is set.
/// Remembers the last context it was handed.
#[derive(Debug, Default)]
pub struct MockAdapter {
    response: Option<String>,
    last_context: Mutex<Option<InvocationContext>>,
}

impl MockAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer with `response`.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            last_context: Mutex::new(None),
        }
    }

    /// The context passed to the most recent `invoke` call.
    pub fn last_context(&self) -> Option<InvocationContext> {
        self.last_context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl GenerationAdapter for MockAdapter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn invoke(&self, context: &InvocationContext) -> Result<String, AdapterError> {
        debug!(frames = context.frames.len(), "Mock adapter invoked");
        *self.last_context.lock().unwrap_or_else(PoisonError::into_inner) = Some(context.clone());

        Ok(match &self.response {
            Some(response) => response.clone(),
            None => format!("Mock response. Received {} frames.", context.frames.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcl_core::ContentFrame;

    #[tokio::test]
    async fn echoes_frame_count() {
        let adapter = MockAdapter::new();
        let context = InvocationContext::new(vec![ContentFrame::text("a"), ContentFrame::text("b")]);
        assert_eq!(adapter.invoke(&context).await.unwrap(), "Mock response. Received 2 frames.");
    }

    #[tokio::test]
    async fn fixed_response_and_last_context() {
        let adapter = MockAdapter::with_response("Generated Content");
        assert!(adapter.last_context().is_none());

        let context = InvocationContext::new(vec![ContentFrame::text("hello")]);
        assert_eq!(adapter.invoke(&context).await.unwrap(), "Generated Content");
        assert_eq!(adapter.last_context(), Some(context));
        assert!(adapter.health_check().await.unwrap());
    }
}
