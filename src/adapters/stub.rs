//! Deterministic generator for tests and offline runs.
//!
//! Replies come from a script (consumed in call order) and then from a
//! fallback responder. Every call is counted and its prompt recorded.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{GenerationError, Generator};

type Responder = dyn Fn(&str) -> Result<String, GenerationError> + Send + Sync;
type DelayFn = dyn Fn(&str) -> Duration + Send + Sync;

/// Scripted, call-counting generator
pub struct StubGenerator {
    script: Mutex<VecDeque<Result<String, GenerationError>>>,
    fallback: Box<Responder>,
    delay: Option<Box<DelayFn>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    /// Answer every prompt through a function
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, GenerationError> + Send + Sync + 'static,
    {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Box::new(responder),
            delay: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always reply with the same text
    pub fn replying(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::from_fn(move |_| Ok(text.clone()))
    }

    /// Always fail with an unavailable error
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_fn(move |_| Err(GenerationError::Unavailable(message.clone())))
    }

    /// Reply with the scripted results in call order, then fail
    pub fn scripted(script: Vec<Result<String, GenerationError>>) -> Self {
        let stub = Self::from_fn(|_| {
            Err(GenerationError::Unavailable(
                "stub script exhausted".to_string(),
            ))
        });
        *stub.lock_script() = script.into_iter().collect();
        stub
    }

    /// Sleep before answering, per prompt
    pub fn with_delay<F>(mut self, delay: F) -> Self
    where
        F: Fn(&str) -> Duration + Send + Sync + 'static,
    {
        self.delay = Some(Box::new(delay));
        self
    }

    /// Number of `generate_content` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, GenerationError>>> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Generator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        if let Some(delay) = &self.delay {
            tokio::time::sleep(delay(prompt)).await;
        }

        let scripted = self.lock_script().pop_front();
        match scripted {
            Some(result) => result,
            None => (self.fallback)(prompt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_then_exhausted() {
        let stub = StubGenerator::scripted(vec![
            Ok("first".to_string()),
            Err(GenerationError::Request("boom".to_string())),
        ]);

        assert_eq!(stub.generate_content("a").await.unwrap(), "first");
        assert!(stub.generate_content("b").await.is_err());
        assert!(matches!(
            stub.generate_content("c").await,
            Err(GenerationError::Unavailable(_))
        ));
        assert_eq!(stub.call_count(), 3);
        assert_eq!(stub.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_replying() {
        let stub = StubGenerator::replying("same");
        assert_eq!(stub.generate_content("x").await.unwrap(), "same");
        assert_eq!(stub.generate_content("y").await.unwrap(), "same");
        assert_eq!(stub.name(), "stub");
    }
}
