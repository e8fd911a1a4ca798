//! Text generation backends.
//!
//! `GenaiGenerator` talks to any provider `genai` supports. `MockGenerator`
//! answers offline from the context alone. `ScriptedGenerator` (tests and the
//! `mock` feature) replays a fixed behaviour.

use std::collections::HashSet;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::debug;

use super::error::{GenerationError, GenerationResult};
use crate::constants::NOT_FOUND_SENTINEL;
use crate::text;

const SYSTEM_PROMPT: &str = "You answer questions about the user's documents. \
Use ONLY the provided context. Quote or closely paraphrase it and keep the answer short. \
If the context does not contain the answer, reply with exactly NOT_FOUND.";

#[async_trait]
/// Produces an answer to `question` from `context`.
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, context: &str, question: &str) -> GenerationResult<String>;

    /// Backend name for logs.
    fn name(&self) -> &str;
}

/// Builds the user turn sent to a chat model.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!("Context:\n{context}\n\nQuestion: {question}")
}

/// Chat-model backend.
pub struct GenaiGenerator {
    client: Client,
    model: String,
}

impl GenaiGenerator {
    /// Provider credentials are read from the environment by `genai`.
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GenaiGenerator {
    async fn generate(&self, context: &str, question: &str) -> GenerationResult<String> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(context, question)),
        ]);

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| GenerationError::Provider(e.to_string()))?;

        let text = response.first_text().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        debug!(model = %self.model, chars = text.len(), "Generation complete");
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Offline generator: replies with the context line sharing the most content
/// terms with the question, or the `NOT_FOUND` sentinel. Counting questions
/// favour lines that hold a numeral.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGenerator;

impl MockGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, context: &str, question: &str) -> GenerationResult<String> {
        let wanted: HashSet<String> = text::terms(question).into_iter().collect();
        let lowered = question.to_lowercase();
        let counting = lowered.contains("how many") || lowered.contains("number");

        let mut best: Option<(&str, usize)> = None;
        for line in context.lines() {
            let mut shared = text::terms(line)
                .into_iter()
                .collect::<HashSet<_>>()
                .intersection(&wanted)
                .count();
            if shared > 0 && counting && text::contains_numeral(line) {
                shared += 1;
            }
            if shared > 0 && best.is_none_or(|(_, top)| shared > top) {
                best = Some((line.trim(), shared));
            }
        }

        Ok(best
            .map(|(line, _)| line.to_string())
            .unwrap_or_else(|| NOT_FOUND_SENTINEL.to_string()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(any(test, feature = "mock"))]
pub use scripted::{Script, ScriptedGenerator};

#[cfg(any(test, feature = "mock"))]
mod scripted {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::TextGenerator;
    use crate::synthesis::error::{GenerationError, GenerationResult};

    /// Fixed behaviour for [`ScriptedGenerator`].
    #[derive(Debug, Clone)]
    pub enum Script {
        Reply(String),
        Fail(String),
        /// Sleeps, then replies.
        Delay(Duration, String),
        Empty,
    }

    /// Generator that plays one [`Script`] on every call and counts calls.
    #[derive(Debug)]
    pub struct ScriptedGenerator {
        script: Script,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        pub fn new(script: Script) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn reply(text: impl Into<String>) -> Self {
            Self::new(Script::Reply(text.into()))
        }

        pub fn failing(message: impl Into<String>) -> Self {
            Self::new(Script::Fail(message.into()))
        }

        pub fn delayed(delay: Duration, text: impl Into<String>) -> Self {
            Self::new(Script::Delay(delay, text.into()))
        }

        pub fn empty() -> Self {
            Self::new(Script::Empty)
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _context: &str, _question: &str) -> GenerationResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                Script::Reply(text) => Ok(text.clone()),
                Script::Fail(message) => Err(GenerationError::Provider(message.clone())),
                Script::Delay(delay, text) => {
                    tokio::time::sleep(*delay).await;
                    Ok(text.clone())
                }
                Script::Empty => Err(GenerationError::EmptyResponse),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}
