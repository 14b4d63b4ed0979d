//! Prompt assembly and chat-completion calls

use std::sync::Arc;

use crate::domain::errors::ChatApiError;
use crate::domain::models::SearchResult;
use crate::domain::ports::{ChatClient, ChatCompletion, ChatMessage};

/// Placed between retrieved chunks in the user message
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

const CONTEXT_INSTRUCTION: &str = "Use the following context to answer the question. \
If the context does not contain the answer, answer from your general knowledge.";

/// Builds the system/user message pair and sends it to the chat client
pub struct GenerationService {
    client: Arc<dyn ChatClient>,
    persona: String,
}

impl GenerationService {
    pub fn new(client: Arc<dyn ChatClient>, persona: impl Into<String>) -> Self {
        Self {
            client,
            persona: persona.into(),
        }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// System message with the persona, user message with context and prompt
    ///
    /// Without context the user message is the prompt alone.
    pub fn build_messages(&self, prompt: &str, context: &[SearchResult]) -> Vec<ChatMessage> {
        let user = if context.is_empty() {
            prompt.to_string()
        } else {
            let joined = context
                .iter()
                .map(|result| result.content.as_str())
                .collect::<Vec<_>>()
                .join(CONTEXT_SEPARATOR);
            format!("{CONTEXT_INSTRUCTION}\n\nContext:\n{joined}\n\nQuestion: {prompt}")
        };

        vec![ChatMessage::system(self.persona.clone()), ChatMessage::user(user)]
    }

    pub async fn generate(
        &self,
        prompt: &str,
        context: &[SearchResult],
    ) -> Result<ChatCompletion, ChatApiError> {
        let messages = self.build_messages(prompt, context);
        self.client.complete(&messages).await
    }
}
