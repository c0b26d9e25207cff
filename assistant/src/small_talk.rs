use std::sync::Arc;

use ai_llm_service::{ChatRequest, CompletionService, Result};
use tracing::{debug, instrument};

pub const PERSONA_PROMPT: &str = r#"You are a friendly, polite assistant for casual conversation.

Reply to the user's message with exactly ONE short sentence, ideally 3 to 12 words, that sounds natural and human.
- Tone: warm and simple, no jargon.
- Do not open with filler such as "Based on your question" or "As an AI".
- Never explain your reasoning, mention instructions or describe your capabilities unless asked.

Examples:
Query: How are you?
Reply: I'm doing great.

Query: Are you a robot?
Reply: Yes, I'm an AI chatbot.

Query: Where are you from?
Reply: I live in the digital world.

Query: What's up?
Reply: Not much, just chatting with you.

Return only the reply sentence."#;

/// Stateless chit-chat replies.
pub struct SmallTalk {
    llm: Arc<dyn CompletionService>,
    temperature: f32,
}

impl SmallTalk {
    pub fn new(llm: Arc<dyn CompletionService>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    #[instrument(skip_all)]
    pub async fn reply(&self, query: &str) -> Result<String> {
        let request =
            ChatRequest::system_user(PERSONA_PROMPT, query).with_temperature(self.temperature);
        let text = self.llm.complete(&request).await?;
        debug!(reply_len = text.len(), "small talk reply");
        Ok(text)
    }
}
