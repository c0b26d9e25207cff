//! In-process doubles for [`CompletionService`] and [`EmbeddingService`].
//!
//! Enabled for this crate's tests and, through the `test-util` feature, for
//! dependents' tests.

use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;

use crate::{
    AiLlmError, CompletionService, EmbeddingService, Result, chat::ChatRequest,
};

/// Dimension of [`HashingEmbedder`] vectors.
pub const HASHING_DIM: usize = 256;

/// Deterministic bag-of-words embedder.
///
/// Lowercases, splits on anything non-alphanumeric and hashes each token
/// (FNV-1a) into a fixed bucket. Texts sharing words end up with a high cosine
/// similarity, which is all the router and FAQ index need in tests.
#[derive(Debug, Default, Clone)]
pub struct HashingEmbedder;

impl HashingEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; HASHING_DIM];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let lower = token.to_lowercase();
            v[fnv1a(lower.as_bytes()) % HASHING_DIM] += 1.0;
        }
        v
    }
}

fn fnv1a(bytes: &[u8]) -> usize {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in bytes {
        h ^= u64::from(*b);
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    h as usize
}

#[async_trait]
impl EmbeddingService for HashingEmbedder {
    async fn encode(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(inputs.iter().map(|t| Self::vector(t)).collect())
    }
}

/// Embedder that always fails; exercises error propagation.
#[derive(Debug, Default, Clone)]
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingService for FailingEmbedder {
    async fn encode(&self, _inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(AiLlmError::EmptyResponse("embedding backend unavailable"))
    }
}

/// Completion backend that replays queued replies and records every request.
///
/// When the queue runs dry it answers with an [`AiLlmError::EmptyResponse`].
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String>>>,
    seen: Mutex<Vec<ChatRequest>>,
}

impl ScriptedCompletion {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Queues a failing reply.
    pub fn push_error(&self, err: AiLlmError) {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(Err(err));
        }
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().map(|s| s.len()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        let next = self.replies.lock().ok().and_then(|mut q| q.pop_front());
        next.unwrap_or(Err(AiLlmError::EmptyResponse("no scripted reply left")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashing_embedder_is_deterministic_and_case_insensitive() {
        let e = HashingEmbedder;
        let a = e.encode_one("Return Policy").await.unwrap();
        let b = e.encode_one("return policy").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), HASHING_DIM);
    }

    #[tokio::test]
    async fn scripted_completion_replays_in_order() {
        let llm = ScriptedCompletion::new(["one", "two"]);
        let req = ChatRequest::system_user("s", "u");
        assert_eq!(llm.complete(&req).await.unwrap(), "one");
        assert_eq!(llm.complete(&req).await.unwrap(), "two");
        assert!(llm.complete(&req).await.is_err());
        assert_eq!(llm.calls(), 3);
        assert_eq!(llm.requests()[0].user_prompt(), Some("u"));
    }
}
