use serde::{Deserialize, Serialize};

/// Request payload for `POST /ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural-language question.
    pub query: String,
}

/// Response payload for `POST /ask`.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// `faq`, `sql`, `small_talk` or `none`.
    pub route: &'static str,
    pub confidence: f32,
    /// Markdown answer.
    pub answer: String,
}
