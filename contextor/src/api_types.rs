//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::Serialize;

/// A reference answer that was fed to the model, in rank order.
#[derive(Clone, Debug, Serialize)]
pub struct UsedEntry {
    pub score: f32,
    pub id: String,
    pub question: String,
    pub answer: String,
}

/// Final answer together with the exact context passed to the model.
///
/// # Example
/// ```
/// use contextor::{FaqAnswer, UsedEntry};
/// let qa = FaqAnswer {
///     answer: "Returns are accepted within 30 days.".into(),
///     context: vec![UsedEntry {
///         score: 0.91,
///         id: "id_4".into(),
///         question: "What is the return policy?".into(),
///         answer: "Returns are accepted within 30 days.".into(),
///     }],
/// };
/// assert_eq!(qa.context.len(), 1);
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct FaqAnswer {
    pub answer: String,
    pub context: Vec<UsedEntry>,
}
