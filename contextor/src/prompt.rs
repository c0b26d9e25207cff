//! Prompt builder: grounding rules + question + ranked context block.

use rag_store::FaqHit;

/// Sentence the model must use when the context does not cover the question.
pub const DONT_KNOW: &str = "I don't know based on the provided information.";

/// System instructions that bind the answer to the supplied context.
pub fn system_prompt() -> String {
    format!(
        "You are a question-answering assistant. Answer the QUESTION using ONLY the \
         information provided in the CONTEXT.\n\n\
         ### STRICT RULES:\n\
         1. Use ONLY information from the CONTEXT - do not use external knowledge.\n\
         2. If the CONTEXT does not contain the answer, respond with: \"{DONT_KNOW}\"\n\
         3. Never fabricate, guess, or infer information not explicitly stated in the CONTEXT.\n\
         4. Provide direct, factual answers without unnecessary elaboration."
    )
}

/// Answers of `hits` joined best-first, one per line. Empty when there are no hits.
pub fn context_block(hits: &[FaqHit]) -> String {
    hits.iter()
        .map(|h| h.entry.answer.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

/// User message carrying the question and the context block.
pub fn build_user_prompt(question: &str, hits: &[FaqHit]) -> String {
    format!(
        "### QUESTION:\n{}\n\n### CONTEXT:\n{}\n",
        question.trim(),
        context_block(hits)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_store::FaqEntry;

    fn hit(score: f32, answer: &str) -> FaqHit {
        FaqHit {
            score,
            entry: FaqEntry {
                id: "id_0".into(),
                question: "q".into(),
                answer: answer.into(),
            },
        }
    }

    #[test]
    fn context_keeps_rank_order() {
        let hits = [hit(0.9, "First answer."), hit(0.5, " Second answer. ")];
        assert_eq!(context_block(&hits), "First answer.\nSecond answer.");
    }

    #[test]
    fn empty_context_still_builds_prompt() {
        let p = build_user_prompt("  Is COD available?  ", &[]);
        assert!(p.starts_with("### QUESTION:\nIs COD available?\n"));
        assert!(p.ends_with("### CONTEXT:\n\n"));
    }

    #[test]
    fn rules_mention_fallback_sentence() {
        assert!(system_prompt().contains(DONT_KNOW));
    }
}
