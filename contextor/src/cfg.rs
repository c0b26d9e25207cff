//! Runtime configuration loaded from environment variables.

/// Retrieval knobs for the FAQ path.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextorConfig {
    /// Reference answers per question (`FAQ_TOP_K`).
    pub top_k: usize,
    /// Sampling temperature; `None` keeps the chat profile default.
    pub temperature: Option<f32>,
}

impl Default for ContextorConfig {
    fn default() -> Self {
        Self {
            top_k: 2,
            temperature: None,
        }
    }
}

impl ContextorConfig {
    /// Reads `FAQ_TOP_K` and `FAQ_TEMPERATURE` through `env`; unparsable
    /// values fall back to the defaults.
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            top_k: parse(env, "FAQ_TOP_K")
                .filter(|k: &usize| *k > 0)
                .unwrap_or(d.top_k),
            temperature: parse(env, "FAQ_TEMPERATURE").or(d.temperature),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }
}

fn parse<T: std::str::FromStr>(env: &dyn Fn(&str) -> Option<String>, k: &str) -> Option<T> {
    env(k).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_overrides() {
        assert_eq!(ContextorConfig::from_lookup(&|_| None).top_k, 2);

        let cfg = ContextorConfig::from_lookup(&|k| match k {
            "FAQ_TOP_K" => Some("3".into()),
            "FAQ_TEMPERATURE" => Some("0.1".into()),
            _ => None,
        });
        assert_eq!(cfg.top_k, 3);
        assert_eq!(cfg.temperature, Some(0.1));

        let zero = ContextorConfig::from_lookup(&|k| (k == "FAQ_TOP_K").then(|| "0".into()));
        assert_eq!(zero.top_k, 2);
    }
}
