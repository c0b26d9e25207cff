/// Presentation and small-talk settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    /// Marks bracketed catalog links without a scheme (`CATALOG_DOMAIN_MARKER`).
    pub domain_marker: String,
    pub small_talk_temperature: f32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            domain_marker: "myntra".to_string(),
            small_talk_temperature: 0.3,
        }
    }
}

impl AssistantConfig {
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            domain_marker: env("CATALOG_DOMAIN_MARKER")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(d.domain_marker),
            ..d
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_override() {
        assert_eq!(AssistantConfig::from_lookup(&|_| None).domain_marker, "myntra");
        let cfg = AssistantConfig::from_lookup(&|k| (k == "CATALOG_DOMAIN_MARKER").then(|| " ajio ".into()));
        assert_eq!(cfg.domain_marker, "ajio");
    }
}
