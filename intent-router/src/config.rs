use std::str::FromStr;

use crate::error::{Result, RouterError};

/// How a route's score is derived from its exemplars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// Best single exemplar.
    #[default]
    Max,
    /// Similarity to the mean exemplar embedding.
    Centroid,
}

impl FromStr for MatchStrategy {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" => Ok(Self::Max),
            "centroid" | "mean" => Ok(Self::Centroid),
            other => Err(RouterError::Config(format!(
                "ROUTER_STRATEGY must be `max` or `centroid`, got `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouterConfig {
    /// A route is accepted only when its score exceeds this value.
    pub threshold: f32,
    pub strategy: MatchStrategy,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            strategy: MatchStrategy::Max,
        }
    }
}

impl RouterConfig {
    /// Reads `ROUTER_THRESHOLD` and `ROUTER_STRATEGY` through `env`.
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(raw) = env("ROUTER_THRESHOLD").filter(|v| !v.trim().is_empty()) {
            cfg.threshold = raw
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|t| (-1.0..=1.0).contains(t))
                .ok_or_else(|| {
                    RouterError::Config(format!(
                        "ROUTER_THRESHOLD must be a number in [-1, 1], got `{raw}`"
                    ))
                })?;
        }
        if let Some(raw) = env("ROUTER_STRATEGY").filter(|v| !v.trim().is_empty()) {
            cfg.strategy = raw.parse()?;
        }
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_validates() {
        let cfg = RouterConfig::from_lookup(&|k| match k {
            "ROUTER_THRESHOLD" => Some("0.35".into()),
            "ROUTER_STRATEGY" => Some("Centroid".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.threshold, 0.35);
        assert_eq!(cfg.strategy, MatchStrategy::Centroid);

        assert!(RouterConfig::from_lookup(&|k| (k == "ROUTER_THRESHOLD").then(|| "2".into())).is_err());
        assert!(RouterConfig::from_lookup(&|k| (k == "ROUTER_STRATEGY").then(|| "knn".into())).is_err());
        assert_eq!(RouterConfig::from_lookup(&|_| None).unwrap(), RouterConfig::default());
    }
}
