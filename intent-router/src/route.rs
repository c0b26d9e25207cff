//! Route names, static route specs and their embedded form.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::error::RouterError;

/// The closed set of routes the dispatcher knows how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteName {
    Faq,
    Sql,
    SmallTalk,
}

impl RouteName {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteName::Faq => "faq",
            RouteName::Sql => "sql",
            RouteName::SmallTalk => "small_talk",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteName {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "faq" => Ok(RouteName::Faq),
            "sql" => Ok(RouteName::Sql),
            "small_talk" | "small-talk" | "smalltalk" => Ok(RouteName::SmallTalk),
            other => Err(RouterError::Config(format!("unknown route `{other}`"))),
        }
    }
}

/// Static description of a route: a name and its example utterances.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub name: RouteName,
    pub exemplars: Vec<String>,
}

impl RouteSpec {
    pub fn new<I, S>(name: RouteName, exemplars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name,
            exemplars: exemplars.into_iter().map(Into::into).collect(),
        }
    }
}

/// A route with its exemplar embeddings. Immutable once built.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: RouteName,
    pub exemplars: Vec<String>,
    pub exemplar_embeddings: Vec<Vec<f32>>,
    pub(crate) centroid: Vec<f32>,
}

/// Outcome of classification.
///
/// `route` is `None` when nothing cleared the acceptance threshold;
/// `confidence` is the best similarity seen either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoutedIntent {
    pub route: Option<RouteName>,
    pub confidence: f32,
}

impl RoutedIntent {
    /// Route name, `"none"` when unmatched.
    pub fn name(&self) -> &'static str {
        self.route.map(RouteName::as_str).unwrap_or("none")
    }
}
