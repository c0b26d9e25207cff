//! Semantic intent router.
//!
//! Every route carries example utterances. They are embedded once when the
//! router is built; a query is embedded and compared (cosine) against them.
//! The best route wins if its score exceeds the acceptance threshold,
//! otherwise the intent is `none`.

mod config;
mod error;
mod route;
mod routes;

pub use config::{MatchStrategy, RouterConfig};
pub use error::{Result, RouterError};
pub use route::{Route, RouteName, RoutedIntent, RouteSpec};
pub use routes::default_routes;

use std::{collections::HashSet, sync::Arc};

use ai_llm_service::{
    EmbeddingService,
    similarity::{centroid, cosine_similarity},
};
use tracing::{debug, info, instrument, warn};

/// Nearest-exemplar classifier over an immutable route table.
pub struct IntentRouter {
    routes: Vec<Route>,
    embedder: Arc<dyn EmbeddingService>,
    cfg: RouterConfig,
}

impl IntentRouter {
    /// Embeds every exemplar and freezes the route table.
    ///
    /// # Errors
    /// - [`RouterError::Config`] for duplicate route names, routes without
    ///   exemplars, or exemplar embeddings of differing dimensions
    /// - [`RouterError::Embedding`] if the embedding backend fails
    pub async fn build(
        specs: Vec<RouteSpec>,
        embedder: Arc<dyn EmbeddingService>,
        cfg: RouterConfig,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.name) {
                return Err(RouterError::Config(format!("duplicate route `{}`", spec.name)));
            }
            if spec.exemplars.is_empty() {
                return Err(RouterError::Config(format!(
                    "route `{}` has no exemplars",
                    spec.name
                )));
            }
        }

        let all: Vec<String> = specs.iter().flat_map(|s| s.exemplars.clone()).collect();
        let mut vectors = embedder.encode(&all).await?.into_iter();
        if vectors.len() != all.len() {
            return Err(RouterError::Config(format!(
                "embedding backend returned {} vectors for {} exemplars",
                vectors.len(),
                all.len()
            )));
        }

        let mut dim = None;
        let mut routes = Vec::with_capacity(specs.len());
        for spec in specs {
            let embeddings: Vec<Vec<f32>> = vectors.by_ref().take(spec.exemplars.len()).collect();
            for v in &embeddings {
                match dim {
                    None => dim = Some(v.len()),
                    Some(d) if d != v.len() => {
                        return Err(RouterError::Config(format!(
                            "exemplar embeddings differ in dimension ({d} vs {})",
                            v.len()
                        )));
                    }
                    Some(_) => {}
                }
            }
            let center = centroid(&embeddings).unwrap_or_default();
            routes.push(Route {
                name: spec.name,
                exemplars: spec.exemplars,
                exemplar_embeddings: embeddings,
                centroid: center,
            });
        }

        info!(
            routes = routes.len(),
            exemplars = all.len(),
            threshold = cfg.threshold,
            strategy = ?cfg.strategy,
            "intent router ready"
        );
        Ok(Self {
            routes,
            embedder,
            cfg,
        })
    }

    /// Router over [`default_routes`].
    pub async fn with_default_routes(
        embedder: Arc<dyn EmbeddingService>,
        cfg: RouterConfig,
    ) -> Result<Self> {
        Self::build(default_routes(), embedder, cfg).await
    }

    /// Embeds `query` and classifies it.
    ///
    /// # Errors
    /// [`RouterError::Embedding`] when the embedding backend is unavailable.
    #[instrument(skip_all)]
    pub async fn classify(&self, query: &str) -> Result<RoutedIntent> {
        let qv = self.embedder.encode_one(query).await?;
        let intent = self.classify_embedding(&qv);
        debug!(route = intent.name(), confidence = intent.confidence, "query classified");
        Ok(intent)
    }

    /// Pure classification of an already embedded query.
    ///
    /// Routes are scanned in registration order and only a strictly greater
    /// score replaces the current best, so the first route wins exact ties.
    /// Non-finite scores never compete.
    pub fn classify_embedding(&self, query: &[f32]) -> RoutedIntent {
        let mut best: Option<(RouteName, f32)> = None;
        for route in &self.routes {
            let score = self.route_score(route, query);
            if !score.is_finite() {
                warn!(route = %route.name, "non-finite route score skipped");
                continue;
            }
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((route.name, score));
            }
        }

        match best {
            Some((name, score)) if score > self.cfg.threshold => RoutedIntent {
                route: Some(name),
                confidence: score,
            },
            Some((_, score)) => RoutedIntent {
                route: None,
                confidence: score,
            },
            None => RoutedIntent {
                route: None,
                confidence: 0.0,
            },
        }
    }

    fn route_score(&self, route: &Route, query: &[f32]) -> f32 {
        match self.cfg.strategy {
            MatchStrategy::Max => route
                .exemplar_embeddings
                .iter()
                .map(|e| cosine_similarity(query, e))
                .fold(f32::NEG_INFINITY, f32::max),
            MatchStrategy::Centroid => cosine_similarity(query, &route.centroid),
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn config(&self) -> &RouterConfig {
        &self.cfg
    }
}
