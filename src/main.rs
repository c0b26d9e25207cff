mod telemetry;

use std::{path::PathBuf, sync::Arc};

use ai_llm_service::{
    config::default_config::{config_chat, config_embedding},
    service_profiles::LlmServiceProfiles,
};
use anyhow::Context;
use api::AppState;
use assistant::{Assistant, AssistantConfig};
use contextor::{Contextor, ContextorConfig};
use intent_router::{IntentRouter, RouterConfig};
use rag_store::{RagConfig, RagStore};
use sql_pipeline::{SqlConfig, SqlPipeline};
use tracing::{info, warn};

const DEFAULT_FAQ_CSV: &str = "resources/faq.csv";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment is used as is.
    let dotenv = dotenvy::dotenv();
    telemetry::init()?;
    if let Err(e) = dotenv {
        info!(reason = %e, "no .env loaded");
    }

    let chat = config_chat().context("chat profile")?;
    let embedding = config_embedding().context("embedding profile")?;
    let profiles = Arc::new(LlmServiceProfiles::new(chat, embedding, None)?);
    for h in profiles.health_all().await {
        if h.ok {
            info!(role = %h.role, model = %h.model, latency_ms = h.latency_ms, "provider reachable");
        } else {
            warn!(role = %h.role, endpoint = %h.endpoint, message = %h.message, "provider not reachable");
        }
    }

    let store = Arc::new(
        RagStore::from_config(RagConfig::from_env()?, profiles.clone())
            .context("FAQ index setup")?,
    );
    let faq_csv = std::env::var("FAQ_CSV_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FAQ_CSV));
    let generation = store
        .ingest_file(&faq_csv)
        .await
        .with_context(|| format!("ingesting {}", faq_csv.display()))?;
    info!(
        collection = %generation.collection,
        size = generation.size,
        backend = store.backend(),
        "FAQ index ready"
    );

    let router = IntentRouter::with_default_routes(profiles.clone(), RouterConfig::from_env()?)
        .await
        .context("intent router")?;

    let sql_cfg = SqlConfig::from_env();
    if !sql_cfg.db_path.exists() {
        warn!(path = %sql_cfg.db_path.display(), "catalog database not found; catalog questions will be answered with an apology");
    }

    let assistant = Assistant::new(
        router,
        Contextor::new(store.clone(), profiles.clone(), ContextorConfig::from_env()),
        SqlPipeline::with_sqlite(profiles.clone(), sql_cfg),
        profiles.clone(),
        AssistantConfig::from_env(),
    )?;

    api::start(AppState::new(Arc::new(assistant), profiles, store)).await?;
    Ok(())
}
