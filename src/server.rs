use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::capability::{CapabilityCallRequest, CapabilityCallResponse};
use crate::config::RuntimeConfig;

pub const SEARCH_CAPABILITY: &str = "search_documents";
pub const WEATHER_CAPABILITY: &str = "get_weather";

const MAX_SEARCH_RESULTS: usize = 3;

#[derive(Debug, Clone)]
pub struct IndexedSection {
    pub source: String,
    pub content: String,
}

/// Keyword search over plain-text documents, split into blank-line sections.
#[derive(Debug, Default)]
pub struct SearchEngine {
    sections: Vec<IndexedSection>,
}

impl SearchEngine {
    pub fn load(documents_dir: &str) -> Result<Self> {
        let dir = Path::new(documents_dir);
        if !dir.is_dir() {
            tracing::warn!(dir = documents_dir, "documents directory not found; search index is empty");
            return Ok(Self::default());
        }

        let mut sections = Vec::new();
        let mut files = 0usize;
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read documents directory '{documents_dir}'"))?;

        for entry in entries {
            let path = entry
                .with_context(|| format!("failed to list documents directory '{documents_dir}'"))?
                .path();
            let is_text = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext == "txt" || ext == "md")
                .unwrap_or(false);
            if !is_text {
                continue;
            }

            let source = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read document '{}'", path.display()))?;

            files += 1;
            for chunk in content.split("\n\n") {
                let trimmed = chunk.trim();
                if trimmed.is_empty() {
                    continue;
                }
                sections.push(IndexedSection {
                    source: source.clone(),
                    content: trimmed.to_string(),
                });
            }
        }

        tracing::info!(sections = sections.len(), files = files, "document index built");
        Ok(Self { sections })
    }

    pub fn query_terms(query: &str) -> Vec<String> {
        query
            .split_whitespace()
            .map(|token| token.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase)
            .filter(|token| token.len() > 2)
            .collect::<Vec<String>>()
    }

    pub fn search(&self, query: &str, max_results: usize) -> Vec<(IndexedSection, usize)> {
        let terms = Self::query_terms(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored = self
            .sections
            .iter()
            .filter_map(|section| {
                let body = section.content.to_ascii_lowercase();
                let score = terms
                    .iter()
                    .filter(|term| body.contains(term.as_str()))
                    .count();
                (score > 0).then(|| (section.clone(), score))
            })
            .collect::<Vec<(IndexedSection, usize)>>();

        scored.sort_by_key(|(_, score)| std::cmp::Reverse(*score));
        scored.truncate(max_results.max(1));
        scored
    }

    pub fn render_results(&self, query: &str) -> String {
        let results = self.search(query, MAX_SEARCH_RESULTS);
        if results.is_empty() {
            return format!("No relevant documents found for \"{query}\".");
        }

        let mut out = String::from("Found relevant information:\n\n");
        for (section, _score) in results {
            out.push_str(&format!("[{}] {}\n\n", section.source, section.content));
        }
        out
    }
}

pub fn weather_report(city: &str) -> String {
    format!("Weather in {city}: Sunny, 25°C")
}

#[derive(Clone)]
pub struct CapabilityServerState {
    pub search: Arc<SearchEngine>,
}

/// Dispatch a capability call against the built-in stubs. Always yields a
/// wire-level response; unknown capabilities and missing arguments come back
/// as the error variant.
pub fn dispatch_capability(
    state: &CapabilityServerState,
    request: &CapabilityCallRequest,
) -> CapabilityCallResponse {
    match request.capability.as_str() {
        SEARCH_CAPABILITY => match request.arguments.get("query") {
            Some(query) => CapabilityCallResponse {
                text: Some(state.search.render_results(query)),
                error: None,
            },
            None => CapabilityCallResponse {
                text: None,
                error: Some("search_documents requires a 'query' argument".to_string()),
            },
        },
        WEATHER_CAPABILITY => match request.arguments.get("city") {
            Some(city) => CapabilityCallResponse {
                text: Some(weather_report(city)),
                error: None,
            },
            None => CapabilityCallResponse {
                text: None,
                error: Some("get_weather requires a 'city' argument".to_string()),
            },
        },
        other => CapabilityCallResponse {
            text: None,
            error: Some(format!("unknown capability: {other}")),
        },
    }
}

pub async fn handle_healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn handle_call(
    State(state): State<Arc<CapabilityServerState>>,
    Json(request): Json<CapabilityCallRequest>,
) -> Json<CapabilityCallResponse> {
    let response = dispatch_capability(&state, &request);
    if let Some(error) = response.error.as_deref() {
        tracing::warn!(capability = %request.capability, error = error, "capability call rejected");
    }
    Json(response)
}

pub fn build_capability_router(state: Arc<CapabilityServerState>) -> Router {
    Router::new()
        .route("/healthz", get(handle_healthz))
        .route("/call", post(handle_call))
        .with_state(state)
}

pub async fn run_capability_server(cfg: &RuntimeConfig, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}")
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid capability server bind address '{host}:{port}'"))?;

    let state = Arc::new(CapabilityServerState {
        search: Arc::new(SearchEngine::load(&cfg.documents_dir)?),
    });

    println!(
        "Capability stub server listening on http://{addr} (health: /healthz, call: /call; capabilities: {SEARCH_CAPABILITY}, {WEATHER_CAPABILITY})"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind capability server listener")?;
    axum::serve(listener, build_capability_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("capability server runtime failed")
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { println!("\nReceived Ctrl+C, shutting down gracefully..."); }
        _ = terminate => { println!("\nReceived SIGTERM, shutting down gracefully..."); }
    }
}
