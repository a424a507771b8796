use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use crate::agents::executor::run_tasks;
use crate::agents::plan::TaskKind;
use crate::agents::planner::Planner;
use crate::agents::synthesizer::synthesize;
use crate::agents::workers::{
    ResearchWorker, WeatherWorker, Worker, WorkerRegistry, WriterWorker,
};
use crate::capability::{CapabilityChannel, HttpCapabilityClient};
use crate::completion::{CompletionService, HttpCompletionClient};
use crate::config::{DOCUMENTS_ENDPOINT, RuntimeConfig, WEATHER_ENDPOINT, select_capability_endpoint};
use crate::error::CoordinatorError;
use crate::telemetry::TelemetrySink;

struct ManagedChannel {
    worker_name: &'static str,
    channel: Arc<dyn CapabilityChannel>,
}

/// Owns the workers and the planning/synthesis clients for its whole
/// lifetime. `initialize` must complete before any `process_request`;
/// repeated `process_request` calls are independent requests over the same
/// long-lived connections.
pub struct Coordinator {
    planner: Planner,
    registry: WorkerRegistry,
    writer: Arc<WriterWorker>,
    channels: Vec<ManagedChannel>,
    telemetry: TelemetrySink,
    initialized: bool,
    closed: bool,
}

impl Coordinator {
    /// Builds the full worker set from configuration. Fails here, not at
    /// first use, when the completion api key env is absent.
    pub fn from_config(cfg: &RuntimeConfig, telemetry: TelemetrySink) -> Result<Self> {
        let completion: Arc<dyn CompletionService> =
            Arc::new(HttpCompletionClient::from_config(cfg)?);

        let documents = select_capability_endpoint(cfg, DOCUMENTS_ENDPOINT)?;
        let weather = select_capability_endpoint(cfg, WEATHER_ENDPOINT)?;

        let research_channel: Arc<dyn CapabilityChannel> =
            Arc::new(HttpCapabilityClient::new(&documents)?);
        let weather_channel: Arc<dyn CapabilityChannel> =
            Arc::new(HttpCapabilityClient::new(&weather)?);

        Ok(Self::assemble(
            completion,
            research_channel,
            weather_channel,
            telemetry,
        ))
    }

    /// Wires workers to already-built collaborator clients. Split from
    /// `from_config` so tests can inject scripted implementations.
    pub fn assemble(
        completion: Arc<dyn CompletionService>,
        research_channel: Arc<dyn CapabilityChannel>,
        weather_channel: Arc<dyn CapabilityChannel>,
        telemetry: TelemetrySink,
    ) -> Self {
        let research = Arc::new(ResearchWorker::new(research_channel.clone()));
        let weather = Arc::new(WeatherWorker::new(weather_channel.clone()));
        let writer = Arc::new(WriterWorker::new(completion.clone()));

        let mut registry = WorkerRegistry::new();
        registry.register(TaskKind::Research, research.clone() as Arc<dyn Worker>);
        registry.register(TaskKind::Weather, weather.clone() as Arc<dyn Worker>);
        registry.register(TaskKind::Write, writer.clone() as Arc<dyn Worker>);

        let channels = vec![
            ManagedChannel {
                worker_name: research.name(),
                channel: research_channel,
            },
            ManagedChannel {
                worker_name: weather.name(),
                channel: weather_channel,
            },
        ];

        Self {
            planner: Planner::new(completion),
            registry,
            writer,
            channels,
            telemetry,
            initialized: false,
            closed: false,
        }
    }

    /// Probes every capability-bound worker's endpoint. A single failed
    /// probe is fatal for the coordinator's lifetime: no request may
    /// proceed against a worker that never connected.
    pub async fn initialize(&mut self) -> Result<()> {
        for managed in &self.channels {
            managed.channel.probe().await.map_err(|err| {
                CoordinatorError::Initialization {
                    worker: managed.worker_name.to_string(),
                    endpoint: managed.channel.endpoint_name().to_string(),
                    detail: format!("{err:#}"),
                }
            })?;
            tracing::info!(
                worker = managed.worker_name,
                endpoint = managed.channel.endpoint_name(),
                "worker connected"
            );
        }

        self.initialized = true;
        tracing::info!("all workers initialized");
        Ok(())
    }

    pub fn worker_summaries(&self) -> Vec<(&'static str, &'static str)> {
        self.registry.summaries()
    }

    /// Plan, execute, synthesize. A failure here aborts this request only;
    /// the coordinator stays usable for the next call.
    pub async fn process_request(&self, request: &str) -> Result<String> {
        if !self.initialized {
            return Err(anyhow::anyhow!(
                "coordinator is not initialized; call initialize() before process_request()"
            ));
        }

        tracing::info!(request_chars = request.len(), "analyzing request");
        self.telemetry
            .emit("request.started", json!({ "request_chars": request.len() }));

        let outcome = self.run_pipeline(request).await;
        match &outcome {
            Ok(_) => self.telemetry.emit("request.completed", json!({})),
            Err(err) => self
                .telemetry
                .emit("request.failed", json!({ "error": format!("{err:#}") })),
        }
        outcome
    }

    async fn run_pipeline(&self, request: &str) -> Result<String> {
        let plan = self.planner.create_plan(request).await?;
        let results = run_tasks(&plan, &self.registry, &self.telemetry).await?;
        Ok(synthesize(&plan, &results, &self.writer).await)
    }

    /// Idempotent; safe to call after a failed initialize as well.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.initialized = false;
        tracing::info!("coordinator closed");
    }
}
