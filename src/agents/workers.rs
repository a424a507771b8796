use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::agents::plan::TaskKind;
use crate::capability::CapabilityChannel;
use crate::completion::{CompletionRequest, CompletionService};
use crate::server::{SEARCH_CAPABILITY, WEATHER_CAPABILITY};

pub const WRITER_PERSONA: &str =
    "You are a professional writer. Format and present information clearly and engagingly.";
pub const WRITE_TASK_INSTRUCTION: &str = "Write based on this information:";

/// A capability-bound executor for one task kind. `execute` never errors:
/// transport and remote failures are absorbed into a descriptive result
/// string, which flows into the result table as ordinary content.
#[async_trait]
pub trait Worker: Send + Sync {
    fn name(&self) -> &'static str;
    fn capabilities(&self) -> &'static str;
    async fn execute(&self, input: &str) -> String;
}

pub struct ResearchWorker {
    channel: Arc<dyn CapabilityChannel>,
}

impl ResearchWorker {
    pub fn new(channel: Arc<dyn CapabilityChannel>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl Worker for ResearchWorker {
    fn name(&self) -> &'static str {
        "Researcher"
    }

    fn capabilities(&self) -> &'static str {
        "Searches through documents and knowledge base to find relevant information"
    }

    async fn execute(&self, input: &str) -> String {
        let arguments = HashMap::from([("query".to_string(), input.to_string())]);
        match self.channel.call(SEARCH_CAPABILITY, arguments).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "document search call failed");
                format!("Research failed: {err:#}")
            }
        }
    }
}

pub struct WeatherWorker {
    channel: Arc<dyn CapabilityChannel>,
}

impl WeatherWorker {
    pub fn new(channel: Arc<dyn CapabilityChannel>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl Worker for WeatherWorker {
    fn name(&self) -> &'static str {
        "WeatherExpert"
    }

    fn capabilities(&self) -> &'static str {
        "Retrieves current weather information for any city"
    }

    async fn execute(&self, input: &str) -> String {
        let arguments = HashMap::from([("city".to_string(), input.to_string())]);
        match self.channel.call(WEATHER_CAPABILITY, arguments).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "weather lookup call failed");
                format!("Weather lookup failed: {err:#}")
            }
        }
    }
}

/// Delegates straight to the completion service rather than a remote
/// capability. The synthesizer also uses it directly via [`Self::compose`].
pub struct WriterWorker {
    completion: Arc<dyn CompletionService>,
}

impl WriterWorker {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    pub async fn compose(&self, instruction: &str, content: &str) -> String {
        let request = CompletionRequest {
            system_instruction: WRITER_PERSONA.to_string(),
            user_content: format!("{instruction}\n\nContent:\n{content}"),
            require_json_object: false,
        };
        match self.completion.complete(request).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "writer completion call failed");
                format!("Writing failed: {err:#}")
            }
        }
    }
}

#[async_trait]
impl Worker for WriterWorker {
    fn name(&self) -> &'static str {
        "Writer"
    }

    fn capabilities(&self) -> &'static str {
        "Formats, summarizes, and writes content based on provided information"
    }

    async fn execute(&self, input: &str) -> String {
        self.compose(WRITE_TASK_INSTRUCTION, input).await
    }
}

/// Task-kind to worker mapping, built once at coordinator construction.
/// A lookup miss at execution time means the planner and the registry have
/// drifted apart, which the executor treats as fatal.
#[derive(Default)]
pub struct WorkerRegistry {
    workers: HashMap<TaskKind, Arc<dyn Worker>>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: TaskKind, worker: Arc<dyn Worker>) {
        self.workers.insert(kind, worker);
    }

    pub fn lookup(&self, kind: TaskKind) -> Option<Arc<dyn Worker>> {
        self.workers.get(&kind).cloned()
    }

    pub fn summaries(&self) -> Vec<(&'static str, &'static str)> {
        let mut summaries = self
            .workers
            .values()
            .map(|worker| (worker.name(), worker.capabilities()))
            .collect::<Vec<(&'static str, &'static str)>>();
        summaries.sort_by_key(|(name, _)| *name);
        summaries
    }
}
