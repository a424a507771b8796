use std::sync::Arc;

use anyhow::Result;

use crate::agents::plan::ExecutionPlan;
use crate::completion::{CompletionRequest, CompletionService};
use crate::error::CoordinatorError;

pub const PLANNER_INSTRUCTION: &str = r#"You are a task planning AI. Analyze user requests and create execution plans.

Available workers:
- Researcher: Searches documents and knowledge base
- WeatherExpert: Gets weather for cities
- Writer: Formats and summarizes content

Return a JSON plan with this structure:
{
  "tasks": [
    {"type": "research|weather|write", "description": "...", "input": "..."}
  ],
  "finalSynthesis": "How to combine results"
}

Examples:
User: "What's the weather in Paris?"
Plan: {"tasks": [{"type": "weather", "description": "Get Paris weather", "input": "Paris"}], "finalSynthesis": "Return weather data"}

User: "Write a blog about weather in London"
Plan: {"tasks": [{"type": "weather", "description": "Get London weather", "input": "London"}, {"type": "write", "description": "Create blog post", "input": "Write engaging blog post about: {weather_result}"}], "finalSynthesis": "Return blog post"}"#;

/// Converts a natural-language request into an [`ExecutionPlan`] via the
/// completion service. A reply that does not parse as a raw JSON object is
/// fatal to the request; there is no retry, no fence tolerance, and no
/// fallback single-task plan.
pub struct Planner {
    completion: Arc<dyn CompletionService>,
}

impl Planner {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    pub async fn create_plan(&self, request: &str) -> Result<ExecutionPlan> {
        let reply = self
            .completion
            .complete(CompletionRequest {
                system_instruction: PLANNER_INSTRUCTION.to_string(),
                user_content: request.to_string(),
                require_json_object: true,
            })
            .await
            .map_err(|err| CoordinatorError::Completion {
                detail: format!("{err:#}"),
            })?;

        let plan = serde_json::from_str::<ExecutionPlan>(reply.trim()).map_err(|err| {
            CoordinatorError::PlanParse {
                detail: err.to_string(),
            }
        })?;

        tracing::info!(tasks = plan.tasks.len(), "execution plan created");
        Ok(plan)
    }
}
