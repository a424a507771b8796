use anyhow::Result;
use serde_json::json;

use crate::agents::plan::{ExecutionPlan, ResultTable, resolve_placeholders};
use crate::agents::workers::WorkerRegistry;
use crate::error::CoordinatorError;
use crate::telemetry::TelemetrySink;

/// Walks the plan's tasks strictly in order: task i+1 never starts before
/// task i's worker call returns, because later inputs may reference earlier
/// outputs via placeholders.
///
/// Each result is recorded under two keys: positional (`task{i}_result`) and
/// kind-named (`{kind}_result`, overwritten by the last task of that kind).
/// A worker's internal failure string is recorded like any other result and
/// the loop continues; only an unregistered task kind aborts the request.
pub async fn run_tasks(
    plan: &ExecutionPlan,
    registry: &WorkerRegistry,
    telemetry: &TelemetrySink,
) -> Result<ResultTable> {
    let mut results = ResultTable::new();

    for (index, task) in plan.tasks.iter().enumerate() {
        let input = resolve_placeholders(&task.input, &results);

        let worker = registry.lookup(task.kind).ok_or_else(|| {
            CoordinatorError::UnknownTaskKind {
                kind: task.kind.label().to_string(),
                position: index,
            }
        })?;

        tracing::info!(
            task = index,
            kind = task.kind.label(),
            worker = worker.name(),
            description = %task.description,
            "delegating task"
        );

        let output = worker.execute(&input).await;

        results.insert(format!("task{index}_result"), output.clone());
        results.insert(format!("{}_result", task.kind.label()), output);

        telemetry.emit(
            "task.completed",
            json!({
                "task": index,
                "kind": task.kind.label(),
                "worker": worker.name(),
            }),
        );
        tracing::info!(task = index, "task completed");
    }

    Ok(results)
}
