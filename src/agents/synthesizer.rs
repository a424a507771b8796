use crate::agents::plan::{ExecutionPlan, ResultTable, TaskKind};
use crate::agents::workers::WriterWorker;

/// Decides how the accumulated results become the response.
///
/// A plan with exactly one non-`write` task returns that task's raw result
/// with no completion call: simple single-fact requests skip the writer
/// entirely. Everything else, including a lone `write` task and the
/// zero-task plan, flattens the result table and delegates to the writer
/// with the plan's synthesis instruction.
pub async fn synthesize(
    plan: &ExecutionPlan,
    results: &ResultTable,
    writer: &WriterWorker,
) -> String {
    if plan.tasks.len() == 1 && plan.tasks[0].kind != TaskKind::Write {
        return results
            .get("task0_result")
            .unwrap_or("No result")
            .to_string();
    }

    let instruction = format!(
        "Synthesize a final response for the user. {}",
        plan.final_synthesis
    );
    writer.compose(&instruction, &results.flatten()).await
}
