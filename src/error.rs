use thiserror::Error;

/// Request-fatal failures of the coordinator pipeline. Capability failures
/// are not represented here: workers absorb them and return descriptive
/// result strings instead (see `agents::workers`).
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("planner reply could not be parsed as an execution plan: {detail}")]
    PlanParse { detail: String },

    #[error("task {position} has kind '{kind}' but no worker is registered for it")]
    UnknownTaskKind { kind: String, position: usize },

    #[error("worker '{worker}' could not connect to endpoint '{endpoint}': {detail}")]
    Initialization {
        worker: String,
        endpoint: String,
        detail: String,
    },

    #[error("completion service call failed: {detail}")]
    Completion { detail: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Planning,
    Dispatch,
    Startup,
    Provider,
    Input,
    Internal,
}

impl ErrorCategory {
    pub fn code(self) -> &'static str {
        match self {
            ErrorCategory::Planning => "PLANNING",
            ErrorCategory::Dispatch => "DISPATCH",
            ErrorCategory::Startup => "STARTUP",
            ErrorCategory::Provider => "PROVIDER",
            ErrorCategory::Input => "INPUT",
            ErrorCategory::Internal => "INTERNAL",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            ErrorCategory::Planning => {
                "The planner returned a malformed plan. Retry the request or switch --model."
            }
            ErrorCategory::Dispatch => {
                "Planner and worker registry disagree on task kinds. Check the planner instruction and registered workers."
            }
            ErrorCategory::Startup => {
                "A capability endpoint is unreachable. Start it (maestro-cli serve-capabilities) or fix the profile endpoint."
            }
            ErrorCategory::Provider => {
                "Set completion credentials (for example OPENAI_API_KEY) or point --completion-base-url at a reachable service."
            }
            ErrorCategory::Input => "Run maestro-cli --help and correct command arguments.",
            ErrorCategory::Internal => {
                "Retry with RUST_LOG=debug. If it persists, capture logs and open an issue."
            }
        }
    }
}

pub fn categorize_error(err: &anyhow::Error) -> ErrorCategory {
    if let Some(coordinator_err) = err.downcast_ref::<CoordinatorError>() {
        return match coordinator_err {
            CoordinatorError::PlanParse { .. } => ErrorCategory::Planning,
            CoordinatorError::UnknownTaskKind { .. } => ErrorCategory::Dispatch,
            CoordinatorError::Initialization { .. } => ErrorCategory::Startup,
            CoordinatorError::Completion { .. } => ErrorCategory::Provider,
        };
    }

    let msg = format!("{err:#}").to_ascii_lowercase();

    if msg.contains("api_key") || msg.contains("api key") || msg.contains("completion") {
        return ErrorCategory::Provider;
    }

    if msg.contains("profile")
        || msg.contains("invalid value")
        || msg.contains("unknown argument")
        || msg.contains("failed to read")
    {
        return ErrorCategory::Input;
    }

    if msg.contains("endpoint") || msg.contains("capability") || msg.contains("connect") {
        return ErrorCategory::Startup;
    }

    ErrorCategory::Internal
}

pub fn format_cli_error(err: &anyhow::Error) -> String {
    let category = categorize_error(err);
    format!("[{}] {:#}\nHint: {}", category.code(), err, category.hint())
}
