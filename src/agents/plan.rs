use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Research,
    Weather,
    Write,
}

impl TaskKind {
    pub fn label(self) -> &'static str {
        match self {
            TaskKind::Research => "research",
            TaskKind::Weather => "weather",
            TaskKind::Write => "write",
        }
    }
}

/// One planned step. Immutable once parsed; the executor reads it but never
/// rewrites it. `description` is human-readable context only.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default)]
    pub description: String,
    pub input: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionPlan {
    pub tasks: Vec<Task>,
    #[serde(rename = "finalSynthesis")]
    pub final_synthesis: String,
}

/// Per-request accumulating map of task outputs. Insertion-ordered with
/// unique keys; rewriting an existing key replaces the value in place, so a
/// key's position reflects its first write. Never shrinks within a request.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    entries: Vec<(String, String)>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders `"key: value"` lines joined by blank lines, the shape the
    /// writer receives for synthesis.
    pub fn flatten(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<String>>()
            .join("\n\n")
    }
}

/// Literal `{key}` substitution against every key currently in the table,
/// in insertion order, one replacement per key. Keys not yet produced stay
/// as literal tokens: only prior tasks' outputs are substitutable.
pub fn resolve_placeholders(input: &str, results: &ResultTable) -> String {
    let mut resolved = input.to_string();
    for (key, value) in results.iter() {
        let token = format!("{{{key}}}");
        if let Some(at) = resolved.find(&token) {
            resolved.replace_range(at..at + token.len(), value);
        }
    }
    resolved
}
