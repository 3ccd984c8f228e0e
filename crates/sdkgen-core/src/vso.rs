use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLogs {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Errors and warnings per pipeline task, in the order tasks first reported.
///
/// Serializes as a JSON object keyed by task name, which is the shape the
/// pipeline's annotation step reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VsoLogs {
    tasks: IndexMap<String, TaskLogs>,
}

impl VsoLogs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, task: &str, message: impl Into<String>) {
        self.entry(task).errors.push(message.into());
    }

    pub fn add_warning(&mut self, task: &str, message: impl Into<String>) {
        self.entry(task).warnings.push(message.into());
    }

    /// Appends every entry of `other`, keeping existing order.
    pub fn extend(&mut self, other: Self) {
        for (task, logs) in other.tasks {
            let entry = self.entry(&task);
            entry.errors.extend(logs.errors);
            entry.warnings.extend(logs.warnings);
        }
    }

    #[must_use]
    pub fn get(&self, task: &str) -> Option<&TaskLogs> {
        self.tasks.get(task)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskLogs)> {
        self.tasks.iter().map(|(task, logs)| (task.as_str(), logs))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.tasks.values().map(|logs| logs.errors.len()).sum()
    }

    fn entry(&mut self, task: &str) -> &mut TaskLogs {
        self.tasks.entry(task.to_string()).or_default()
    }
}
