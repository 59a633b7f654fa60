// Task Checklist Models (YAML-configured)

use serde::{Deserialize, Serialize};

use crate::domain::condition::Condition;

/// A subtask item is either a bare name (legacy format) or a full object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubtaskItem {
    Name(String),
    Nested(Subtask),
}

impl SubtaskItem {
    pub fn name(&self) -> &str {
        match self {
            SubtaskItem::Name(name) => name,
            SubtaskItem::Nested(subtask) => &subtask.name,
        }
    }

    pub fn condition(&self) -> Option<&Condition> {
        match self {
            SubtaskItem::Name(_) => None,
            SubtaskItem::Nested(subtask) => subtask.condition.as_ref(),
        }
    }

    pub fn children(&self) -> &[SubtaskItem] {
        match self {
            SubtaskItem::Name(_) => &[],
            SubtaskItem::Nested(subtask) => &subtask.subtasks,
        }
    }
}

/// Nested checklist item, optionally gated by a condition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<SubtaskItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

/// Top-level preparation task
///
/// `deadline` is in days relative to the event date
/// (positive = before the event, negative = after).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub description: String,
    pub deadline: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<SubtaskItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

/// Root of tasks.yaml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasksConfig {
    #[serde(default)]
    pub tasks: Vec<Task>,
}
