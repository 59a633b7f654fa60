// Checklist Evaluation
//
// Pure tree recursion over the task/subtask config: visibility via
// conditions, completion keys, and per-task progress.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::condition::evaluate_condition;
use crate::domain::{EventData, SubtaskItem, Task, TasksConfig};

/// Completion key for a subtask at any nesting depth:
/// `"{task_name}::{path}::{joined}"`.
pub fn subtask_key(task_name: &str, path: &[&str]) -> String {
    format!("{}::{}", task_name, path.join("::"))
}

/// Count visible subtasks, recursively.
///
/// A node whose condition fails hides its whole subtree. Legacy string
/// subtasks are unconditional.
pub fn count_visible_subtasks(subtasks: &[SubtaskItem], data: &EventData) -> usize {
    subtasks
        .iter()
        .map(|item| match item {
            SubtaskItem::Name(_) => 1,
            SubtaskItem::Nested(subtask) => {
                if !evaluate_condition(subtask.condition.as_ref(), data) {
                    0
                } else {
                    1 + count_visible_subtasks(&subtask.subtasks, data)
                }
            }
        })
        .sum()
}

/// Collect completion keys for every visible subtask, pre-order.
pub fn collect_subtask_keys(
    task_name: &str,
    subtasks: &[SubtaskItem],
    data: &EventData,
) -> Vec<String> {
    let mut keys = Vec::new();
    collect_keys_inner(task_name, subtasks, data, &mut Vec::new(), &mut keys);
    keys
}

fn collect_keys_inner<'a>(
    task_name: &str,
    subtasks: &'a [SubtaskItem],
    data: &EventData,
    path: &mut Vec<&'a str>,
    keys: &mut Vec<String>,
) {
    for item in subtasks {
        if !evaluate_condition(item.condition(), data) {
            continue;
        }

        path.push(item.name());
        keys.push(subtask_key(task_name, path));
        collect_keys_inner(task_name, item.children(), data, path, keys);
        path.pop();
    }
}

/// Is a task fully completed?
///
/// Without subtasks the task completes under its bare name. With subtasks,
/// every visible key must be in `completed` and the visible set must be
/// non-empty (a fully hidden tree is never "done").
pub fn all_subtasks_completed(
    task_name: &str,
    subtasks: &[SubtaskItem],
    data: &EventData,
    completed: &HashSet<String>,
) -> bool {
    if subtasks.is_empty() {
        return completed.contains(task_name);
    }

    let keys = collect_subtask_keys(task_name, subtasks, data);
    !keys.is_empty() && keys.iter().all(|key| completed.contains(key))
}

/// Progress of one visible task
#[derive(Debug, Clone, Serialize)]
pub struct TaskProgress {
    pub task_id: String,
    pub task_name: String,
    pub total_subtasks: usize,
    pub completed_subtasks: usize,
    pub completed: bool,
}

/// Tasks visible for this event's data
pub fn visible_tasks<'a>(config: &'a TasksConfig, data: &EventData) -> Vec<&'a Task> {
    config
        .tasks
        .iter()
        .filter(|task| evaluate_condition(task.condition.as_ref(), data))
        .collect()
}

/// Evaluate progress for every visible task of an event.
pub fn evaluate_progress(
    config: &TasksConfig,
    data: &EventData,
    completed_tasks: &[String],
) -> Vec<TaskProgress> {
    let completed: HashSet<String> = completed_tasks.iter().cloned().collect();

    visible_tasks(config, data)
        .into_iter()
        .map(|task| {
            let keys = collect_subtask_keys(&task.name, &task.subtasks, data);
            let completed_subtasks = keys.iter().filter(|key| completed.contains(*key)).count();
            TaskProgress {
                task_id: task.id.clone(),
                task_name: task.name.clone(),
                total_subtasks: count_visible_subtasks(&task.subtasks, data),
                completed_subtasks,
                completed: all_subtasks_completed(&task.name, &task.subtasks, data, &completed),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> TasksConfig {
        serde_yaml::from_str(
            r#"
tasks:
  - id: venue
    name: Venue
    description: Book it.
    deadline: 30
    subtasks:
      - Shortlist venues
      - name: Sign contract
        condition:
          field: venueType
          operator: equals
          value: rented
        subtasks:
          - Read fine print
          - Pay deposit
  - id: cake
    name: Cake
    description: Order the cake.
    deadline: 7
    condition:
      field: food
      operator: contains
      value: cake
"#,
        )
        .unwrap()
    }

    fn rented() -> EventData {
        EventData::from_value(json!({ "venueType": "rented", "food": "[\"cake\"]" }))
    }

    fn home() -> EventData {
        EventData::from_value(json!({ "venueType": "home" }))
    }

    #[test]
    fn key_format_joins_path_with_double_colons() {
        assert_eq!(
            subtask_key("Venue", &["Sign contract", "Pay deposit"]),
            "Venue::Sign contract::Pay deposit"
        );
    }

    #[test]
    fn counts_respect_conditions_recursively() {
        let venue = &config().tasks[0];
        assert_eq!(count_visible_subtasks(&venue.subtasks, &rented()), 4);
        // Hidden "Sign contract" hides its two children too
        assert_eq!(count_visible_subtasks(&venue.subtasks, &home()), 1);
    }

    #[test]
    fn collects_keys_preorder() {
        let venue = &config().tasks[0];
        let keys = collect_subtask_keys("Venue", &venue.subtasks, &rented());
        assert_eq!(
            keys,
            vec![
                "Venue::Shortlist venues",
                "Venue::Sign contract",
                "Venue::Sign contract::Read fine print",
                "Venue::Sign contract::Pay deposit",
            ]
        );
    }

    #[test]
    fn completion_requires_every_visible_key() {
        let venue = &config().tasks[0];
        let data = rented();

        let mut completed: HashSet<String> = collect_subtask_keys("Venue", &venue.subtasks, &data)
            .into_iter()
            .collect();
        assert!(all_subtasks_completed(
            "Venue",
            &venue.subtasks,
            &data,
            &completed
        ));

        completed.remove("Venue::Sign contract::Pay deposit");
        assert!(!all_subtasks_completed(
            "Venue",
            &venue.subtasks,
            &data,
            &completed
        ));
    }

    #[test]
    fn hidden_subtasks_do_not_block_completion() {
        let venue = &config().tasks[0];
        let data = home();
        let completed: HashSet<String> =
            std::iter::once("Venue::Shortlist venues".to_string()).collect();
        assert!(all_subtasks_completed(
            "Venue",
            &venue.subtasks,
            &data,
            &completed
        ));
    }

    #[test]
    fn leaf_task_completes_under_bare_name() {
        let completed: HashSet<String> = std::iter::once("Cake".to_string()).collect();
        assert!(all_subtasks_completed(
            "Cake",
            &[],
            &EventData::default(),
            &completed
        ));
        assert!(!all_subtasks_completed(
            "Cake",
            &[],
            &EventData::default(),
            &HashSet::new()
        ));
    }

    #[test]
    fn progress_covers_visible_tasks_only() {
        let config = config();

        let progress = evaluate_progress(&config, &home(), &[]);
        assert_eq!(progress.len(), 1); // "Cake" hidden without cake in food
        assert_eq!(progress[0].task_id, "venue");
        assert_eq!(progress[0].total_subtasks, 1);

        let progress = evaluate_progress(
            &config,
            &rented(),
            &["Venue::Shortlist venues".to_string()],
        );
        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].total_subtasks, 4);
        assert_eq!(progress[0].completed_subtasks, 1);
        assert!(!progress[0].completed);
    }
}
