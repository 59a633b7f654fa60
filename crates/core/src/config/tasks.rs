// Tasks Checklist Config Loader

use std::path::Path;

use crate::domain::TasksConfig;
use crate::error::{AppError, Result};

/// Load tasks.yaml.
///
/// A missing file is an empty checklist, not an error: the reminder job and
/// the tasks endpoint both tolerate a config-less deployment.
pub fn load_tasks_config(path: &Path) -> Result<TasksConfig> {
    if !path.exists() {
        return Ok(TasksConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("invalid tasks config {}: {}", path.display(), e)))
}
