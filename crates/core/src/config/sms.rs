// SMS Message Templates (sms.yml)

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Deserialize)]
struct MessageTemplate {
    template: String,
    #[serde(default)]
    variables: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SmsConfigFile {
    messages: HashMap<String, MessageTemplate>,
}

/// Loaded SMS template registry
///
/// Templates use `{{var}}` placeholders. Loaded once at startup; the daemon
/// restarts on template changes.
#[derive(Debug, Clone)]
pub struct SmsTemplates {
    messages: HashMap<String, MessageTemplate>,
}

impl SmsTemplates {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "SMS configuration file not found at {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: SmsConfigFile = serde_yaml::from_str(&content).map_err(|e| {
            AppError::Config(format!("invalid SMS config {}: {}", path.display(), e))
        })?;

        Ok(Self {
            messages: config.messages,
        })
    }

    /// Format a message, substituting every `{{key}}` occurrence.
    ///
    /// Placeholders left unsubstituted are logged as warnings and kept
    /// verbatim in the output.
    pub fn format(&self, message_key: &str, variables: &[(&str, &str)]) -> Result<String> {
        let template = self.messages.get(message_key).ok_or_else(|| {
            AppError::Config(format!(
                "SMS message template \"{}\" not found in configuration",
                message_key
            ))
        })?;

        let mut message = template.template.clone();
        for (key, value) in variables {
            message = message.replace(&format!("{{{{{}}}}}", key), value);
        }

        for leftover in unsubstituted_placeholders(&message) {
            warn!(
                message_key = %message_key,
                placeholder = %leftover,
                "Unsubstituted variable in SMS message"
            );
        }

        Ok(message)
    }

    /// Declared variable names for a template
    pub fn variables(&self, message_key: &str) -> Result<&[String]> {
        self.messages
            .get(message_key)
            .map(|t| t.variables.as_slice())
            .ok_or_else(|| {
                AppError::Config(format!(
                    "SMS message template \"{}\" not found in configuration",
                    message_key
                ))
            })
    }

    /// Build a registry directly from template strings (tests)
    pub fn from_templates(templates: &[(&str, &str)]) -> Self {
        Self {
            messages: templates
                .iter()
                .map(|(key, template)| {
                    (
                        key.to_string(),
                        MessageTemplate {
                            template: template.to_string(),
                            variables: Vec::new(),
                        },
                    )
                })
                .collect(),
        }
    }
}

fn unsubstituted_placeholders(message: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = message;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                found.push(&after[..end]);
                rest = &after[end + 2..];
            }
            None => break,
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> SmsTemplates {
        SmsTemplates::from_templates(&[(
            "magicLink",
            "Hi {{name}}! Your login link: {{magicLinkUrl}}",
        )])
    }

    #[test]
    fn substitutes_all_variables() {
        let message = templates()
            .format(
                "magicLink",
                &[("name", "Ada"), ("magicLinkUrl", "http://x/auth?token=t")],
            )
            .unwrap();
        assert_eq!(message, "Hi Ada! Your login link: http://x/auth?token=t");
    }

    #[test]
    fn repeated_placeholder_is_replaced_everywhere() {
        let registry =
            SmsTemplates::from_templates(&[("twice", "{{name}} and {{name}} again")]);
        let message = registry.format("twice", &[("name", "Ada")]).unwrap();
        assert_eq!(message, "Ada and Ada again");
    }

    #[test]
    fn unknown_template_is_config_error() {
        let err = templates().format("missing", &[]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn leftover_placeholder_survives_verbatim() {
        let message = templates().format("magicLink", &[("name", "Ada")]).unwrap();
        assert!(message.contains("{{magicLinkUrl}}"));
    }

    #[test]
    fn finds_unsubstituted_placeholders() {
        assert_eq!(
            unsubstituted_placeholders("a {{one}} b {{two}}"),
            vec!["one", "two"]
        );
        assert!(unsubstituted_placeholders("clean").is_empty());
    }
}
