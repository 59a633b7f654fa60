// Visibility Conditions
//
// Shared by the task checklist and (historically) the dynamic form: a node
// is visible when its condition evaluates true against the event's data.

use serde::{Deserialize, Serialize};

use crate::domain::event::EventData;

/// Condition operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    Contains,
    ContainsAny,
}

/// Declarative predicate over a single event-data field
///
/// `value` is used by equals/notEquals/contains, `values` by in/containsAny.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Condition {
    /// Evaluate this condition against event data.
    pub fn evaluate(&self, data: &EventData) -> bool {
        let field_value = data.get(&self.field);

        match self.operator {
            Operator::Equals => match (field_value, &self.value) {
                (Some(serde_json::Value::String(s)), Some(v)) => s == v,
                _ => false,
            },

            Operator::NotEquals => !match (field_value, &self.value) {
                (Some(serde_json::Value::String(s)), Some(v)) => s == v,
                _ => false,
            },

            Operator::In => {
                let Some(values) = &self.values else {
                    return false;
                };
                match field_value.map(stringify) {
                    Some(s) => values.contains(&s),
                    None => false,
                }
            }

            Operator::Contains => {
                let array = parse_array_value(field_value);
                if !array.is_empty() {
                    return match &self.value {
                        Some(v) => array.iter().any(|item| item == v),
                        None => false,
                    };
                }
                // Fallback for plain string values: substring match
                match (field_value, &self.value) {
                    (Some(serde_json::Value::String(s)), Some(v)) => s.contains(v.as_str()),
                    _ => false,
                }
            }

            Operator::ContainsAny => {
                let Some(values) = &self.values else {
                    return false;
                };
                let array = parse_array_value(field_value);
                !array.is_empty() && values.iter().any(|v| array.contains(v))
            }
        }
    }
}

/// Evaluate an optional condition; absent means visible.
pub fn evaluate_condition(condition: Option<&Condition>, data: &EventData) -> bool {
    condition.map_or(true, |c| c.evaluate(data))
}

fn stringify(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse array values which may be stored as JSON strings
/// (checkboxGroup answers are persisted as JSON-encoded strings).
fn parse_array_value(value: Option<&serde_json::Value>) -> Vec<String> {
    match value {
        Some(serde_json::Value::Array(items)) => items.iter().map(stringify).collect(),
        Some(serde_json::Value::String(s)) => {
            match serde_json::from_str::<serde_json::Value>(s) {
                Ok(serde_json::Value::Array(items)) => items.iter().map(stringify).collect(),
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: serde_json::Value) -> EventData {
        EventData::from_value(json!({ "field": value }))
    }

    fn cond(operator: Operator, value: Option<&str>, values: Option<Vec<&str>>) -> Condition {
        Condition {
            field: "field".to_string(),
            operator,
            value: value.map(String::from),
            values: values.map(|v| v.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn equals_matches_string_fields_only() {
        let c = cond(Operator::Equals, Some("yes"), None);
        assert!(c.evaluate(&data(json!("yes"))));
        assert!(!c.evaluate(&data(json!("no"))));
        assert!(!c.evaluate(&data(json!(42))));
        assert!(!c.evaluate(&EventData::default()));
    }

    #[test]
    fn not_equals_is_true_for_missing_field() {
        let c = cond(Operator::NotEquals, Some("yes"), None);
        assert!(!c.evaluate(&data(json!("yes"))));
        assert!(c.evaluate(&data(json!("no"))));
        assert!(c.evaluate(&EventData::default()));
    }

    #[test]
    fn in_operator_stringifies_values() {
        let c = cond(Operator::In, None, Some(vec!["a", "b"]));
        assert!(c.evaluate(&data(json!("a"))));
        assert!(!c.evaluate(&data(json!("c"))));
        assert!(!c.evaluate(&EventData::default()));

        let numeric = cond(Operator::In, None, Some(vec!["42"]));
        assert!(numeric.evaluate(&data(json!(42))));
    }

    #[test]
    fn in_without_values_is_false() {
        let c = cond(Operator::In, None, None);
        assert!(!c.evaluate(&data(json!("a"))));
    }

    #[test]
    fn contains_handles_json_string_arrays() {
        let c = cond(Operator::Contains, Some("cake"), None);
        assert!(c.evaluate(&data(json!(["cake", "balloons"]))));
        assert!(c.evaluate(&data(json!("[\"cake\",\"balloons\"]"))));
        assert!(!c.evaluate(&data(json!(["balloons"]))));
    }

    #[test]
    fn contains_falls_back_to_substring() {
        let c = cond(Operator::Contains, Some("cake"), None);
        assert!(c.evaluate(&data(json!("chocolate cake"))));
        assert!(!c.evaluate(&data(json!("pie"))));
        assert!(!c.evaluate(&data(json!(7))));
    }

    #[test]
    fn contains_any_requires_intersection() {
        let c = cond(Operator::ContainsAny, None, Some(vec!["cake", "pie"]));
        assert!(c.evaluate(&data(json!(["pie"]))));
        assert!(c.evaluate(&data(json!("[\"pie\"]"))));
        assert!(!c.evaluate(&data(json!(["balloons"]))));
        assert!(!c.evaluate(&data(json!("just a string"))));
    }

    #[test]
    fn absent_condition_is_visible() {
        assert!(evaluate_condition(None, &EventData::default()));
    }
}
