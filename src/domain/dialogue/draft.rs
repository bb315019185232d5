//! Draft: the partially or fully filled field set accumulated during
//! a dialogue.
//!
//! Fields keep their order of acquisition, which matches the flow's
//! declared field order. An omitted optional field is stored as an
//! explicit [`FieldValue::Absent`] marker, never as the raw sentinel.

use serde_json::{Map, Value};

use crate::domain::attachment::FileHandle;

/// A single accumulated field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    List(Vec<String>),
    /// Optional field skipped with the `-` sentinel.
    Absent,
    /// Attachment reference collected by the file step.
    File(FileHandle),
}

/// Ordered accumulator of field values for one dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field. Fields arrive in step order and are never
    /// overwritten within one dialogue.
    pub fn push(&mut self, name: &'static str, value: FieldValue) {
        self.fields.push((name, value));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Field names in acquisition order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(name, _)| *name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Text value of a field, if present and textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Integer value of a field, if present and integral.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(FieldValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// List value of a field; a missing or absent field reads as empty.
    pub fn list(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(FieldValue::List(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    /// File handle collected by the attachment step, if any.
    pub fn file(&self, name: &str) -> Option<&FileHandle> {
        match self.get(name) {
            Some(FieldValue::File(handle)) => Some(handle),
            _ => None,
        }
    }

    /// Renders the draft as a JSON object for submission bodies.
    ///
    /// Absent fields become `null`. File fields never appear in JSON
    /// bodies; they are submitted through the streaming relay instead.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            let json = match value {
                FieldValue::Text(s) => Value::String(s.clone()),
                FieldValue::Int(i) => Value::from(*i),
                FieldValue::List(items) => {
                    Value::Array(items.iter().cloned().map(Value::String).collect())
                }
                FieldValue::Absent => Value::Null,
                FieldValue::File(_) => continue,
            };
            map.insert((*name).to_string(), json);
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_draft_is_empty() {
        assert!(Draft::new().is_empty());
    }

    #[test]
    fn fields_keep_acquisition_order() {
        let mut draft = Draft::new();
        draft.push("title", FieldValue::Text("fix the build".into()));
        draft.push("description", FieldValue::Absent);
        draft.push("reporter_id", FieldValue::Int(3));
        assert_eq!(
            draft.field_names(),
            vec!["title", "description", "reporter_id"]
        );
    }

    #[test]
    fn absent_marker_becomes_json_null() {
        let mut draft = Draft::new();
        draft.push("description", FieldValue::Absent);
        assert_eq!(draft.to_json()["description"], Value::Null);
    }

    #[test]
    fn list_renders_as_json_array() {
        let mut draft = Draft::new();
        draft.push(
            "related_task_ids",
            FieldValue::List(vec!["1".into(), "2".into()]),
        );
        assert_eq!(
            draft.to_json()["related_task_ids"],
            serde_json::json!(["1", "2"])
        );
    }

    #[test]
    fn typed_getters_read_back_values() {
        let mut draft = Draft::new();
        draft.push("text", FieldValue::Text("hi".into()));
        draft.push("user_id", FieldValue::Int(7));
        assert_eq!(draft.text("text"), Some("hi"));
        assert_eq!(draft.int("user_id"), Some(7));
        assert_eq!(draft.int("text"), None);
        assert!(draft.list("missing").is_empty());
    }

    #[test]
    fn file_fields_are_excluded_from_json_bodies() {
        let mut draft = Draft::new();
        draft.push("task_id", FieldValue::Int(9));
        draft.push(
            "attachment",
            FieldValue::File(FileHandle::new("abc", 128, Some("report.pdf".into()))),
        );
        let json = draft.to_json();
        assert_eq!(json["task_id"], Value::from(9));
        assert!(json.get("attachment").is_none());
    }
}
