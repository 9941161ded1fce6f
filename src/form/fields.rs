// Field value storage and browser-equivalent input validation

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::schema::{FieldKind, FormSchema};
use super::types::FieldValue;

/// The valid e-mail address pattern browsers apply to `type=email` inputs.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid email regex literal")
});

/// Current value of every form field, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<String, FieldValue>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: FieldValue) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> &str {
        self.get(name).and_then(FieldValue::as_text).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Replace a field with a text value.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), FieldValue::Text(value.into()));
    }

    /// Checkbox semantics: `checked` adds the member once, unchecked removes it.
    pub fn set_list_member(&mut self, name: &str, member: &str, checked: bool) {
        let entry = self
            .0
            .entry(name.to_string())
            .or_insert_with(|| FieldValue::List(Vec::new()));

        if let FieldValue::Text(text) = &mut *entry {
            // A text value left on a list field becomes its first member.
            let carried = std::mem::take(text);
            *entry = FieldValue::List(if carried.is_empty() { Vec::new() } else { vec![carried] });
        }

        if let FieldValue::List(members) = entry {
            let present = members.iter().any(|m| m == member);
            if checked && !present {
                members.push(member.to_string());
            } else if !checked {
                members.retain(|m| m != member);
            }
        }
    }

    /// Flip membership of `member` in a list field.
    pub fn toggle_list_member(&mut self, name: &str, member: &str) {
        let present = self
            .get(name)
            .and_then(FieldValue::as_list)
            .is_some_and(|members| members.iter().any(|m| m == member));
        self.set_list_member(name, member, !present);
    }

    /// Required fields of `schema` that are unset or empty.
    pub fn missing_required(&self, schema: &FormSchema) -> Vec<String> {
        schema
            .required_fields()
            .filter(|spec| self.get(&spec.name).is_none_or(FieldValue::is_empty))
            .map(|spec| spec.name.clone())
            .collect()
    }

    /// Non-empty e-mail fields of `schema` that a browser would refuse.
    pub fn invalid_emails(&self, schema: &FormSchema) -> Vec<String> {
        schema
            .fields
            .iter()
            .filter(|spec| spec.kind == FieldKind::Email)
            .filter(|spec| {
                let value = self.text(&spec.name);
                !value.is_empty() && !EMAIL_PATTERN.is_match(value)
            })
            .map(|spec| spec.name.clone())
            .collect()
    }
}
