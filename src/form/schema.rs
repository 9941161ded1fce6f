// Field sets of the form variants served by the Freeform backend

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::fields::FieldValues;
use super::types::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Email,
    List,
    DateTime,
}

impl FieldKind {
    /// GraphQL input type used for the mutation variable.
    pub fn graphql_type(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Email => "String",
            FieldKind::List => "[String]",
            FieldKind::DateTime => "DateTime",
        }
    }

    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldKind::List => FieldValue::List(Vec::new()),
            _ => FieldValue::Text(String::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn text(name: &str) -> Self {
        Self { name: name.to_string(), kind: FieldKind::Text, required: false }
    }

    pub fn email(name: &str) -> Self {
        Self { name: name.to_string(), kind: FieldKind::Email, required: false }
    }

    pub fn list(name: &str) -> Self {
        Self { name: name.to_string(), kind: FieldKind::List, required: false }
    }

    pub fn date_time(name: &str) -> Self {
        Self { name: name.to_string(), kind: FieldKind::DateTime, required: false }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Form variants shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    Contact,
    Quote,
}

impl FormVariant {
    pub fn schema(&self) -> FormSchema {
        match self {
            FormVariant::Contact => FormSchema::contact(),
            FormVariant::Quote => FormSchema::quote(),
        }
    }
}

impl fmt::Display for FormVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormVariant::Contact => f.write_str("contact"),
            FormVariant::Quote => f.write_str("quote"),
        }
    }
}

impl FromStr for FormVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "contact" => Ok(FormVariant::Contact),
            "quote" => Ok(FormVariant::Quote),
            other => Err(format!("unknown form variant '{other}' (expected contact or quote)")),
        }
    }
}

/// Field set and GraphQL naming of one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    /// Freeform form handle; the mutation is `save_{handle}_Submission`.
    pub handle: String,
    pub operation_name: String,
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(handle: &str, operation_name: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            handle: handle.to_string(),
            operation_name: operation_name.to_string(),
            fields,
        }
    }

    pub fn contact() -> Self {
        Self::new(
            "contact",
            "SaveContactSubmission",
            vec![
                FieldSpec::text("typeOfContact").required(),
                FieldSpec::text("firstName").required(),
                FieldSpec::text("lastName").required(),
                FieldSpec::text("companyName"),
                FieldSpec::email("email").required(),
                FieldSpec::text("cellPhone"),
                FieldSpec::text("homePhone"),
                FieldSpec::text("workPhone"),
                FieldSpec::text("subject").required(),
                FieldSpec::date_time("appointmentDateTime").required(),
                FieldSpec::text("department").required(),
                FieldSpec::text("howMuchDoYouEnjoyEatingPie"),
                FieldSpec::text("message").required(),
                FieldSpec::list("howDidYouHearAboutThisJobPosting"),
                FieldSpec::text("howHeardOther"),
                FieldSpec::text("acceptTerms").required(),
            ],
        )
    }

    pub fn quote() -> Self {
        Self::new(
            "quote",
            "SaveQuoteSubmission",
            vec![
                FieldSpec::text("firstName").required(),
                FieldSpec::text("lastName").required(),
                FieldSpec::text("companyName"),
                FieldSpec::email("email").required(),
                FieldSpec::text("cellPhone").required(),
                FieldSpec::text("homePhone"),
                FieldSpec::text("workPhone"),
                FieldSpec::text("subject").required(),
                FieldSpec::date_time("appointmentDate"),
                FieldSpec::text("department").required(),
                FieldSpec::text("howMuchDoYouEnjoyEatingPie"),
                FieldSpec::text("message").required(),
                FieldSpec::list("howDidYouHearAboutThisJobPosting"),
                FieldSpec::text("acceptTerms").required(),
            ],
        )
    }

    /// Name of the mutation field on the GraphQL schema.
    pub fn mutation_field(&self) -> String {
        format!("save_{}_Submission", self.handle)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|spec| spec.required)
    }

    /// Fresh values for every field of the schema.
    pub fn default_values(&self) -> FieldValues {
        let mut values = FieldValues::new();
        for spec in &self.fields {
            values.insert(&spec.name, spec.kind.default_value());
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_schema_required_fields() {
        let schema = FormSchema::contact();
        let required: Vec<&str> = schema.required_fields().map(|s| s.name.as_str()).collect();

        assert_eq!(
            required,
            vec![
                "typeOfContact",
                "firstName",
                "lastName",
                "email",
                "subject",
                "appointmentDateTime",
                "department",
                "message",
                "acceptTerms",
            ]
        );
        assert_eq!(schema.mutation_field(), "save_contact_Submission");
    }

    #[test]
    fn test_quote_schema_requires_cell_phone() {
        let schema = FormVariant::Quote.schema();
        assert!(schema.field("cellPhone").unwrap().required);
        assert!(schema.field("typeOfContact").is_none());
        assert_eq!(schema.field("appointmentDate").unwrap().kind, FieldKind::DateTime);
    }

    #[test]
    fn test_default_values_cover_every_field() {
        let schema = FormSchema::contact();
        let defaults = schema.default_values();

        assert_eq!(defaults.len(), schema.fields.len());
        assert_eq!(
            defaults.get("howDidYouHearAboutThisJobPosting"),
            Some(&FieldValue::List(Vec::new()))
        );
        assert_eq!(defaults.get("firstName"), Some(&FieldValue::Text(String::new())));
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("Quote".parse::<FormVariant>().unwrap(), FormVariant::Quote);
        assert!("survey".parse::<FormVariant>().is_err());
    }
}
