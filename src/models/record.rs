//! Catalog record model.
//!
//! Records travel over the wire as flat JSON objects keyed `ACCESSION`,
//! `TITLE`, `NAME`, `DEPT` and `PLACE`. The record store is loose about
//! types (accessions arrive as numbers or strings), so every field is
//! normalized to text once, here, when a record enters the catalog.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use utoipa::ToSchema;

/// Text shown when a record has no place
pub const NO_PLACE: &str = "No place available";

/// Accession number, kept as text so that leading structure survives
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Accession(String);

impl Accession {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Accession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Accession {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Accession {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for Accession {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl<'de> Deserialize<'de> for Accession {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self(value_to_text(value).unwrap_or_default()))
    }
}

/// Render a number the way the record store's producers print it:
/// integral floats lose their fractional part (`12.0` becomes `12`).
fn number_to_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(number_to_text(&n)),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(value))
}

/// Editable record fields. `ACCESSION` is deliberately not a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldName {
    Place,
    Title,
    Dept,
    Name,
}

impl FieldName {
    pub const ALL: [FieldName; 4] = [
        FieldName::Place,
        FieldName::Title,
        FieldName::Dept,
        FieldName::Name,
    ];

    /// Wire key for this field
    pub fn as_key(&self) -> &'static str {
        match self {
            FieldName::Place => "PLACE",
            FieldName::Title => "TITLE",
            FieldName::Dept => "DEPT",
            FieldName::Name => "NAME",
        }
    }
}

impl Default for FieldName {
    fn default() -> Self {
        FieldName::Place
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

/// One catalog entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "ACCESSION", default)]
    pub accession: Accession,
    #[serde(
        rename = "TITLE",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        rename = "NAME",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        rename = "DEPT",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub dept: Option<String>,
    #[serde(
        rename = "PLACE",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub place: Option<String>,
    /// Columns the desk does not know about, written back untouched on save
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Record {
    pub fn new(accession: impl Into<Accession>) -> Self {
        Self {
            accession: accession.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_dept(mut self, dept: impl Into<String>) -> Self {
        self.dept = Some(dept.into());
        self
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    pub fn field(&self, field: FieldName) -> Option<&str> {
        match field {
            FieldName::Place => self.place.as_deref(),
            FieldName::Title => self.title.as_deref(),
            FieldName::Dept => self.dept.as_deref(),
            FieldName::Name => self.name.as_deref(),
        }
    }

    pub fn set_field(&mut self, field: FieldName, value: String) {
        let slot = match field {
            FieldName::Place => &mut self.place,
            FieldName::Title => &mut self.title,
            FieldName::Dept => &mut self.dept,
            FieldName::Name => &mut self.name,
        };
        *slot = Some(value);
    }

    /// Place text for display; empty and absent places both fall back to [`NO_PLACE`]
    pub fn display_place(&self) -> &str {
        match self.place.as_deref() {
            Some(place) if !place.is_empty() => place,
            _ => NO_PLACE,
        }
    }
}

/// Record as presented to desk clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecordView {
    /// Accession number
    pub accession: String,
    pub title: Option<String>,
    /// Holder name
    pub name: Option<String>,
    /// Department
    pub dept: Option<String>,
    /// Location, or "No place available"
    pub place: String,
}

impl From<&Record> for RecordView {
    fn from(record: &Record) -> Self {
        Self {
            accession: record.accession.to_string(),
            title: record.title.clone(),
            name: record.name.clone(),
            dept: record.dept.clone(),
            place: record.display_place().to_string(),
        }
    }
}
