//! Edit drafts and the edit session state machine

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::record::{Accession, FieldName, Record};

/// Partial record used for an individual edit.
///
/// `None` fields are left as they are on the target record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecordPatch {
    #[schema(value_type = String)]
    pub accession: Accession,
    pub title: Option<String>,
    pub name: Option<String>,
    pub dept: Option<String>,
    pub place: Option<String>,
}

impl RecordPatch {
    /// Draft pre-filled with everything the record currently holds
    pub fn seeded_from(record: &Record) -> Self {
        Self {
            accession: record.accession.clone(),
            title: record.title.clone(),
            name: record.name.clone(),
            dept: record.dept.clone(),
            place: record.place.clone(),
        }
    }

    /// Overlay the patch onto `record`. The accession is never touched.
    pub fn merge_into(&self, record: &Record) -> Record {
        let mut merged = record.clone();
        for field in FieldName::ALL {
            if let Some(value) = self.get(field) {
                merged.set_field(field, value.to_string());
            }
        }
        merged
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        match field {
            FieldName::Place => self.place.as_deref(),
            FieldName::Title => self.title.as_deref(),
            FieldName::Dept => self.dept.as_deref(),
            FieldName::Name => self.name.as_deref(),
        }
    }

    /// Apply typed changes from the edit form
    pub fn apply(&mut self, changes: &FieldChanges) {
        if let Some(ref title) = changes.title {
            self.title = Some(title.clone());
        }
        if let Some(ref name) = changes.name {
            self.name = Some(name.clone());
        }
        if let Some(ref dept) = changes.dept {
            self.dept = Some(dept.clone());
        }
        if let Some(ref place) = changes.place {
            self.place = Some(place.clone());
        }
    }
}

/// Field values typed into the individual edit form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FieldChanges {
    pub title: Option<String>,
    pub name: Option<String>,
    pub dept: Option<String>,
    pub place: Option<String>,
}

/// Draft for a global edit: the selected field plus whatever was typed
/// for each field, so switching fields back and forth keeps the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalDraft {
    field: FieldName,
    values: BTreeMap<FieldName, String>,
}

impl GlobalDraft {
    pub fn field(&self) -> FieldName {
        self.field
    }

    pub fn select(&mut self, field: FieldName) {
        self.field = field;
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.values.insert(self.field, value.into());
    }

    /// Value for the selected field
    pub fn value(&self) -> Option<&str> {
        self.values.get(&self.field).map(String::as_str)
    }
}

/// Global draft as presented to desk clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GlobalDraftView {
    pub field: FieldName,
    pub value: String,
}

impl From<&GlobalDraft> for GlobalDraftView {
    fn from(draft: &GlobalDraft) -> Self {
        Self {
            field: draft.field(),
            value: draft.value().unwrap_or_default().to_string(),
        }
    }
}

/// Edit form lifecycle: `Idle -> Editing -> (submitted | cancelled) -> Idle`.
///
/// Submission and cancellation are transitions, not resting states, so
/// both are expressed by taking the draft out.
#[derive(Debug, Clone, PartialEq)]
pub enum EditSession<D> {
    Idle,
    Editing(D),
}

impl<D> Default for EditSession<D> {
    fn default() -> Self {
        EditSession::Idle
    }
}

impl<D> EditSession<D> {
    /// Start editing. An open draft is replaced.
    pub fn begin(&mut self, draft: D) {
        *self = EditSession::Editing(draft);
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing(_))
    }

    pub fn draft(&self) -> Option<&D> {
        match self {
            EditSession::Editing(draft) => Some(draft),
            EditSession::Idle => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match self {
            EditSession::Editing(draft) => Some(draft),
            EditSession::Idle => None,
        }
    }

    /// Leave `Editing`, handing back the draft
    pub fn finish(&mut self) -> Option<D> {
        match std::mem::take(self) {
            EditSession::Editing(draft) => Some(draft),
            EditSession::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_accession_and_untouched_fields() {
        let record = Record::new("12").with_title("Physics I").with_name("A");
        let patch = RecordPatch {
            accession: Accession::from("12"),
            place: Some("Annex".to_string()),
            ..Default::default()
        };
        let merged = patch.merge_into(&record);
        assert_eq!(merged.accession.as_str(), "12");
        assert_eq!(merged.title.as_deref(), Some("Physics I"));
        assert_eq!(merged.name.as_deref(), Some("A"));
        assert_eq!(merged.place.as_deref(), Some("Annex"));
    }

    #[test]
    fn test_seeded_patch_applies_changes() {
        let record = Record::new("5").with_title("Optics");
        let mut patch = RecordPatch::seeded_from(&record);
        patch.apply(&FieldChanges {
            name: Some("B".to_string()),
            ..Default::default()
        });
        assert_eq!(patch.title.as_deref(), Some("Optics"));
        assert_eq!(patch.name.as_deref(), Some("B"));
        assert_eq!(patch.dept, None);
    }

    #[test]
    fn test_global_draft_remembers_values_per_field() {
        let mut draft = GlobalDraft::default();
        assert_eq!(draft.field(), FieldName::Place);
        assert_eq!(draft.value(), None);

        draft.set_value("Main Hall");
        draft.select(FieldName::Dept);
        assert_eq!(draft.value(), None);
        draft.set_value("Science");
        draft.select(FieldName::Place);
        assert_eq!(draft.value(), Some("Main Hall"));
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session: EditSession<u8> = EditSession::default();
        assert!(!session.is_editing());
        assert_eq!(session.finish(), None);

        session.begin(1);
        session.begin(2);
        assert_eq!(session.draft(), Some(&2));
        if let Some(draft) = session.draft_mut() {
            *draft = 3;
        }
        assert_eq!(session.finish(), Some(3));
        assert_eq!(session, EditSession::Idle);
    }
}
