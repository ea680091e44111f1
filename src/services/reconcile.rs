//! Edit reconciliation
//!
//! Pure functions that turn an edit into a new record list. They never
//! mutate their input; the catalog service swaps the result in.

use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{Accession, FieldName, Record, RecordPatch},
};

/// New record list plus the number of records the edit touched
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub records: Vec<Record>,
    pub matched: usize,
}

/// Merge `patch` into every record sharing its accession
pub fn apply_individual_edit(records: &[Record], patch: &RecordPatch) -> Reconciled {
    let mut matched = 0;
    let records = records
        .iter()
        .map(|record| {
            if record.accession == patch.accession {
                matched += 1;
                patch.merge_into(record)
            } else {
                record.clone()
            }
        })
        .collect();

    Reconciled { records, matched }
}

/// Set `field` to `value` on every record whose accession is in `scope`.
///
/// An empty value is rejected before anything changes.
pub fn apply_global_edit(
    records: &[Record],
    field: FieldName,
    value: &str,
    scope: &HashSet<Accession>,
) -> AppResult<Reconciled> {
    if value.is_empty() {
        return Err(AppError::Validation(
            "Please enter a value to update.".to_string(),
        ));
    }

    let mut matched = 0;
    let records = records
        .iter()
        .map(|record| {
            let mut record = record.clone();
            if scope.contains(&record.accession) {
                matched += 1;
                record.set_field(field, value.to_string());
            }
            record
        })
        .collect();

    Ok(Reconciled { records, matched })
}

/// Accessions present in both the catalog and the result set.
///
/// Membership is by accession, never identity: both lists are views of
/// the same catalog taken at different times.
pub fn global_edit_scope(catalog: &[Record], results: &[Record]) -> HashSet<Accession> {
    let in_results: HashSet<&Accession> = results.iter().map(|r| &r.accession).collect();
    catalog
        .iter()
        .filter(|r| in_results.contains(&r.accession))
        .map(|r| r.accession.clone())
        .collect()
}
