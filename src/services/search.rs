//! Catalog search
//!
//! A query resolves against a catalog snapshot in one of two ways:
//!
//! - an all-digit query is an exact accession probe. The matched record
//!   comes first, followed by every other copy sharing its title;
//! - anything else is a case-insensitive substring match on title or name.
//!
//! Both are linear scans that keep catalog order.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Record;

static ACCESSION_QUERY: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[0-9]+$").ok());

/// How a query string will be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind<'a> {
    Empty,
    Accession(&'a str),
    FreeText(&'a str),
}

impl<'a> QueryKind<'a> {
    pub fn classify(query: &'a str) -> Self {
        if query.is_empty() {
            return QueryKind::Empty;
        }
        let is_accession = match ACCESSION_QUERY.as_ref() {
            Some(re) => re.is_match(query),
            None => query.bytes().all(|b| b.is_ascii_digit()),
        };
        if is_accession {
            QueryKind::Accession(query)
        } else {
            QueryKind::FreeText(query)
        }
    }
}

/// Resolve `query` against `records`
pub fn search(records: &[Record], query: &str) -> Vec<Record> {
    match QueryKind::classify(query) {
        QueryKind::Empty => Vec::new(),
        QueryKind::Accession(accession) => by_accession(records, accession),
        QueryKind::FreeText(text) => by_text(records, text),
    }
}

fn by_accession(records: &[Record], accession: &str) -> Vec<Record> {
    let Some(matched) = records.iter().find(|r| r.accession == *accession) else {
        return Vec::new();
    };

    let mut results = vec![matched.clone()];
    results.extend(
        records
            .iter()
            .filter(|r| r.title == matched.title && r.accession != *accession)
            .cloned(),
    );
    results
}

fn by_text(records: &[Record], text: &str) -> Vec<Record> {
    let needle = text.to_lowercase();
    let contains = |field: &Option<String>| {
        field
            .as_deref()
            .map_or(false, |value| value.to_lowercase().contains(&needle))
    };

    records
        .iter()
        .filter(|r| contains(&r.title) || contains(&r.name))
        .cloned()
        .collect()
}
