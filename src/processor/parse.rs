// src/processor/parse.rs
//
// Model replies follow the labelled-line convention:
//
//   TITLE: Sunny loft near the old town
//   DESCRIPTION: Bright two-room flat ...
//
// Labels are matched case-insensitively anywhere in the text, as long as no
// word character sits right before them. Markdown decoration (`**TITLE:**`,
// `## Title:`) and a lead-in sentence on the same line are both fine. Every
// field but the last ends at the newline; the last one runs to the end of
// the text.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, OnceLock};

use regex::Regex;

use crate::processor::ParseError;

pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 5.0;

/// An expected label plus what to return when the reply lacks it.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub label: &'a str,
    pub fallback: Option<&'a str>,
}

impl<'a> Field<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: &'a str) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

/// Label -> extracted value. Absent labels hold their fallback or "".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedFields(BTreeMap<String, String>);

impl ParsedFields {
    pub fn get(&self, label: &str) -> &str {
        self.0.get(label).map(String::as_str).unwrap_or("")
    }

    pub fn take(&mut self, label: &str) -> String {
        self.0.remove(label).unwrap_or_default()
    }
}

/// Extract each of `fields` from `text`. Never fails: a missing label yields
/// the field's fallback, or an empty string when it has none.
pub fn parse_titled_response(text: &str, fields: &[Field<'_>]) -> ParsedFields {
    let mut out = BTreeMap::new();

    for (i, field) in fields.iter().enumerate() {
        let is_last = i + 1 == fields.len();
        let value = extract_field(text, field.label, is_last)
            .or_else(|| field.fallback.map(str::to_string))
            .unwrap_or_default();

        out.insert(field.label.to_string(), value);
    }

    ParsedFields(out)
}

/// Extract `RATING` and `REVIEW`. Both are required; the rating is clamped
/// into [1, 5].
pub fn parse_rating_review(text: &str) -> Result<(f64, String), ParseError> {
    let raw_rating = extract_field(text, "RATING", false)
        .ok_or_else(|| ParseError::MissingField("RATING".to_string()))?;
    let review = extract_field(text, "REVIEW", true)
        .ok_or_else(|| ParseError::MissingField("REVIEW".to_string()))?;

    let rating = first_number(&raw_rating).ok_or(ParseError::InvalidRating(raw_rating))?;

    Ok((rating.clamp(RATING_MIN, RATING_MAX), review))
}

/// Trimmed value for `label`, or None when the label is absent or blank.
fn extract_field(text: &str, label: &str, to_end: bool) -> Option<String> {
    let re = label_regex(label, to_end);
    let value = re.captures(text)?.get(1)?.as_str().trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Compiled once per (label, to_end) pair.
fn label_regex(label: &str, to_end: bool) -> Regex {
    static CACHE: OnceLock<Mutex<HashMap<(String, bool), Regex>>> = OnceLock::new();

    let mut cache = CACHE
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    cache
        .entry((label.to_string(), to_end))
        .or_insert_with(|| {
            // `s` lets the value of the last field span lines.
            let flags = if to_end { "(?ims)" } else { "(?im)" };
            let pattern = format!(
                r"{flags}(?:^|\W)[#*]*{label}[ \t*]*:[ \t*]*(.*)",
                label = regex::escape(label)
            );
            Regex::new(&pattern).expect("escaped label regex")
        })
        .clone()
}

fn first_number(s: &str) -> Option<f64> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number regex"));

    re.find(s)?.as_str().parse().ok()
}
