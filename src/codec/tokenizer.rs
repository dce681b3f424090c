use chrono::{DateTime, SecondsFormat, Utc};
use std::str::FromStr;

pub const FIELD_DELIMITER: char = '\t';
pub const LIST_DELIMITER: char = ';';

/// Positional view over one tab separated record line.
///
/// Every accessor is lenient: a missing position or an unparsable token comes
/// back as `None` (or empty), never as an error.
#[derive(Debug, Clone)]
pub struct RecordTokens<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> RecordTokens<'a> {
    /// Strip one trailing line break and split on tabs
    pub fn split(line: &'a str) -> Self {
        let line = match line.strip_suffix('\n') {
            Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
            None => line,
        };

        Self {
            tokens: line.split(FIELD_DELIMITER).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn token(&self, position: usize) -> Option<&'a str> {
        self.tokens.get(position).copied()
    }

    pub fn text(&self, position: usize) -> String {
        self.token(position).unwrap_or_default().to_string()
    }

    /// `;` separated sub-list; an empty or missing token is an empty list
    pub fn list(&self, position: usize) -> Vec<String> {
        match self.token(position) {
            Some(token) if !token.is_empty() => {
                token.split(LIST_DELIMITER).map(str::to_string).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Base-10 integer
    pub fn int<T: FromStr>(&self, position: usize) -> Option<T> {
        self.token(position)?.trim().parse().ok()
    }

    /// Finite float; `NaN` and infinities count as unparsable
    pub fn float(&self, position: usize) -> Option<f64> {
        self.token(position)?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }

    pub fn boolean(&self, position: usize) -> Option<bool> {
        match self.token(position)?.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    pub fn timestamp(&self, position: usize) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.token(position)?.trim())
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }
}

/// Join already formatted fields into one record line (no trailing newline)
pub fn join_fields(fields: &[String]) -> String {
    fields.join(&FIELD_DELIMITER.to_string())
}

pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(&LIST_DELIMITER.to_string())
}

/// ISO-8601 with millisecond precision and a `Z` suffix
pub fn format_timestamp(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}
