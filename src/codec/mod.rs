//! Tab separated offer records.
//!
//! Two layouts exist and are not interchangeable: the full layout embeds the
//! seed user and a comment text, the compact layout references the user by id.
//! Both parsers sit on the same [`tokenizer::RecordTokens`].

pub mod compact;
pub mod full;
pub mod tokenizer;

pub use compact::CompactRecordParser;
pub use full::FullRecordParser;

use tracing::warn;

/// A fixed record layout that decodes one line into `Record`
pub trait RecordParser {
    type Record;

    /// Number of tab separated fields in the layout
    const FIELD_COUNT: usize;

    /// Human readable layout name, for logs
    const NAME: &'static str;

    /// Decode one line; never fails, unparsable fields come back empty
    fn parse(line: &str) -> Self::Record;
}

/// Decode every non-blank line of `content` with parser `P`
pub fn parse_lines<P: RecordParser>(content: &str) -> Vec<P::Record> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(P::parse)
        .collect()
}

pub(crate) fn check_field_count(layout: &str, expected: usize, actual: usize) {
    if actual != expected {
        warn!(
            "{} record has {} fields, expected {}; decoding best-effort",
            layout, actual, expected
        );
    }
}
