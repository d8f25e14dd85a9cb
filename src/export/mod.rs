//! Tabular export of ranking results.
//!
//! Column layout, for `K = top_k`:
//!
//! ```text
//! text, suggestion1, score1, source1, ..., suggestionK, scoreK, sourceK,
//! [ndc1, ndc_score1, ..., ndcK, ndc_scoreK]   (split mode only)
//! need_review
//! ```

use std::io::{self, Write};

use crate::config::{Mode, RankingConfig};
use crate::ranking::ResultRow;


/// Column layout derived from a ranking configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportLayout {
    pub top_k: usize,
    pub include_taxonomy: bool,
}

impl ExportLayout {
    pub fn new(top_k: usize, include_taxonomy: bool) -> Self {
        Self {
            top_k,
            include_taxonomy,
        }
    }

    /// Taxonomy columns are emitted in split mode only.
    pub fn for_config(config: &RankingConfig) -> Self {
        Self::new(config.top_k, config.mode == Mode::Split)
    }

    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["text".to_string()];
        for i in 1..=self.top_k {
            header.push(format!("suggestion{i}"));
            header.push(format!("score{i}"));
            header.push(format!("source{i}"));
        }
        if self.include_taxonomy {
            for i in 1..=self.top_k {
                header.push(format!("ndc{i}"));
                header.push(format!("ndc_score{i}"));
            }
        }
        header.push("need_review".to_string());
        header
    }

    /// One record per row; missing suggestions leave their cells empty.
    pub fn record(&self, row: &ResultRow) -> Vec<String> {
        let mut record = vec![row.text.clone()];
        for i in 0..self.top_k {
            match row.suggestions.get(i) {
                Some(s) => {
                    record.push(s.display_label());
                    record.push(format!("{:.3}", s.score));
                    record.push(s.source.to_string());
                }
                None => record.extend(std::iter::repeat_n(String::new(), 3)),
            }
        }
        if self.include_taxonomy {
            for i in 0..self.top_k {
                match row.taxonomy_suggestions.get(i) {
                    Some(s) => {
                        record.push(s.display_label());
                        record.push(format!("{:.3}", s.score));
                    }
                    None => record.extend(std::iter::repeat_n(String::new(), 2)),
                }
            }
        }
        record.push(if row.need_review { "yes" } else { "no" }.to_string());
        record
    }
}

/// Quotes a field when it contains a comma, quote, or line break.
pub fn escape_field(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}

fn write_line<W: Write>(writer: &mut W, fields: &[String]) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        writer.write_all(escape_field(field).as_bytes())?;
    }
    writer.write_all(b"\n")
}

/// Writes the header and one line per row as CSV.
pub fn write_csv<W: Write>(writer: &mut W, layout: &ExportLayout, rows: &[ResultRow]) -> io::Result<()> {
    write_line(writer, &layout.header())?;
    for row in rows {
        write_line(writer, &layout.record(row))?;
    }
    writer.flush()
}
