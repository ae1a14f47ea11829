use bytes::Bytes;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;
use time::{macros::format_description, Date, UtcOffset};

use crate::members::repo_types::Member;

pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8;";

const HEADERS: [&str; 6] = [
    "Name",
    "Email",
    "Phone",
    "Skill Level",
    "Years at Club",
    "Date Submitted",
];

const BOM: &str = "\u{feff}";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No members to download")]
    NothingToExport,
    #[error("Failed to download CSV: {0}")]
    Write(String),
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Write(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub body: Bytes,
}

/// `members_<YYYY-MM-DD>.csv` for the day of the export.
pub fn export_filename(today: Date) -> String {
    let iso = today
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default();
    format!("members_{}.csv", iso)
}

/// Renders `members` as a BOM-prefixed CSV document. Rows are separated by
/// `\n` with no trailing terminator; `offset` decides the submission dates.
pub fn export_csv<'a, I>(members: I, today: Date, offset: UtcOffset) -> Result<CsvExport, ExportError>
where
    I: IntoIterator<Item = &'a Member>,
{
    let mut rows = members.into_iter().peekable();
    if rows.peek().is_none() {
        return Err(ExportError::NothingToExport);
    }

    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(BOM.as_bytes().to_vec());

    wtr.write_record(HEADERS)?;
    let submitted = format_description!("[month padding:none]/[day padding:none]/[year]");
    for m in rows {
        let date = m
            .created_at
            .to_offset(offset)
            .format(submitted)
            .map_err(|e| ExportError::Write(e.to_string()))?;
        wtr.write_record([
            m.full_name.as_str(),
            m.email.as_str(),
            m.phone.as_deref().unwrap_or(""),
            m.experience.as_str(),
            m.years_playing.as_str(),
            date.as_str(),
        ])?;
    }

    let mut body = wtr
        .into_inner()
        .map_err(|e| ExportError::Write(e.error().to_string()))?;
    if body.last() == Some(&b'\n') {
        body.pop();
    }

    Ok(CsvExport {
        filename: export_filename(today),
        body: Bytes::from(body),
    })
}
