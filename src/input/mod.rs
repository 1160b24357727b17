//! Readers for the four K7ABD CSV dialects.
//!
//! Each reader validates the header up front (a bad header is a structural
//! error for the whole file) and then yields one `Result` per data row, so a
//! single malformed row never hides the rest of the file.

pub mod analog;
pub mod digital_others;
pub mod digital_repeaters;
pub mod talkgroups;

use crate::domain::model::{
    AprsPttMode, AprsReportType, Bandwidth, Origin, Power, Timeslot, Tone, TxPermit,
};
use crate::utils::error::ParseError;
use csv::StringRecord;
use std::collections::HashMap;

pub use analog::{read_analog, AnalogRow};
pub use digital_others::{read_digital_others, DigitalOthersRow};
pub use digital_repeaters::{read_digital_repeaters, RepeaterRow};
pub use talkgroups::{read_talkgroups, TalkgroupRow};

/// Raw records of one file with their 1-based line numbers. Rows with no
/// content (spreadsheet padding like `,,,,`) are dropped here.
pub(crate) fn records<'a>(
    file: &'a str,
    contents: &'a str,
) -> impl Iterator<Item = Result<(u64, StringRecord), ParseError>> + 'a {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    reader
        .into_records()
        .filter_map(move |result| match result {
            Ok(record) => {
                if record.iter().all(str::is_empty) {
                    return None;
                }
                let row = line_at(contents, record.position());
                Some(Ok((row, record)))
            }
            Err(e) => {
                let row = line_at(contents, e.position());
                Some(Err(ParseError::new(file, row, e.to_string())))
            }
        })
}

/// 1-based line a record starts on. The reader positions a record just past
/// the previous one, before the blank lines it skips, so those are stepped
/// over here and counted from the text.
fn line_at(contents: &str, position: Option<&csv::Position>) -> u64 {
    let Some(byte) = position.and_then(|p| usize::try_from(p.byte()).ok()) else {
        return 0;
    };
    let Some(rest) = contents.get(byte..) else {
        return 0;
    };
    let start = byte + (rest.len() - rest.trim_start_matches(['\r', '\n']).len());
    contents[..start].matches('\n').count() as u64 + 1
}

/// Reads a file whose first record is a header.
///
/// `locate` resolves the dialect's columns once against the header; its
/// error aborts the file. `parse` then runs lazily per data row. An empty
/// file has no header and yields no rows.
pub(crate) fn read_with_header<'a, C, T>(
    file: &'a str,
    contents: &'a str,
    locate: impl FnOnce(&Header) -> Result<C, ParseError>,
    parse: impl Fn(&C, &Fields<'_>) -> Result<T, ParseError> + 'a,
) -> Result<impl Iterator<Item = Result<T, ParseError>> + 'a, ParseError>
where
    C: 'a,
{
    let mut rows = records(file, contents);
    let body = match rows.next() {
        None => {
            tracing::debug!("{} is empty", file);
            None
        }
        Some(first) => {
            let (line, record) = first?;
            let header = Header::new(file, line, &record);
            let columns = locate(&header)?;
            Some(rows.map(move |row| {
                let (line, record) = row?;
                header.check_width(line, &record)?;
                parse(&columns, &Fields::new(file, line, &record))
            }))
        }
    };
    Ok(body.into_iter().flatten())
}

/// Column lookup by case-insensitive name.
#[derive(Debug, Clone)]
pub(crate) struct Header {
    file: String,
    row: u64,
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    pub(crate) fn new(file: &str, row: u64, record: &StringRecord) -> Self {
        let columns: Vec<String> = record.iter().map(str::to_string).collect();
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_ascii_lowercase(), i))
            .collect();
        Self {
            file: file.to_string(),
            row,
            columns,
            index,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.columns.len()
    }

    pub(crate) fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of the first alias present; any spelling case matches.
    pub(crate) fn optional(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.index.get(&alias.to_ascii_lowercase()).copied())
    }

    pub(crate) fn require(&self, aliases: &[&str]) -> Result<usize, ParseError> {
        self.optional(aliases).ok_or_else(|| {
            ParseError::new(
                &self.file,
                self.row,
                format!("missing required column '{}'", aliases[0]),
            )
        })
    }

    /// Checks the data row has exactly as many fields as the header.
    pub(crate) fn check_width(
        &self,
        row: u64,
        record: &StringRecord,
    ) -> Result<(), ParseError> {
        if record.len() != self.columns.len() {
            return Err(ParseError::new(
                &self.file,
                row,
                format!(
                    "expected {} columns, found {}",
                    self.columns.len(),
                    record.len()
                ),
            ));
        }
        Ok(())
    }
}

/// Per-row field access that turns bad values into `ParseError`s carrying
/// the file, row and column.
pub(crate) struct Fields<'r> {
    origin: Origin,
    record: &'r StringRecord,
}

impl<'r> Fields<'r> {
    pub(crate) fn new(file: &str, row: u64, record: &'r StringRecord) -> Self {
        Self {
            origin: Origin::new(file, row),
            record,
        }
    }

    pub(crate) fn origin(&self) -> &Origin {
        &self.origin
    }

    pub(crate) fn error(&self, reason: impl Into<String>) -> ParseError {
        ParseError::new(&self.origin.file, self.origin.row, reason)
    }

    pub(crate) fn get(&self, index: usize) -> &'r str {
        self.record.get(index).unwrap_or("")
    }

    pub(crate) fn get_opt(&self, index: Option<usize>) -> &'r str {
        index.map(|i| self.get(i)).unwrap_or("")
    }

    pub(crate) fn text(&self, index: usize, column: &str) -> Result<String, ParseError> {
        let value = self.get(index);
        if value.is_empty() {
            return Err(self.error(format!("empty {}", column)));
        }
        Ok(value.to_string())
    }

    pub(crate) fn frequency(&self, index: usize, column: &str) -> Result<f64, ParseError> {
        let raw = self.get(index);
        match raw.parse::<f64>() {
            Ok(mhz) if mhz.is_finite() && mhz >= 0.0 => Ok(mhz),
            _ => Err(self.error(format!("non-numeric {} '{}'", column, raw))),
        }
    }

    pub(crate) fn power(&self, index: usize) -> Result<Power, ParseError> {
        parse_power(self.get(index)).map_err(|reason| self.error(reason))
    }

    pub(crate) fn color_code(&self, index: usize) -> Result<u8, ParseError> {
        let raw = self.get(index);
        raw.parse::<u8>()
            .map_err(|_| self.error(format!("non-numeric Color Code '{}'", raw)))
    }

    pub(crate) fn with<T>(
        &self,
        index: Option<usize>,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<T, ParseError> {
        parse(self.get_opt(index)).map_err(|reason| self.error(reason))
    }
}

pub(crate) fn parse_power(raw: &str) -> Result<Power, String> {
    match raw.to_ascii_lowercase().as_str() {
        "low" => Ok(Power::Low),
        "mid" | "med" | "medium" => Ok(Power::Medium),
        "high" => Ok(Power::High),
        "turbo" => Ok(Power::Turbo),
        _ => Err(format!("unknown Power '{}'", raw)),
    }
}

/// Missing bandwidth means a wide (25 kHz) channel.
pub(crate) fn parse_bandwidth(raw: &str) -> Result<Bandwidth, String> {
    let value = raw.trim_end_matches(['K', 'k']);
    match value {
        "" | "25" => Ok(Bandwidth::Wide),
        "20" => Ok(Bandwidth::Medium),
        "12.5" => Ok(Bandwidth::Narrow),
        _ => Err(format!("unknown Bandwidth '{}'", raw)),
    }
}

/// CTCSS frequencies (`100.0`) and DCS codes (`D023N`) pass through as written.
pub(crate) fn parse_tone(raw: &str) -> Result<Tone, String> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("off") || raw.eq_ignore_ascii_case("none") {
        return Ok(Tone::Off);
    }
    let is_ctcss = raw.parse::<f64>().map(|hz| hz > 0.0).unwrap_or(false);
    let is_dcs = raw.len() > 1
        && raw.starts_with(['D', 'd'])
        && raw[1..].chars().all(|c| c.is_ascii_alphanumeric());
    if is_ctcss || is_dcs {
        Ok(Tone::Code(raw.to_string()))
    } else {
        Err(format!("invalid tone '{}'", raw))
    }
}

pub(crate) fn parse_on_off(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "" | "off" | "no" | "false" | "0" => Ok(false),
        "on" | "yes" | "true" | "1" => Ok(true),
        _ => Err(format!("expected On or Off, found '{}'", raw)),
    }
}

pub(crate) fn parse_timeslot(raw: &str) -> Result<Timeslot, String> {
    match raw {
        "" | "1" => Ok(Timeslot::One),
        "2" => Ok(Timeslot::Two),
        _ => Err(format!("timeslot must be 1 or 2, found '{}'", raw)),
    }
}

pub(crate) fn parse_tx_permit(raw: &str) -> Result<Option<TxPermit>, String> {
    let squashed: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    match squashed.as_str() {
        "" => Ok(None),
        "always" => Ok(Some(TxPermit::Always)),
        "samecolor" | "samecolorcode" => Ok(Some(TxPermit::SameColorCode)),
        _ => Err(format!("unknown TX Permit '{}'", raw)),
    }
}

pub(crate) fn parse_aprs_ptt_mode(raw: &str) -> Result<AprsPttMode, String> {
    match raw.to_ascii_lowercase().as_str() {
        "" | "off" => Ok(AprsPttMode::Off),
        "start" | "start of transmission" => Ok(AprsPttMode::Start),
        "end" | "end of transmission" => Ok(AprsPttMode::End),
        "both" | "start and end" | "start & end" => Ok(AprsPttMode::Both),
        _ => Err(format!("unknown APRS PTT Mode '{}'", raw)),
    }
}

pub(crate) fn parse_aprs_report_type(raw: &str) -> Result<AprsReportType, String> {
    match raw.to_ascii_lowercase().as_str() {
        "" | "off" => Ok(AprsReportType::Off),
        "analog" => Ok(AprsReportType::Analog),
        "digital" => Ok(AprsReportType::Digital),
        _ => Err(format!("unknown APRS Report Type '{}'", raw)),
    }
}

pub(crate) fn parse_small_number(raw: &str, default: u8, column: &str) -> Result<u8, String> {
    if raw.is_empty() {
        return Ok(default);
    }
    raw.parse::<u8>()
        .map_err(|_| format!("non-numeric {} '{}'", column, raw))
}
