use crate::domain::model::Origin;
use crate::utils::error::ParseError;
use std::fmt;

/// A recoverable problem with one record. The record is dropped or adjusted
/// and the run carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    SkippedRow(ParseError),
    UnknownTalkgroup {
        origin: Origin,
        channel: String,
        talkgroup: String,
    },
    OutOfBand {
        origin: Origin,
        channel: String,
        rx_freq: f64,
        tx_freq: f64,
    },
    NameTruncated {
        origin: Origin,
        original: String,
        truncated: String,
    },
    DuplicateName {
        origin: Origin,
        original: String,
        renamed: String,
    },
    InvalidColorCode {
        origin: Origin,
        channel: String,
        color_code: u8,
    },
    DuplicateContact {
        origin: Origin,
        name: String,
    },
    NoFrequency {
        origin: Origin,
        zone: String,
    },
}

impl ValidationWarning {
    /// Logs the warning. Missing repeater frequencies are routine in shared
    /// sheets and only reported at info level.
    pub fn emit(&self) {
        match self {
            ValidationWarning::NoFrequency { .. } => tracing::info!("{}", self),
            _ => tracing::warn!("{}", self),
        }
    }

    pub fn is_unknown_talkgroup(&self) -> bool {
        matches!(self, ValidationWarning::UnknownTalkgroup { .. })
    }

    pub fn is_out_of_band(&self) -> bool {
        matches!(self, ValidationWarning::OutOfBand { .. })
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::SkippedRow(err) => write!(f, "{} (row skipped)", err),
            ValidationWarning::UnknownTalkgroup {
                origin,
                channel,
                talkgroup,
            } => write!(
                f,
                "{}: channel '{}' references unknown talkgroup '{}', skipping",
                origin, channel, talkgroup
            ),
            ValidationWarning::OutOfBand {
                origin,
                channel,
                rx_freq,
                tx_freq,
            } => write!(
                f,
                "{}: channel '{}' ({:.5}/{:.5} MHz) is outside the supported bands, skipping",
                origin, channel, rx_freq, tx_freq
            ),
            ValidationWarning::NameTruncated {
                origin,
                original,
                truncated,
            } => write!(
                f,
                "{}: name '{}' is too long, truncated to '{}'",
                origin, original, truncated
            ),
            ValidationWarning::DuplicateName {
                origin,
                original,
                renamed,
            } => write!(
                f,
                "{}: name '{}' already used, renamed to '{}'",
                origin, original, renamed
            ),
            ValidationWarning::InvalidColorCode {
                origin,
                channel,
                color_code,
            } => write!(
                f,
                "{}: channel '{}' has color code {} outside 1-15, skipping",
                origin, channel, color_code
            ),
            ValidationWarning::DuplicateContact { origin, name } => write!(
                f,
                "{}: talkgroup '{}' defined again, the later definition wins",
                origin, name
            ),
            ValidationWarning::NoFrequency { origin, zone } => write!(
                f,
                "{}: repeater '{}' has no frequency, skipping",
                origin, zone
            ),
        }
    }
}
