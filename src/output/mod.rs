//! CPS import file writers, one module per radio.
//!
//! The radios' layouts look alike today but are owned separately: each module
//! declares its own columns, defaults and value spellings.

pub mod anytone_878;
pub mod anytone_890;
pub mod table;

use crate::core::validator::FrequencyBand;
use crate::domain::model::{Codeplug, OutputFile};
use crate::utils::error::{CodeplugError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CHANNEL_FILE: &str = "Channel.CSV";
pub const TALKGROUPS_FILE: &str = "TalkGroups.CSV";
pub const ZONE_FILE: &str = "Zone.CSV";
pub const SCANLIST_FILE: &str = "ScanList.CSV";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RadioModel {
    #[serde(rename = "878")]
    Anytone878,
    #[serde(rename = "890")]
    Anytone890,
}

impl RadioModel {
    pub const ALL: [RadioModel; 2] = [RadioModel::Anytone878, RadioModel::Anytone890];

    /// Short id, also the output subdirectory name.
    pub fn id(self) -> &'static str {
        match self {
            RadioModel::Anytone878 => "878",
            RadioModel::Anytone890 => "890",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RadioModel::Anytone878 => anytone_878::RADIO_NAME,
            RadioModel::Anytone890 => anytone_890::RADIO_NAME,
        }
    }

    pub fn bands(self) -> &'static [FrequencyBand] {
        match self {
            RadioModel::Anytone878 => anytone_878::BANDS,
            RadioModel::Anytone890 => anytone_890::BANDS,
        }
    }

    /// Encodes a finalized model into the radio's four import files.
    pub fn serialize(self, codeplug: &Codeplug) -> Result<Vec<OutputFile>> {
        match self {
            RadioModel::Anytone878 => anytone_878::serialize(codeplug),
            RadioModel::Anytone890 => anytone_890::serialize(codeplug),
        }
    }
}

impl fmt::Display for RadioModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RadioModel {
    type Err = CodeplugError;

    fn from_str(s: &str) -> Result<Self> {
        RadioModel::ALL
            .into_iter()
            .find(|radio| radio.id() == s)
            .ok_or_else(|| CodeplugError::InvalidConfigValueError {
                field: "radio".to_string(),
                value: s.to_string(),
                reason: "supported radios are 878 and 890".to_string(),
            })
    }
}

/// MHz with the five decimal places the CPS writes.
pub(crate) fn format_frequency(mhz: f64) -> String {
    format!("{:.5}", mhz)
}
