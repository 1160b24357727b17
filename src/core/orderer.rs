use crate::domain::model::{Codeplug, ScanList, SourceKind, Zone};
use crate::utils::error::CodeplugError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How zones, and in `alpha` mode the channels inside them, are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Zones and their channels A-Z.
    #[default]
    Alpha,
    /// Digital repeater zones first, then the rest, both in file order.
    RepeatersFirst,
    /// Analog and Digital-Others zones first, then repeater zones, in file order.
    AnalogFirst,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Alpha => "alpha",
            SortMode::RepeatersFirst => "repeaters-first",
            SortMode::AnalogFirst => "analog-first",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = CodeplugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpha" => Ok(SortMode::Alpha),
            "repeaters-first" => Ok(SortMode::RepeatersFirst),
            "analog-first" => Ok(SortMode::AnalogFirst),
            other => Err(CodeplugError::InvalidConfigValueError {
                field: "sort".to_string(),
                value: other.to_string(),
                reason: "expected alpha, repeaters-first or analog-first".to_string(),
            }),
        }
    }
}

/// A zone counts as a repeater zone when its first contributing row came
/// from a Digital-Repeaters file, whatever was merged into it later.
fn is_repeater_zone(zone: &Zone) -> bool {
    zone.first_source == SourceKind::DigitalRepeaters
}

/// Orders the validated model and derives one scan list per zone.
///
/// Contacts are always sorted by name. Outside `alpha` mode channels keep
/// their insertion order.
pub fn order(codeplug: Codeplug, mode: SortMode) -> Codeplug {
    let Codeplug {
        mut contacts,
        mut zones,
        ..
    } = codeplug;

    contacts.sort_by(|a, b| a.name.cmp(&b.name));

    match mode {
        SortMode::Alpha => {
            zones.sort_by(|a, b| a.name.cmp(&b.name));
            for zone in &mut zones {
                zone.channels.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }
        SortMode::RepeatersFirst => {
            zones.sort_by_key(|zone| (!is_repeater_zone(zone), zone.source_order));
        }
        SortMode::AnalogFirst => {
            zones.sort_by_key(|zone| (is_repeater_zone(zone), zone.source_order));
        }
    }

    let scan_lists = zones
        .iter()
        .map(|zone| ScanList {
            name: zone.name.clone(),
            channels: zone.channels.clone(),
        })
        .collect();

    tracing::debug!("ordered {} zones ({})", zones.len(), mode);
    Codeplug {
        contacts,
        zones,
        scan_lists,
    }
}
