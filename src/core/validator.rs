use crate::domain::diagnostics::ValidationWarning;
use crate::domain::model::{Channel, ChannelMode, Codeplug, Contact, Origin, Zone};
use std::collections::{BTreeMap, HashSet};

/// Longest channel or zone name the Anytone CPS accepts.
pub const NAME_MAX: usize = 16;

/// An inclusive frequency range in MHz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    pub low_mhz: f64,
    pub high_mhz: f64,
}

impl FrequencyBand {
    pub const VHF: FrequencyBand = FrequencyBand {
        low_mhz: 136.0,
        high_mhz: 174.0,
    };
    pub const UHF: FrequencyBand = FrequencyBand {
        low_mhz: 400.0,
        high_mhz: 480.0,
    };

    pub fn contains(&self, mhz: f64) -> bool {
        self.low_mhz <= mhz && mhz <= self.high_mhz
    }
}

/// Looks a talkgroup up by exact name.
pub fn resolve_talkgroup(
    contacts: &BTreeMap<String, Contact>,
    talkgroup: &str,
    channel: &str,
    origin: &Origin,
) -> Result<Contact, ValidationWarning> {
    contacts
        .get(talkgroup)
        .cloned()
        .ok_or_else(|| ValidationWarning::UnknownTalkgroup {
            origin: origin.clone(),
            channel: channel.to_string(),
            talkgroup: talkgroup.to_string(),
        })
}

/// Applies one radio's field constraints to a built model.
///
/// Every check drops or adjusts a single record and moves on, so the result
/// is always usable. Names are truncated and made unique in source order,
/// which keeps them identical for every radio sharing the same bands.
#[derive(Debug, Clone)]
pub struct Validator {
    bands: Vec<FrequencyBand>,
    name_max: usize,
}

impl Validator {
    pub fn new(bands: &[FrequencyBand]) -> Self {
        Self {
            bands: bands.to_vec(),
            name_max: NAME_MAX,
        }
    }

    pub fn in_band(&self, mhz: f64) -> bool {
        self.bands.iter().any(|band| band.contains(mhz))
    }

    pub fn validate(&self, codeplug: Codeplug) -> (Codeplug, Vec<ValidationWarning>) {
        let mut warnings = Vec::new();
        let mut channel_names = HashSet::new();
        let mut zone_names = HashSet::new();
        let mut zones = Vec::with_capacity(codeplug.zones.len());

        for zone in codeplug.zones {
            let Zone {
                name,
                code,
                channels,
                source_order,
                first_source,
            } = zone;

            let mut kept = Vec::with_capacity(channels.len());
            for channel in channels {
                if let Some(channel) = self.check_channel(channel, &mut warnings) {
                    kept.push(channel);
                }
            }
            if kept.is_empty() {
                tracing::debug!("zone '{}' has no usable channels, dropping it", name);
                continue;
            }

            let origin = kept[0].origin.clone();
            let zone_name = self.fit_name(&name, &origin, &mut zone_names, &mut warnings);
            for channel in &mut kept {
                channel.name = self.fit_name(
                    &channel.name,
                    &channel.origin,
                    &mut channel_names,
                    &mut warnings,
                );
                channel.zone = zone_name.clone();
            }

            zones.push(Zone {
                name: zone_name,
                code,
                channels: kept,
                source_order,
                first_source,
            });
        }

        for warning in &warnings {
            warning.emit();
        }
        (
            Codeplug {
                contacts: codeplug.contacts,
                zones,
                scan_lists: Vec::new(),
            },
            warnings,
        )
    }

    fn check_channel(
        &self,
        channel: Channel,
        warnings: &mut Vec<ValidationWarning>,
    ) -> Option<Channel> {
        if !self.in_band(channel.rx_freq) || !self.in_band(channel.tx_freq) {
            warnings.push(ValidationWarning::OutOfBand {
                origin: channel.origin,
                channel: channel.name,
                rx_freq: channel.rx_freq,
                tx_freq: channel.tx_freq,
            });
            return None;
        }
        if let ChannelMode::Digital(digital) = &channel.mode {
            if !(1..=15).contains(&digital.color_code) {
                warnings.push(ValidationWarning::InvalidColorCode {
                    color_code: digital.color_code,
                    origin: channel.origin,
                    channel: channel.name,
                });
                return None;
            }
        }
        Some(channel)
    }

    /// Truncates `name` to the field width, then suffixes ` N` until it is
    /// not already in `used`.
    fn fit_name(
        &self,
        name: &str,
        origin: &Origin,
        used: &mut HashSet<String>,
        warnings: &mut Vec<ValidationWarning>,
    ) -> String {
        let mut fitted = name.to_string();
        if name.chars().count() > self.name_max {
            fitted = name.chars().take(self.name_max).collect();
            warnings.push(ValidationWarning::NameTruncated {
                origin: origin.clone(),
                original: name.to_string(),
                truncated: fitted.clone(),
            });
        }

        if used.contains(&fitted) {
            let base = fitted;
            fitted = (1..)
                .map(|n: usize| {
                    let suffix = format!(" {}", n);
                    let keep = self.name_max.saturating_sub(suffix.len());
                    format!("{}{}", base.chars().take(keep).collect::<String>(), suffix)
                })
                .find(|candidate| !used.contains(candidate))
                .unwrap_or_else(|| base.clone());
            warnings.push(ValidationWarning::DuplicateName {
                origin: origin.clone(),
                original: base,
                renamed: fitted.clone(),
            });
        }

        used.insert(fitted.clone());
        fitted
    }
}
