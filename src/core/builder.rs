use crate::core::validator::resolve_talkgroup;
use crate::domain::diagnostics::ValidationWarning;
use crate::domain::model::{
    AnalogSettings, Channel, ChannelMode, Codeplug, Contact, DigitalSettings, SourceFile,
    SourceKind, TxPermit, Zone, ZoneKey,
};
use crate::input::{
    read_analog, read_digital_others, read_digital_repeaters, read_talkgroups, AnalogRow,
    DigitalOthersRow, RepeaterRow, TalkgroupRow,
};
use crate::utils::error::{ParseError, Result};
use std::collections::BTreeMap;

/// The model as assembled from the inputs, before band filtering and ordering.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub codeplug: Codeplug,
    pub warnings: Vec<ValidationWarning>,
}

/// Folds reader rows into contacts and zones.
///
/// Zones are keyed by name and kept in first-seen order; contacts are keyed
/// by name so a later definition replaces an earlier one.
#[derive(Debug, Default)]
pub struct CodeplugBuilder {
    contacts: BTreeMap<String, Contact>,
    zones: Vec<Zone>,
    zone_index: BTreeMap<String, usize>,
    warnings: Vec<ValidationWarning>,
}

impl CodeplugBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one source file. A bad header fails the whole file; bad rows are
    /// skipped with a warning.
    pub fn add_source(&mut self, source: &SourceFile) -> Result<()> {
        let file = source.name.as_str();
        let contents = source.contents.as_str();
        let before = self.warnings.len();

        match source.kind {
            SourceKind::Talkgroups => {
                for row in read_talkgroups(file, contents) {
                    self.accept(row, Self::add_talkgroup);
                }
            }
            SourceKind::Analog => {
                for row in read_analog(file, contents)? {
                    self.accept(row, Self::add_analog);
                }
            }
            SourceKind::DigitalOthers => {
                for row in read_digital_others(file, contents)? {
                    self.accept(row, Self::add_digital_other);
                }
            }
            SourceKind::DigitalRepeaters => {
                for row in read_digital_repeaters(file, contents)? {
                    self.accept(row, Self::add_repeater);
                }
            }
        }

        tracing::debug!(
            "{}: {} warnings",
            file,
            self.warnings.len() - before
        );
        Ok(())
    }

    fn accept<T>(&mut self, row: std::result::Result<T, ParseError>, add: fn(&mut Self, T)) {
        match row {
            Ok(row) => add(self, row),
            Err(err) => self.warn(ValidationWarning::SkippedRow(err)),
        }
    }

    fn warn(&mut self, warning: ValidationWarning) {
        warning.emit();
        self.warnings.push(warning);
    }

    pub fn add_talkgroup(&mut self, row: TalkgroupRow) {
        let contact = Contact {
            name: row.name.clone(),
            dmr_id: row.dmr_id,
            call_type: row.call_type,
        };
        if self.contacts.insert(row.name.clone(), contact).is_some() {
            self.warn(ValidationWarning::DuplicateContact {
                origin: row.origin,
                name: row.name,
            });
        }
    }

    pub fn add_analog(&mut self, row: AnalogRow) {
        let channel = Channel {
            name: row.name,
            power: row.power,
            rx_freq: row.rx_freq,
            tx_freq: row.tx_freq,
            zone: row.zone.name.clone(),
            source: SourceKind::Analog,
            origin: row.origin,
            mode: ChannelMode::Analog(AnalogSettings {
                bandwidth: row.bandwidth,
                ctcss_decode: row.ctcss_decode,
                ctcss_encode: row.ctcss_encode,
                tx_prohibit: row.tx_prohibit,
                aprs: row.aprs,
            }),
        };
        self.zone_mut(&row.zone, SourceKind::Analog)
            .channels
            .push(channel);
    }

    pub fn add_digital_other(&mut self, row: DigitalOthersRow) {
        // A row that resolves to no contact leaves no trace on zone order.
        let resolved = resolve_talkgroup(&self.contacts, &row.talkgroup, &row.name, &row.origin);
        let contact = match resolved {
            Ok(contact) => contact,
            Err(warning) => return self.warn(warning),
        };
        let tx_permit = row
            .tx_permit
            .unwrap_or_else(|| derive_tx_permit(row.rx_freq, row.tx_freq));
        let channel = Channel {
            name: row.name,
            power: row.power,
            rx_freq: row.rx_freq,
            tx_freq: row.tx_freq,
            zone: row.zone.name.clone(),
            source: SourceKind::DigitalOthers,
            origin: row.origin,
            mode: ChannelMode::Digital(DigitalSettings {
                color_code: row.color_code,
                contact,
                timeslot: row.timeslot,
                tx_permit,
            }),
        };
        self.zone_mut(&row.zone, SourceKind::DigitalOthers)
            .channels
            .push(channel);
    }

    /// Expands one repeater into a channel per talkgroup it carries, named
    /// `"{zone code or name} {talkgroup} {timeslot}"`.
    pub fn add_repeater(&mut self, row: RepeaterRow) {
        if row.rx_freq == 0.0 {
            return self.warn(ValidationWarning::NoFrequency {
                origin: row.origin,
                zone: row.zone.name,
            });
        }
        self.zone_mut(&row.zone, SourceKind::DigitalRepeaters);

        let tx_permit = derive_tx_permit(row.rx_freq, row.tx_freq);
        for (talkgroup, timeslot) in &row.talkgroups {
            let name = format!("{} {} {}", row.zone.label(), talkgroup, timeslot.number());
            let contact = match resolve_talkgroup(&self.contacts, talkgroup, &name, &row.origin) {
                Ok(contact) => contact,
                Err(warning) => {
                    self.warn(warning);
                    continue;
                }
            };
            let channel = Channel {
                name,
                power: row.power,
                rx_freq: row.rx_freq,
                tx_freq: row.tx_freq,
                zone: row.zone.name.clone(),
                source: SourceKind::DigitalRepeaters,
                origin: row.origin.clone(),
                mode: ChannelMode::Digital(DigitalSettings {
                    color_code: row.color_code,
                    contact,
                    timeslot: *timeslot,
                    tx_permit,
                }),
            };
            self.zone_mut(&row.zone, SourceKind::DigitalRepeaters)
                .channels
                .push(channel);
        }
    }

    fn zone_mut(&mut self, key: &ZoneKey, source: SourceKind) -> &mut Zone {
        let index = match self.zone_index.get(&key.name) {
            Some(&index) => index,
            None => {
                let index = self.zones.len();
                self.zones.push(Zone {
                    name: key.name.clone(),
                    code: None,
                    channels: Vec::new(),
                    source_order: index,
                    first_source: source,
                });
                self.zone_index.insert(key.name.clone(), index);
                index
            }
        };
        let zone = &mut self.zones[index];
        if zone.code.is_none() {
            zone.code = key.code.clone();
        }
        zone
    }

    pub fn build(self) -> BuildOutput {
        BuildOutput {
            codeplug: Codeplug {
                contacts: self.contacts.into_values().collect(),
                zones: self.zones,
                scan_lists: Vec::new(),
            },
            warnings: self.warnings,
        }
    }
}

/// Repeaters only accept traffic on their own color code; simplex is open.
pub fn derive_tx_permit(rx_freq: f64, tx_freq: f64) -> TxPermit {
    if (tx_freq - rx_freq).abs() > 1e-6 {
        TxPermit::SameColorCode
    } else {
        TxPermit::Always
    }
}

/// Builds the model from every source file. Talkgroups are read first so
/// channels can resolve them; the other kinds follow in the order Analog,
/// Digital-Others, Digital-Repeaters, each by file name.
pub fn build_codeplug(sources: &[SourceFile]) -> Result<BuildOutput> {
    let mut ordered: Vec<&SourceFile> = sources.iter().collect();
    ordered.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));

    let mut builder = CodeplugBuilder::new();
    for source in ordered {
        tracing::info!("Reading {}", source.name);
        builder.add_source(source)?;
    }
    let output = builder.build();

    tracing::info!(
        "Built {} contacts, {} channels, {} zones",
        output.codeplug.contacts.len(),
        output.codeplug.channel_count(),
        output.codeplug.zones.len()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::orderer::{order, SortMode};
    use crate::domain::model::{CallType, Timeslot};

    fn source(kind: SourceKind, name: &str, contents: &str) -> SourceFile {
        SourceFile {
            kind,
            name: name.to_string(),
            contents: contents.to_string(),
        }
    }

    const REPEATER_HEADER: &str = "Zone Name,Comment,Power,RX Freq,TX Freq,Color Code";

    #[test]
    fn test_k7abd_local_scenario() {
        let sources = vec![
            source(SourceKind::Talkgroups, "Talkgroups__a.csv", "Local,9\n"),
            source(
                SourceKind::DigitalRepeaters,
                "Digital-Repeaters__a.csv",
                &format!(
                    "{},Local\nK7ABD;K7ABD,Seattle,High,440.600,445.600,1,1\n",
                    REPEATER_HEADER
                ),
            ),
        ];
        let output = build_codeplug(&sources).unwrap();
        let zone = output.codeplug.zone("K7ABD").unwrap();
        assert_eq!(zone.channels.len(), 1);

        let channel = &zone.channels[0];
        assert_eq!(channel.name, "K7ABD Local 1");
        let digital = channel.digital().unwrap();
        assert_eq!(digital.color_code, 1);
        assert_eq!(digital.contact.dmr_id, 9);
        assert_eq!(digital.timeslot, Timeslot::One);
        assert_eq!(digital.tx_permit, TxPermit::SameColorCode);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_repeater_expands_one_channel_per_talkgroup() {
        let sources = vec![
            source(
                SourceKind::Talkgroups,
                "Talkgroups__a.csv",
                "PNW Rgnl 2,8951\nLocal,9\nTAC 310,310\n",
            ),
            source(
                SourceKind::DigitalRepeaters,
                "Digital-Repeaters__a.csv",
                &format!(
                    "{},PNW Rgnl 2,Local,TAC 310\nTiger Mtn,,High,442.500,447.500,2,2,-,1\n",
                    REPEATER_HEADER
                ),
            ),
        ];
        let output = build_codeplug(&sources).unwrap();
        let names: Vec<&str> = output
            .codeplug
            .zone("Tiger Mtn")
            .unwrap()
            .channels
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Tiger Mtn PNW Rgnl 2 2", "Tiger Mtn TAC 310 1"]);
    }

    #[test]
    fn test_unknown_talkgroup_drops_channel_with_warning() {
        let sources = vec![
            source(SourceKind::Talkgroups, "Talkgroups__a.csv", "Local,9\n"),
            source(
                SourceKind::DigitalOthers,
                "Digital-Others__a.csv",
                "Zone,Channel Name,Power,RX Freq,TX Freq,Color Code,Talk Group,TimeSlot\n\
                 Simplex,DMR 99,Low,441.000,441.000,1,Simplex 99,1\n\
                 Simplex,DMR Local,Low,441.000,441.000,1,Local,1\n",
            ),
        ];
        let output = build_codeplug(&sources).unwrap();
        let zone = output.codeplug.zone("Simplex").unwrap();
        assert_eq!(zone.channels.len(), 1);
        assert_eq!(zone.channels[0].name, "DMR Local");
        assert_eq!(
            zone.channels[0].digital().unwrap().tx_permit,
            TxPermit::Always
        );
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].is_unknown_talkgroup());
    }

    #[test]
    fn test_unknown_talkgroup_alone_creates_no_zone() {
        let sources = vec![
            source(SourceKind::Talkgroups, "Talkgroups__a.csv", "Local,9\n"),
            source(
                SourceKind::DigitalOthers,
                "Digital-Others__a.csv",
                "Zone,Channel Name,Power,RX Freq,TX Freq,Color Code,Talk Group,TimeSlot\n\
                 Hotspot,DMR 99,Low,441.000,441.000,1,Simplex 99,1\n",
            ),
        ];
        let output = build_codeplug(&sources).unwrap();
        assert!(output.codeplug.zone("Hotspot").is_none());
        assert!(output.codeplug.zones.is_empty());
        assert!(output.warnings[0].is_unknown_talkgroup());
    }

    #[test]
    fn test_dropped_digital_other_does_not_classify_repeater_zone() {
        let sources = vec![
            source(
                SourceKind::Analog,
                "Analog__a.csv",
                "Zone,Channel Name,Power,RX Freq,TX Freq\nSimplex,2M Call,High,146.520,146.520\n",
            ),
            source(
                SourceKind::DigitalOthers,
                "Digital-Others__a.csv",
                "Zone,Channel Name,Power,RX Freq,TX Freq,Color Code,Talk Group,TimeSlot\n\
                 K7ABD,K7ABD Typo,High,440.600,445.600,1,Lcoal,1\n",
            ),
            source(
                SourceKind::DigitalRepeaters,
                "Digital-Repeaters__a.csv",
                &format!(
                    "{},Local\nK7ABD;K7ABD,Seattle,High,440.600,445.600,1,1\n",
                    REPEATER_HEADER
                ),
            ),
            source(SourceKind::Talkgroups, "Talkgroups__a.csv", "Local,9\n"),
        ];
        let output = build_codeplug(&sources).unwrap();
        let zone = output.codeplug.zone("K7ABD").unwrap();
        assert_eq!(zone.first_source, SourceKind::DigitalRepeaters);
        assert_eq!(zone.channels.len(), 1);
        assert_eq!(zone.source_order, 1);

        let ordered = order(output.codeplug, SortMode::RepeatersFirst);
        let names: Vec<&str> = ordered.zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["K7ABD", "Simplex"]);
    }

    #[test]
    fn test_same_zone_from_two_files_merges_in_first_seen_order() {
        let header = "Zone,Channel Name,Power,RX Freq,TX Freq";
        let sources = vec![
            source(
                SourceKind::Analog,
                "Analog__b.csv",
                &format!(
                    "{}\nHome;HM,B1,High,146.500,146.500\nOther,O1,High,146.400,146.400\n",
                    header
                ),
            ),
            source(
                SourceKind::Analog,
                "Analog__a.csv",
                &format!("{}\nHome,A1,High,146.520,146.520\n", header),
            ),
        ];
        let output = build_codeplug(&sources).unwrap();
        let zones = &output.codeplug.zones;
        assert_eq!(zones.len(), 2);
        // Analog__a.csv sorts first, so Home is seen first.
        assert_eq!(zones[0].name, "Home");
        assert_eq!(zones[0].source_order, 0);
        assert_eq!(zones[0].code.as_deref(), Some("HM"));
        let names: Vec<&str> = zones[0].channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A1", "B1"]);
        assert_eq!(zones[1].name, "Other");
        assert_eq!(zones[1].source_order, 1);
    }

    #[test]
    fn test_duplicate_talkgroup_last_wins() {
        let sources = vec![
            source(SourceKind::Talkgroups, "Talkgroups__a.csv", "Local,9\n"),
            source(SourceKind::Talkgroups, "Talkgroups__b.csv", "Local,2P\n"),
        ];
        let output = build_codeplug(&sources).unwrap();
        assert_eq!(output.codeplug.contacts.len(), 1);
        assert_eq!(output.codeplug.contacts[0].dmr_id, 2);
        assert_eq!(output.codeplug.contacts[0].call_type, CallType::Private);
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn test_repeater_without_frequency_is_skipped() {
        let sources = vec![
            source(SourceKind::Talkgroups, "Talkgroups__a.csv", "Local,9\n"),
            source(
                SourceKind::DigitalRepeaters,
                "Digital-Repeaters__a.csv",
                &format!("{},Local\nSilent,,High,0,0,1,1\n", REPEATER_HEADER),
            ),
        ];
        let output = build_codeplug(&sources).unwrap();
        assert!(output.codeplug.zone("Silent").is_none());
        assert!(matches!(
            output.warnings[0],
            ValidationWarning::NoFrequency { .. }
        ));
    }

    #[test]
    fn test_bad_header_fails_the_build() {
        let sources = vec![source(
            SourceKind::Analog,
            "Analog__bad.csv",
            "Zone,Channel Name\nHome,A1\n",
        )];
        assert!(build_codeplug(&sources).is_err());
    }
}
