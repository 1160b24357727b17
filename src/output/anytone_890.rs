//! Anytone AT-D890 import layout.
//!
//! The 890 CPS renames several 878 columns (`Bandwidth`, `RX Color Code`,
//! `Contact/TG`, `Digital Duplex`, `DMR Mode`), carries APRS mute and TX path
//! per channel and adds a hidden flag to every zone.

use crate::core::validator::FrequencyBand;
use crate::domain::model::{
    AnalogSettings, AprsPttMode, AprsReportType, CallType, Channel, ChannelMode, Codeplug,
    Contact, DigitalSettings, OutputFile, Power, ScanList, Tone, TxPermit, Zone,
};
use crate::output::table::{Layout, Members, Row, Table};
use crate::output::{format_frequency, CHANNEL_FILE, SCANLIST_FILE, TALKGROUPS_FILE, ZONE_FILE};
use crate::utils::error::Result;

pub const RADIO_NAME: &str = "Anytone AT-D890";
pub const BANDS: &[FrequencyBand] = &[FrequencyBand::VHF, FrequencyBand::UHF];

pub const SCANLIST_MAX: usize = 50;

const OFF: &str = "Off";
const ON: &str = "On";
const NONE: &str = "None";

const CHANNEL_COLUMNS: Layout = &[
    ("No.", ""),
    ("Channel Name", ""),
    ("Receive Frequency", ""),
    ("Transmit Frequency", ""),
    ("Channel Type", ""),
    ("Transmit Power", "High"),
    ("Bandwidth", "25K"),
    ("CTCSS/DCS Decode", OFF),
    ("CTCSS/DCS Encode", OFF),
    ("Contact/TG", ""),
    ("Contact/TG Call Type", "Group Call"),
    ("Contact/TG TG/DMR ID", "0"),
    ("Radio ID", ""),
    ("Busy Lock/TX Permit", "Always"),
    ("Squelch Mode", "Carrier"),
    ("Optional Signal", OFF),
    ("DTMF ID", "1"),
    ("2Tone ID", "1"),
    ("5Tone ID", "1"),
    ("PTT ID", OFF),
    ("RX Color Code", "1"),
    ("Slot", "1"),
    ("Scan List", NONE),
    ("Receive Group List", NONE),
    ("PTT Prohibit", OFF),
    ("Reverse", OFF),
    ("Digital Duplex", OFF),
    ("Slot Suit", OFF),
    ("AES Encryption Key", "Normal Encryption"),
    ("Digital Encryption", OFF),
    ("Call Confirmation", OFF),
    ("Talk Around(Simplex)", OFF),
    ("Work Alone", OFF),
    ("Custom CTCSS", "251.1"),
    ("2Tone Decode", "0"),
    ("Ranging", OFF),
    ("Idle TX", OFF),
    ("APRS RX", OFF),
    ("Analog APRS PTT Mode", OFF),
    ("Digital APRS PTT Mode", OFF),
    ("APRS Report Type", OFF),
    ("Digital APRS Report Channel", "1"),
    ("Correct Frequency[Hz]", "0"),
    ("SMS Confirmation", OFF),
    ("Exclude channel from roaming", "0"),
    ("DMR Mode", "0"),
    ("DataACK Disable", "0"),
    ("5Tone BOT ID", "0"),
    ("5Tone EOT ID", "0"),
    ("Auto Scan", "0"),
    ("Ana APRS Mute", "0"),
    ("Send Talker Alias", "0"),
    ("AnaAprsTxPath", "0"),
    ("ARC4", "0"),
    ("ex_emg_kind", "0"),
    ("Rpga_Mdc", "0"),
    ("DisturEn", "0"),
    ("DisturFreq", "0"),
    ("dmr_crc_ignore", "0"),
    ("compand", "0"),
    ("tx_talkalaes", "0"),
    ("dup_call", "0"),
    ("tx_int", "0"),
    ("BtRxState", "0"),
    ("idle_tx", "0"),
    ("nxdn_wn", "0"),
    ("NxdnRpga", "0"),
    ("nxdnSqCon", "0"),
    ("NxdnTxBusy", "0"),
    ("NxDnPttId", "0"),
    ("EnRan", "0"),
    ("DeRan", "0"),
    ("NxdnEncry", "0"),
    ("NxdnGroupId", "0"),
    ("NxdnIdNum", "0"),
    ("NxdnStateNum", "0"),
    ("txcc", "1"),
];

const TALKGROUP_COLUMNS: Layout = &[
    ("No.", ""),
    ("Radio ID", ""),
    ("Name", ""),
    ("Call Type", ""),
    ("Call Alert", NONE),
];

// The trailing space in "Zone Hide " is what the CPS exports.
const ZONE_COLUMNS: Layout = &[
    ("No.", ""),
    ("Zone Name", ""),
    ("Zone Channel Member", ""),
    ("Zone Channel Member RX Frequency", ""),
    ("Zone Channel Member TX Frequency", ""),
    ("A Channel", ""),
    ("A Channel RX Frequency", ""),
    ("A Channel TX Frequency", ""),
    ("B Channel", ""),
    ("B Channel RX Frequency", ""),
    ("B Channel TX Frequency", ""),
    ("Zone Hide ", "0"),
];

const SCANLIST_COLUMNS: Layout = &[
    ("No.", ""),
    ("Scan List Name", ""),
    ("Scan Channel Member", ""),
    ("Scan Channel Member RX Frequency", ""),
    ("Scan Channel Member TX Frequency", ""),
    ("Scan Mode", OFF),
    ("Priority Channel Select", "Priority Channel Select1"),
    ("Priority Channel 1", "Current Channel"),
    ("Priority Channel 1 RX Frequency", ""),
    ("Priority Channel 1 TX Frequency", ""),
    ("Priority Channel 2", OFF),
    ("Priority Channel 2 RX Frequency", ""),
    ("Priority Channel 2 TX Frequency", ""),
    ("Revert Channel", "Selected"),
    ("Look Back Time A[s]", "2.0"),
    ("Look Back Time B[s]", "3.0"),
    ("Dropout Delay Time[s]", "3.1"),
    ("Dwell Time[s]", "3.1"),
];

/// Value spellings the 890 CPS expects.
struct Spelling;

impl Spelling {
    fn power(power: Power) -> &'static str {
        match power {
            Power::Low => "Low",
            Power::Medium => "Mid",
            Power::High => "High",
            Power::Turbo => "Turbo",
        }
    }

    fn call_type(call_type: CallType) -> &'static str {
        match call_type {
            CallType::Group => "Group Call",
            CallType::Private => "Private Call",
        }
    }

    fn on_off(flag: bool) -> &'static str {
        if flag {
            ON
        } else {
            OFF
        }
    }

    fn flag(flag: bool) -> &'static str {
        if flag {
            "1"
        } else {
            "0"
        }
    }

    fn tone(tone: &Tone) -> &str {
        match tone {
            Tone::Off => OFF,
            Tone::Code(code) => code.as_str(),
        }
    }

    fn aprs_ptt_mode(mode: AprsPttMode) -> &'static str {
        match mode {
            AprsPttMode::Off => OFF,
            AprsPttMode::Start => "Start of Transmission",
            AprsPttMode::End => "End of Transmission",
            AprsPttMode::Both => "Start and End of Transmission",
        }
    }

    fn aprs_report_type(report: AprsReportType) -> &'static str {
        match report {
            AprsReportType::Off => OFF,
            AprsReportType::Analog => "Analog",
            AprsReportType::Digital => "Digital",
        }
    }

    fn tx_permit(permit: TxPermit) -> &'static str {
        match permit {
            TxPermit::Always => "Always",
            TxPermit::SameColorCode => "Same Color Code",
        }
    }
}

fn channel_row(table: &Table, number: usize, channel: &Channel) -> Row {
    let mut row = table.row();
    row.set("No.", number.to_string())
        .set("Channel Name", channel.name.as_str())
        .set("Receive Frequency", format_frequency(channel.rx_freq))
        .set("Transmit Frequency", format_frequency(channel.tx_freq))
        .set("Transmit Power", Spelling::power(channel.power))
        .set("Scan List", channel.zone.as_str());

    match &channel.mode {
        ChannelMode::Analog(analog) => set_analog(&mut row, analog),
        ChannelMode::Digital(digital) => set_digital(&mut row, channel.is_repeater(), digital),
    }
    row
}

fn set_analog(row: &mut Row, analog: &AnalogSettings) {
    let aprs = &analog.aprs;
    row.set("Channel Type", "A-Analog")
        .set("Bandwidth", format!("{}K", analog.bandwidth.khz()))
        .set("CTCSS/DCS Decode", Spelling::tone(&analog.ctcss_decode))
        .set("CTCSS/DCS Encode", Spelling::tone(&analog.ctcss_encode))
        .set(
            "Squelch Mode",
            if analog.ctcss_decode.is_off() {
                "Carrier"
            } else {
                "CTCSS/DCS"
            },
        )
        .set("Busy Lock/TX Permit", OFF)
        .set("PTT Prohibit", Spelling::on_off(analog.tx_prohibit))
        .set("APRS RX", Spelling::on_off(aprs.rx_enabled))
        .set("Analog APRS PTT Mode", Spelling::aprs_ptt_mode(aprs.ptt_mode))
        .set("APRS Report Type", Spelling::aprs_report_type(aprs.report_type))
        .set("Digital APRS Report Channel", aprs.report_channel.to_string())
        .set("Ana APRS Mute", Spelling::flag(aprs.mute))
        .set("AnaAprsTxPath", aprs.tx_path.to_string());
}

fn set_digital(row: &mut Row, repeater: bool, digital: &DigitalSettings) {
    let color_code = digital.color_code.to_string();
    row.set("Channel Type", "D-Digital")
        .set("Bandwidth", "12.5K")
        .set("Contact/TG", digital.contact.name.as_str())
        .set(
            "Contact/TG Call Type",
            Spelling::call_type(digital.contact.call_type),
        )
        .set("Contact/TG TG/DMR ID", digital.contact.dmr_id.to_string())
        .set("Busy Lock/TX Permit", Spelling::tx_permit(digital.tx_permit))
        .set("RX Color Code", color_code.as_str())
        .set("txcc", color_code)
        .set("Slot", digital.timeslot.number().to_string())
        .set("Digital Duplex", Spelling::on_off(!repeater))
        .set("DMR Mode", Spelling::flag(repeater));
}

fn zone_row(table: &Table, number: usize, zone: &Zone) -> Row {
    let members = Members::of(&zone.channels);
    let mut row = table.row();
    row.set("No.", number.to_string())
        .set("Zone Name", zone.name.as_str())
        .set("Zone Channel Member", members.names)
        .set("Zone Channel Member RX Frequency", members.rx)
        .set("Zone Channel Member TX Frequency", members.tx);
    if let Some(first) = zone.channels.first() {
        for side in ["A", "B"] {
            row.set(&format!("{} Channel", side), first.name.as_str())
                .set(
                    &format!("{} Channel RX Frequency", side),
                    format_frequency(first.rx_freq),
                )
                .set(
                    &format!("{} Channel TX Frequency", side),
                    format_frequency(first.tx_freq),
                );
        }
    }
    row
}

fn scan_list_row(table: &Table, number: usize, scan_list: &ScanList) -> Row {
    if scan_list.channels.len() > SCANLIST_MAX {
        tracing::warn!(
            "scan list '{}' has {} channels, keeping the first {}",
            scan_list.name,
            scan_list.channels.len(),
            SCANLIST_MAX
        );
    }
    let members = Members::of(scan_list.channels.iter().take(SCANLIST_MAX));
    let mut row = table.row();
    row.set("No.", number.to_string())
        .set("Scan List Name", scan_list.name.as_str())
        .set("Scan Channel Member", members.names)
        .set("Scan Channel Member RX Frequency", members.rx)
        .set("Scan Channel Member TX Frequency", members.tx);
    row
}

fn contact_row(table: &Table, number: usize, contact: &Contact) -> Row {
    let mut row = table.row();
    row.set("No.", number.to_string())
        .set("Radio ID", contact.dmr_id.to_string())
        .set("Name", contact.name.as_str())
        .set("Call Type", Spelling::call_type(contact.call_type));
    row
}

/// Writes one file, numbering rows from 1.
fn write_file<'a, T: 'a>(
    name: &str,
    layout: Layout,
    items: impl IntoIterator<Item = &'a T>,
    to_row: fn(&Table, usize, &T) -> Row,
) -> Result<OutputFile> {
    let mut table = Table::new(layout)?;
    for (index, item) in items.into_iter().enumerate() {
        let row = to_row(&table, index + 1, item);
        table.push(&row)?;
    }
    table.finish(name)
}

pub fn serialize(codeplug: &Codeplug) -> Result<Vec<OutputFile>> {
    Ok(vec![
        write_file(CHANNEL_FILE, CHANNEL_COLUMNS, codeplug.channels(), channel_row)?,
        write_file(TALKGROUPS_FILE, TALKGROUP_COLUMNS, &codeplug.contacts, contact_row)?,
        write_file(ZONE_FILE, ZONE_COLUMNS, &codeplug.zones, zone_row)?,
        write_file(SCANLIST_FILE, SCANLIST_COLUMNS, &codeplug.scan_lists, scan_list_row)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::orderer::{order, SortMode};
    use crate::domain::model::{AprsConfig, Bandwidth, Origin, SourceKind, Timeslot};

    fn records(file: &OutputFile) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(file.data.as_slice());
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    fn cell(file: &OutputFile, row: usize, column: &str) -> String {
        let all = records(file);
        let index = all[0].iter().position(|h| h == column).unwrap();
        all[row][index].clone()
    }

    fn simplex_dmr() -> Channel {
        Channel {
            name: "DMR Simplex".to_string(),
            power: Power::Low,
            rx_freq: 441.0,
            tx_freq: 441.0,
            zone: "Hotspot".to_string(),
            source: SourceKind::DigitalOthers,
            origin: Origin::new("Digital-Others__t.csv", 2),
            mode: ChannelMode::Digital(DigitalSettings {
                color_code: 7,
                contact: Contact {
                    name: "Parrot".to_string(),
                    dmr_id: 9990,
                    call_type: CallType::Private,
                },
                timeslot: Timeslot::Two,
                tx_permit: TxPermit::Always,
            }),
        }
    }

    fn aprs_channel() -> Channel {
        Channel {
            name: "APRS".to_string(),
            power: Power::High,
            rx_freq: 144.39,
            tx_freq: 144.39,
            zone: "APRS".to_string(),
            source: SourceKind::Analog,
            origin: Origin::new("Analog__t.csv", 2),
            mode: ChannelMode::Analog(AnalogSettings {
                bandwidth: Bandwidth::Narrow,
                ctcss_decode: Tone::Off,
                ctcss_encode: Tone::Off,
                tx_prohibit: true,
                aprs: AprsConfig {
                    rx_enabled: true,
                    ptt_mode: AprsPttMode::End,
                    report_type: AprsReportType::Analog,
                    report_channel: 1,
                    mute: true,
                    tx_path: 2,
                },
            }),
        }
    }

    fn sample() -> Codeplug {
        let zones = vec![
            Zone {
                name: "Hotspot".to_string(),
                code: None,
                channels: vec![simplex_dmr()],
                source_order: 1,
                first_source: SourceKind::DigitalOthers,
            },
            Zone {
                name: "APRS".to_string(),
                code: None,
                channels: vec![aprs_channel()],
                source_order: 0,
                first_source: SourceKind::Analog,
            },
        ];
        order(
            Codeplug {
                contacts: vec![Contact {
                    name: "Parrot".to_string(),
                    dmr_id: 9990,
                    call_type: CallType::Private,
                }],
                zones,
                scan_lists: Vec::new(),
            },
            SortMode::Alpha,
        )
    }

    #[test]
    fn test_channel_header_uses_890_names() {
        let files = serialize(&sample()).unwrap();
        let header = &records(&files[0])[0];
        assert_eq!(header.len(), CHANNEL_COLUMNS.len());
        for column in ["Bandwidth", "RX Color Code", "Contact/TG", "Digital Duplex", "txcc"] {
            assert!(header.iter().any(|h| h == column), "missing {}", column);
        }
        assert!(!header.iter().any(|h| h == "Band Width"));
        assert!(!header.iter().any(|h| h == "Through Mode"));
    }

    #[test]
    fn test_analog_aprs_fields() {
        let files = serialize(&sample()).unwrap();
        let channel = &files[0];
        assert_eq!(cell(channel, 1, "Channel Name"), "APRS");
        assert_eq!(cell(channel, 1, "Bandwidth"), "12.5K");
        assert_eq!(cell(channel, 1, "APRS RX"), "On");
        assert_eq!(cell(channel, 1, "Analog APRS PTT Mode"), "End of Transmission");
        assert_eq!(cell(channel, 1, "APRS Report Type"), "Analog");
        assert_eq!(cell(channel, 1, "Ana APRS Mute"), "1");
        assert_eq!(cell(channel, 1, "AnaAprsTxPath"), "2");
        assert_eq!(cell(channel, 1, "PTT Prohibit"), "On");
        assert_eq!(cell(channel, 1, "Busy Lock/TX Permit"), "Off");
    }

    #[test]
    fn test_simplex_digital_fields() {
        let files = serialize(&sample()).unwrap();
        let channel = &files[0];
        assert_eq!(cell(channel, 2, "Channel Type"), "D-Digital");
        assert_eq!(cell(channel, 2, "Bandwidth"), "12.5K");
        assert_eq!(cell(channel, 2, "Contact/TG"), "Parrot");
        assert_eq!(cell(channel, 2, "Contact/TG Call Type"), "Private Call");
        assert_eq!(cell(channel, 2, "Contact/TG TG/DMR ID"), "9990");
        assert_eq!(cell(channel, 2, "RX Color Code"), "7");
        assert_eq!(cell(channel, 2, "txcc"), "7");
        assert_eq!(cell(channel, 2, "Slot"), "2");
        assert_eq!(cell(channel, 2, "Digital Duplex"), "On");
        assert_eq!(cell(channel, 2, "DMR Mode"), "0");
        assert_eq!(cell(channel, 2, "Transmit Power"), "Low");
    }

    #[test]
    fn test_zone_hide_column() {
        let files = serialize(&sample()).unwrap();
        let zone = &files[2];
        assert_eq!(records(zone)[0].last().unwrap(), "Zone Hide ");
        assert_eq!(cell(zone, 1, "Zone Hide "), "0");
        assert_eq!(cell(zone, 2, "B Channel"), "DMR Simplex");
        assert_eq!(cell(zone, 2, "B Channel RX Frequency"), "441.00000");
    }

    #[test]
    fn test_talkgroups_private_call() {
        let files = serialize(&sample()).unwrap();
        assert_eq!(files[1].name, "TalkGroups.CSV");
        assert_eq!(cell(&files[1], 1, "Call Type"), "Private Call");
        assert_eq!(cell(&files[1], 1, "Call Alert"), "None");
    }

    #[test]
    fn test_empty_codeplug_writes_headers_only() {
        let files = serialize(&Codeplug::default()).unwrap();
        assert_eq!(files.len(), 4);
        for file in &files {
            assert_eq!(records(file).len(), 1, "{}", file.name);
        }
    }
}
