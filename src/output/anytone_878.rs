//! Anytone AT-D878UVII, CPS 1.21 import layout.

use crate::core::validator::FrequencyBand;
use crate::domain::model::{
    AnalogSettings, AprsPttMode, AprsReportType, CallType, Channel, ChannelMode, Codeplug,
    Contact, DigitalSettings, OutputFile, Power, ScanList, Tone, TxPermit, Zone,
};
use crate::output::table::{Layout, Members, Row, Table};
use crate::output::{format_frequency, CHANNEL_FILE, SCANLIST_FILE, TALKGROUPS_FILE, ZONE_FILE};
use crate::utils::error::Result;

pub const RADIO_NAME: &str = "Anytone AT-D878UVII (CPS 1.21)";
pub const BANDS: &[FrequencyBand] = &[FrequencyBand::VHF, FrequencyBand::UHF];

/// Scan lists hold at most this many members.
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
    ("Band Width", "25K"),
    ("CTCSS/DCS Decode", OFF),
    ("CTCSS/DCS Encode", OFF),
    ("Contact", ""),
    ("Contact Call Type", "Group Call"),
    ("Contact TG/DMR ID", "0"),
    ("Radio ID", ""),
    ("Busy Lock/TX Permit", "Always"),
    ("Squelch Mode", "Carrier"),
    ("Optional Signal", OFF),
    ("DTMF ID", "1"),
    ("2Tone ID", "1"),
    ("5Tone ID", "1"),
    ("PTT ID", OFF),
    ("Color Code", "1"),
    ("Slot", "1"),
    ("Scan List", NONE),
    ("Receive Group List", NONE),
    ("PTT Prohibit", OFF),
    ("Reverse", OFF),
    ("Simplex TDMA", OFF),
    ("Slot Suit", OFF),
    ("AES Digital Encryption", "Normal Encryption"),
    ("Digital Encryption", OFF),
    ("Call Confirmation", OFF),
    ("Talk Around(Simplex)", OFF),
    ("Work Alone", OFF),
    ("Custom CTCSS", "251.1"),
    ("2TONE Decode", "0"),
    ("Ranging", OFF),
    ("Through Mode", OFF),
    ("Digi APRS RX", OFF),
    ("Analog APRS PTT Mode", OFF),
    ("Digital APRS PTT Mode", OFF),
    ("APRS Report Type", OFF),
    ("Digital APRS Report Channel", "1"),
    ("Correct Frequency[Hz]", "0"),
    ("SMS Confirmation", OFF),
    ("Exclude Channel From Roaming", "0"),
    ("DMR MODE", "0"),
    ("DataACK Disable", "0"),
    ("R5toneBot", "0"),
    ("R5ToneEot", "0"),
];

const TALKGROUP_COLUMNS: Layout = &[
    ("No.", ""),
    ("Radio ID", ""),
    ("Name", ""),
    ("Call Type", ""),
    ("Call Alert", NONE),
];

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

fn channel_csv(codeplug: &Codeplug) -> Result<OutputFile> {
    let mut table = Table::new(CHANNEL_COLUMNS)?;
    for (index, channel) in codeplug.channels().enumerate() {
        let mut row = table.row();
        row.set("No.", (index + 1).to_string())
            .set("Channel Name", channel.name.as_str())
            .set("Receive Frequency", format_frequency(channel.rx_freq))
            .set("Transmit Frequency", format_frequency(channel.tx_freq))
            .set("Transmit Power", power(channel.power))
            .set("Scan List", channel.zone.as_str());

        match &channel.mode {
            ChannelMode::Analog(analog) => analog_fields(&mut row, analog),
            ChannelMode::Digital(digital) => digital_fields(&mut row, channel, digital),
        }
        table.push(&row)?;
    }
    table.finish(CHANNEL_FILE)
}

fn analog_fields(row: &mut Row, analog: &AnalogSettings) {
    let squelch = if analog.ctcss_decode.is_off() {
        "Carrier"
    } else {
        "CTCSS/DCS"
    };
    row.set("Channel Type", "A-Analog")
        .set("Band Width", format!("{}K", analog.bandwidth.khz()))
        .set("CTCSS/DCS Decode", tone(&analog.ctcss_decode))
        .set("CTCSS/DCS Encode", tone(&analog.ctcss_encode))
        .set("Squelch Mode", squelch)
        .set("Busy Lock/TX Permit", OFF)
        .set("PTT Prohibit", on_off(analog.tx_prohibit))
        .set("Digi APRS RX", on_off(analog.aprs.rx_enabled))
        .set("Analog APRS PTT Mode", aprs_ptt_mode(analog.aprs.ptt_mode))
        .set("APRS Report Type", aprs_report_type(analog.aprs.report_type))
        .set(
            "Digital APRS Report Channel",
            analog.aprs.report_channel.to_string(),
        );
}

fn digital_fields(row: &mut Row, channel: &Channel, digital: &DigitalSettings) {
    let repeater = channel.is_repeater();
    row.set("Channel Type", "D-Digital")
        .set("Band Width", "12.5K")
        .set("Contact", digital.contact.name.as_str())
        .set("Contact Call Type", call_type(digital.contact.call_type))
        .set("Contact TG/DMR ID", digital.contact.dmr_id.to_string())
        .set("Busy Lock/TX Permit", tx_permit(digital.tx_permit))
        .set("Color Code", digital.color_code.to_string())
        .set("Slot", digital.timeslot.number().to_string())
        .set("Simplex TDMA", on_off(!repeater))
        .set("Through Mode", on_off(!repeater))
        .set("DMR MODE", if repeater { "1" } else { "0" });
}

fn talkgroups_csv(contacts: &[Contact]) -> Result<OutputFile> {
    let mut table = Table::new(TALKGROUP_COLUMNS)?;
    for (index, contact) in contacts.iter().enumerate() {
        let mut row = table.row();
        row.set("No.", (index + 1).to_string())
            .set("Radio ID", contact.dmr_id.to_string())
            .set("Name", contact.name.as_str())
            .set("Call Type", call_type(contact.call_type));
        table.push(&row)?;
    }
    table.finish(TALKGROUPS_FILE)
}

fn zone_csv(zones: &[Zone]) -> Result<OutputFile> {
    let mut table = Table::new(ZONE_COLUMNS)?;
    for (index, zone) in zones.iter().enumerate() {
        let members = Members::of(&zone.channels);
        let mut row = table.row();
        row.set("No.", (index + 1).to_string())
            .set("Zone Name", zone.name.as_str())
            .set("Zone Channel Member", members.names)
            .set("Zone Channel Member RX Frequency", members.rx)
            .set("Zone Channel Member TX Frequency", members.tx);
        if let Some(first) = zone.channels.first() {
            let rx = format_frequency(first.rx_freq);
            let tx = format_frequency(first.tx_freq);
            row.set("A Channel", first.name.as_str())
                .set("A Channel RX Frequency", rx.as_str())
                .set("A Channel TX Frequency", tx.as_str())
                .set("B Channel", first.name.as_str())
                .set("B Channel RX Frequency", rx)
                .set("B Channel TX Frequency", tx);
        }
        table.push(&row)?;
    }
    table.finish(ZONE_FILE)
}

fn scanlist_csv(scan_lists: &[ScanList]) -> Result<OutputFile> {
    let mut table = Table::new(SCANLIST_COLUMNS)?;
    for (index, scan_list) in scan_lists.iter().enumerate() {
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
        row.set("No.", (index + 1).to_string())
            .set("Scan List Name", scan_list.name.as_str())
            .set("Scan Channel Member", members.names)
            .set("Scan Channel Member RX Frequency", members.rx)
            .set("Scan Channel Member TX Frequency", members.tx);
        table.push(&row)?;
    }
    table.finish(SCANLIST_FILE)
}

pub fn serialize(codeplug: &Codeplug) -> Result<Vec<OutputFile>> {
    Ok(vec![
        channel_csv(codeplug)?,
        talkgroups_csv(&codeplug.contacts)?,
        zone_csv(&codeplug.zones)?,
        scanlist_csv(&codeplug.scan_lists)?,
    ])
}
