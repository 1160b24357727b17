use crate::domain::model::{Origin, Power, Timeslot, TxPermit, ZoneKey};
use crate::input::{parse_timeslot, parse_tx_permit, read_with_header, Fields, Header};
use crate::utils::error::ParseError;

/// A single DMR channel with one talkgroup, typically simplex or hotspot.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitalOthersRow {
    pub origin: Origin,
    pub zone: ZoneKey,
    pub name: String,
    pub power: Power,
    pub rx_freq: f64,
    pub tx_freq: f64,
    pub color_code: u8,
    pub talkgroup: String,
    pub timeslot: Timeslot,
    pub tx_permit: Option<TxPermit>,
}

struct Columns {
    zone: usize,
    name: usize,
    power: usize,
    rx_freq: usize,
    tx_freq: usize,
    color_code: usize,
    talkgroup: usize,
    timeslot: Option<usize>,
    tx_permit: Option<usize>,
}

impl Columns {
    fn locate(header: &Header) -> Result<Self, ParseError> {
        if let Some(call_type) = header.optional(&["Call Type"]) {
            tracing::debug!(
                "ignoring column {} (call type comes from the talkgroup)",
                call_type + 1
            );
        }
        Ok(Self {
            zone: header.require(&["Zone", "Zone Name"])?,
            name: header.require(&["Channel Name"])?,
            power: header.require(&["Power"])?,
            rx_freq: header.require(&["RX Freq"])?,
            tx_freq: header.require(&["TX Freq"])?,
            color_code: header.require(&["Color Code"])?,
            talkgroup: header.require(&["Talk Group", "Talkgroup"])?,
            timeslot: header.optional(&["TimeSlot", "Time Slot"]),
            tx_permit: header.optional(&["TX Permit"]),
        })
    }

    fn parse(&self, fields: &Fields<'_>) -> Result<DigitalOthersRow, ParseError> {
        Ok(DigitalOthersRow {
            origin: fields.origin().clone(),
            zone: ZoneKey::parse(&fields.text(self.zone, "Zone")?),
            name: fields.text(self.name, "Channel Name")?,
            power: fields.power(self.power)?,
            rx_freq: fields.frequency(self.rx_freq, "RX Freq")?,
            tx_freq: fields.frequency(self.tx_freq, "TX Freq")?,
            color_code: fields.color_code(self.color_code)?,
            talkgroup: fields.text(self.talkgroup, "Talk Group")?,
            timeslot: fields.with(self.timeslot, parse_timeslot)?,
            tx_permit: fields.with(self.tx_permit, parse_tx_permit)?,
        })
    }
}

/// Reads a `Digital-Others__*.csv` file. The talkgroup is kept by name;
/// resolving it against the contacts happens when the model is built.
pub fn read_digital_others<'a>(
    file: &'a str,
    contents: &'a str,
) -> Result<impl Iterator<Item = Result<DigitalOthersRow, ParseError>> + 'a, ParseError> {
    read_with_header(file, contents, Columns::locate, Columns::parse)
}
