use crate::domain::model::{Origin, Power, Timeslot, ZoneKey};
use crate::input::{read_with_header, Fields, Header};
use crate::utils::error::ParseError;

/// One repeater and the talkgroups it carries.
///
/// `talkgroups` holds only the matrix cells that are not `-`, in header
/// column order.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeaterRow {
    pub origin: Origin,
    pub zone: ZoneKey,
    pub comment: String,
    pub power: Power,
    pub rx_freq: f64,
    pub tx_freq: f64,
    pub color_code: u8,
    pub talkgroups: Vec<(String, Timeslot)>,
}

struct Columns {
    zone: usize,
    comment: Option<usize>,
    power: usize,
    rx_freq: usize,
    tx_freq: usize,
    color_code: usize,
    talkgroups: Vec<(usize, String)>,
}

impl Columns {
    fn locate(header: &Header) -> Result<Self, ParseError> {
        let zone = header.require(&["Zone Name", "Zone"])?;
        let comment = header.optional(&["Comment"]);
        let power = header.require(&["Power"])?;
        let rx_freq = header.require(&["RX Freq"])?;
        let tx_freq = header.require(&["TX Freq"])?;
        let color_code = header.require(&["Color Code"])?;

        let fixed = [
            Some(zone),
            comment,
            Some(power),
            Some(rx_freq),
            Some(tx_freq),
            Some(color_code),
        ];
        let talkgroups = header
            .columns()
            .iter()
            .enumerate()
            .filter(|(i, _)| !fixed.contains(&Some(*i)))
            .map(|(i, name)| (i, name.clone()))
            .collect::<Vec<_>>();
        tracing::debug!(
            "{} columns, {} talkgroup columns",
            header.len(),
            talkgroups.len()
        );

        Ok(Self {
            zone,
            comment,
            power,
            rx_freq,
            tx_freq,
            color_code,
            talkgroups,
        })
    }

    fn parse(&self, fields: &Fields<'_>) -> Result<RepeaterRow, ParseError> {
        let mut talkgroups = Vec::new();
        for (index, name) in &self.talkgroups {
            let cell = fields.get(*index);
            let timeslot = match cell {
                "" | "-" => continue,
                "1" => Timeslot::One,
                "2" => Timeslot::Two,
                other => {
                    return Err(fields.error(format!(
                        "talkgroup '{}' must be '-', 1 or 2, found '{}'",
                        name, other
                    )))
                }
            };
            talkgroups.push((name.clone(), timeslot));
        }

        Ok(RepeaterRow {
            origin: fields.origin().clone(),
            zone: ZoneKey::parse(&fields.text(self.zone, "Zone Name")?),
            comment: fields.get_opt(self.comment).to_string(),
            power: fields.power(self.power)?,
            rx_freq: fields.frequency(self.rx_freq, "RX Freq")?,
            tx_freq: fields.frequency(self.tx_freq, "TX Freq")?,
            color_code: fields.color_code(self.color_code)?,
            talkgroups,
        })
    }
}

/// Reads a `Digital-Repeaters__*.csv` file. Every column other than
/// `Zone Name`, `Comment`, `Power`, `RX Freq`, `TX Freq` and `Color Code` is a
/// talkgroup column whose cells are `-` or a timeslot.
pub fn read_digital_repeaters<'a>(
    file: &'a str,
    contents: &'a str,
) -> Result<impl Iterator<Item = Result<RepeaterRow, ParseError>> + 'a, ParseError> {
    read_with_header(file, contents, Columns::locate, Columns::parse)
}
