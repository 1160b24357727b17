use crate::domain::model::{AprsConfig, Bandwidth, Origin, Power, Tone, ZoneKey};
use crate::input::{
    parse_aprs_ptt_mode, parse_aprs_report_type, parse_bandwidth, parse_on_off,
    parse_small_number, parse_tone, read_with_header, Fields, Header,
};
use crate::utils::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalogRow {
    pub origin: Origin,
    pub zone: ZoneKey,
    pub name: String,
    pub power: Power,
    pub rx_freq: f64,
    pub tx_freq: f64,
    pub bandwidth: Bandwidth,
    pub ctcss_decode: Tone,
    pub ctcss_encode: Tone,
    pub tx_prohibit: bool,
    pub aprs: AprsConfig,
}

struct Columns {
    zone: usize,
    name: usize,
    power: usize,
    rx_freq: usize,
    tx_freq: usize,
    bandwidth: Option<usize>,
    ctcss_decode: Option<usize>,
    ctcss_encode: Option<usize>,
    tx_prohibit: Option<usize>,
    aprs_rx: Option<usize>,
    aprs_ptt_mode: Option<usize>,
    aprs_report_type: Option<usize>,
    aprs_report_channel: Option<usize>,
    aprs_mute: Option<usize>,
    aprs_tx_path: Option<usize>,
}

impl Columns {
    fn locate(header: &Header) -> Result<Self, ParseError> {
        Ok(Self {
            zone: header.require(&["Zone", "Zone Name"])?,
            name: header.require(&["Channel Name"])?,
            power: header.require(&["Power"])?,
            rx_freq: header.require(&["RX Freq"])?,
            tx_freq: header.require(&["TX Freq"])?,
            bandwidth: header.optional(&["Bandwidth"]),
            ctcss_decode: header.optional(&["CTCSS Decode"]),
            ctcss_encode: header.optional(&["CTCSS Encode"]),
            tx_prohibit: header.optional(&["TX Prohibit"]),
            aprs_rx: header.optional(&["APRS RX"]),
            aprs_ptt_mode: header.optional(&["APRS PTT Mode"]),
            aprs_report_type: header.optional(&["APRS Report Type"]),
            aprs_report_channel: header.optional(&["APRS Report Channel"]),
            aprs_mute: header.optional(&["APRS Mute"]),
            aprs_tx_path: header.optional(&["APRS TX Path"]),
        })
    }

    fn parse(&self, fields: &Fields<'_>) -> Result<AnalogRow, ParseError> {
        let aprs = AprsConfig {
            rx_enabled: fields.with(self.aprs_rx, parse_on_off)?,
            ptt_mode: fields.with(self.aprs_ptt_mode, parse_aprs_ptt_mode)?,
            report_type: fields.with(self.aprs_report_type, parse_aprs_report_type)?,
            report_channel: fields.with(self.aprs_report_channel, |raw| {
                parse_small_number(raw, 1, "APRS Report Channel")
            })?,
            mute: fields.with(self.aprs_mute, parse_on_off)?,
            tx_path: fields.with(self.aprs_tx_path, |raw| {
                parse_small_number(raw, 0, "APRS TX Path")
            })?,
        };

        Ok(AnalogRow {
            origin: fields.origin().clone(),
            zone: ZoneKey::parse(&fields.text(self.zone, "Zone")?),
            name: fields.text(self.name, "Channel Name")?,
            power: fields.power(self.power)?,
            rx_freq: fields.frequency(self.rx_freq, "RX Freq")?,
            tx_freq: fields.frequency(self.tx_freq, "TX Freq")?,
            bandwidth: fields.with(self.bandwidth, parse_bandwidth)?,
            ctcss_decode: fields.with(self.ctcss_decode, parse_tone)?,
            ctcss_encode: fields.with(self.ctcss_encode, parse_tone)?,
            tx_prohibit: fields.with(self.tx_prohibit, parse_on_off)?,
            aprs,
        })
    }
}

/// Reads an `Analog__*.csv` file.
///
/// Columns are matched by name. `Zone`, `Channel Name`, `Power`, `RX Freq`
/// and `TX Freq` are required; bandwidth, tones, TX prohibit and the APRS
/// columns fall back to their defaults (25 kHz, Off, Off, all-Off APRS).
pub fn read_analog<'a>(
    file: &'a str,
    contents: &'a str,
) -> Result<impl Iterator<Item = Result<AnalogRow, ParseError>> + 'a, ParseError> {
    read_with_header(file, contents, Columns::locate, Columns::parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AprsPttMode, AprsReportType};

    const HEADER: &str =
        "Zone,Channel Name,Bandwidth,Power,RX Freq,TX Freq,CTCSS Decode,CTCSS Encode,TX Prohibit";

    fn read_all(contents: &str) -> Vec<Result<AnalogRow, ParseError>> {
        read_analog("Analog__test.csv", contents).unwrap().collect()
    }

    #[test]
    fn test_reads_basic_row() {
        let contents = format!(
            "{}\nSimplex;SPX,2M Call,25K,High,146.520,146.520,Off,Off,Off\n",
            HEADER
        );
        let rows = read_all(&contents);
        assert_eq!(rows.len(), 1);
        let row = rows[0].as_ref().unwrap();
        assert_eq!(row.zone.name, "Simplex");
        assert_eq!(row.zone.code.as_deref(), Some("SPX"));
        assert_eq!(row.name, "2M Call");
        assert_eq!(row.power, Power::High);
        assert_eq!(row.rx_freq, 146.52);
        assert_eq!(row.bandwidth, Bandwidth::Wide);
        assert_eq!(row.ctcss_decode, Tone::Off);
        assert!(!row.tx_prohibit);
        assert_eq!(row.origin.row, 2);
    }

    #[test]
    fn test_aprs_defaults_to_off_when_columns_absent() {
        let contents = "Zone,Channel Name,Power,RX Freq,TX Freq,APRS RX\n\
                        APRS,APRS 2M,High,144.390,144.390,Off\n";
        let rows = read_all(contents);
        let row = rows[0].as_ref().unwrap();
        assert!(row.aprs.is_off());
        assert_eq!(row.aprs, AprsConfig::default());
    }

    #[test]
    fn test_aprs_columns_are_parsed() {
        let contents = concat!(
            "Zone,Channel Name,Power,RX Freq,TX Freq,APRS RX,APRS PTT Mode,APRS Report Type\n",
            "APRS,APRS 2M,Low,144.390,144.390,On,End,Analog\n",
        );
        let rows = read_all(contents);
        let row = rows[0].as_ref().unwrap();
        assert!(row.aprs.rx_enabled);
        assert_eq!(row.aprs.ptt_mode, AprsPttMode::End);
        assert_eq!(row.aprs.report_type, AprsReportType::Analog);
    }

    #[test]
    fn test_header_match_is_case_insensitive() {
        let contents = "zone,CHANNEL NAME,power,rx freq,tx freq\nHome,Local,Low,446.000,446.000\n";
        let rows = read_all(contents);
        assert!(rows[0].is_ok());
    }

    #[test]
    fn test_missing_required_column_is_structural() {
        let contents = "Zone,Channel Name,Power,RX Freq\nHome,Local,Low,446.000\n";
        assert!(read_analog("Analog__bad.csv", contents).is_err());
    }

    #[test]
    fn test_bad_rows_do_not_hide_good_ones() {
        let contents = format!(
            "{}\nHome,Bad Freq,25K,High,abc,146.520,Off,Off,Off\n\
             Home,Short,25K,High\n\
             Home,Bad Power,25K,Max,146.520,146.520,Off,Off,Off\n\
             Home,Good,12.5K,Low,146.520,146.520,100.0,100.0,On\n",
            HEADER
        );
        let rows = read_all(&contents);
        assert_eq!(rows.len(), 4);
        let err = rows[0].as_ref().unwrap_err();
        assert_eq!(err.row, 2);
        assert!(err.reason.contains("RX Freq"));
        assert!(rows[1].as_ref().unwrap_err().reason.contains("columns"));
        assert!(rows[2].as_ref().unwrap_err().reason.contains("Power"));

        let good = rows[3].as_ref().unwrap();
        assert_eq!(good.bandwidth, Bandwidth::Narrow);
        assert_eq!(good.ctcss_encode, Tone::Code("100.0".to_string()));
        assert!(good.tx_prohibit);
    }

    #[test]
    fn test_error_row_counts_blank_lines() {
        let contents = format!(
            "{}\n\nHome,Bad Freq,25K,High,abc,146.520,Off,Off,Off\n\n\n\
             Home,Good,25K,High,146.520,146.520,Off,Off,Off\n",
            HEADER
        );
        let rows = read_all(&contents);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_ref().unwrap_err().row, 3);
        assert_eq!(rows[1].as_ref().unwrap().origin.row, 6);
    }

    #[test]
    fn test_empty_file_yields_nothing() {
        assert_eq!(read_all("").len(), 0);
    }
}
