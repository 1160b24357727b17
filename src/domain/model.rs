use serde::Serialize;
use std::fmt;

/// The four K7ABD file dialects, in the order a conversion reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SourceKind {
    Talkgroups,
    Analog,
    DigitalOthers,
    DigitalRepeaters,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Talkgroups,
        SourceKind::Analog,
        SourceKind::DigitalOthers,
        SourceKind::DigitalRepeaters,
    ];

    pub fn file_prefix(self) -> &'static str {
        match self {
            SourceKind::Talkgroups => "Talkgroups__",
            SourceKind::Analog => "Analog__",
            SourceKind::DigitalOthers => "Digital-Others__",
            SourceKind::DigitalRepeaters => "Digital-Repeaters__",
        }
    }

    /// Classifies a file name such as `Analog__Seattle.csv`.
    pub fn from_file_name(file_name: &str) -> Option<SourceKind> {
        let lower = file_name.to_ascii_lowercase();
        if !lower.ends_with(".csv") {
            return None;
        }
        SourceKind::ALL
            .into_iter()
            .find(|kind| lower.starts_with(&kind.file_prefix().to_ascii_lowercase()))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Talkgroups => "Talkgroups",
            SourceKind::Analog => "Analog",
            SourceKind::DigitalOthers => "Digital-Others",
            SourceKind::DigitalRepeaters => "Digital-Repeaters",
        };
        f.write_str(name)
    }
}

/// Where a record came from, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    pub file: String,
    pub row: u64,
}

impl Origin {
    pub fn new(file: impl Into<String>, row: u64) -> Self {
        Self {
            file: file.into(),
            row,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CallType {
    Group,
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub name: String,
    pub dmr_id: u32,
    pub call_type: CallType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Power {
    Low,
    Medium,
    High,
    Turbo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Bandwidth {
    #[serde(rename = "12.5")]
    Narrow,
    #[serde(rename = "20")]
    Medium,
    #[serde(rename = "25")]
    Wide,
}

impl Bandwidth {
    pub fn khz(self) -> &'static str {
        match self {
            Bandwidth::Narrow => "12.5",
            Bandwidth::Medium => "20",
            Bandwidth::Wide => "25",
        }
    }
}

/// A CTCSS tone or DCS code, kept in the spelling the CPS expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Tone {
    Off,
    Code(String),
}

impl Tone {
    pub fn is_off(&self) -> bool {
        matches!(self, Tone::Off)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AprsPttMode {
    #[default]
    Off,
    Start,
    End,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AprsReportType {
    #[default]
    Off,
    Analog,
    Digital,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AprsConfig {
    pub rx_enabled: bool,
    pub ptt_mode: AprsPttMode,
    pub report_type: AprsReportType,
    /// Digital APRS report channel slot, 1-based.
    pub report_channel: u8,
    pub mute: bool,
    pub tx_path: u8,
}

impl Default for AprsConfig {
    fn default() -> Self {
        Self {
            rx_enabled: false,
            ptt_mode: AprsPttMode::Off,
            report_type: AprsReportType::Off,
            report_channel: 1,
            mute: false,
            tx_path: 0,
        }
    }
}

impl AprsConfig {
    pub fn is_off(&self) -> bool {
        !self.rx_enabled
            && self.ptt_mode == AprsPttMode::Off
            && self.report_type == AprsReportType::Off
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Timeslot {
    One,
    Two,
}

impl Timeslot {
    pub fn number(self) -> u8 {
        match self {
            Timeslot::One => 1,
            Timeslot::Two => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TxPermit {
    Always,
    SameColorCode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalogSettings {
    pub bandwidth: Bandwidth,
    pub ctcss_decode: Tone,
    pub ctcss_encode: Tone,
    pub tx_prohibit: bool,
    pub aprs: AprsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigitalSettings {
    pub color_code: u8,
    pub contact: Contact,
    pub timeslot: Timeslot,
    pub tx_permit: TxPermit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChannelMode {
    Analog(AnalogSettings),
    Digital(DigitalSettings),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    pub name: String,
    pub power: Power,
    /// MHz
    pub rx_freq: f64,
    /// MHz
    pub tx_freq: f64,
    pub zone: String,
    pub source: SourceKind,
    pub origin: Origin,
    pub mode: ChannelMode,
}

impl Channel {
    /// Repeater channels transmit on a different frequency than they receive.
    pub fn is_repeater(&self) -> bool {
        (self.tx_freq - self.rx_freq).abs() > 1e-6
    }

    pub fn analog(&self) -> Option<&AnalogSettings> {
        match &self.mode {
            ChannelMode::Analog(settings) => Some(settings),
            ChannelMode::Digital(_) => None,
        }
    }

    pub fn digital(&self) -> Option<&DigitalSettings> {
        match &self.mode {
            ChannelMode::Digital(settings) => Some(settings),
            ChannelMode::Analog(_) => None,
        }
    }
}

/// The `Name;CODE` zone column split into its two fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneKey {
    pub name: String,
    pub code: Option<String>,
}

impl ZoneKey {
    pub fn parse(raw: &str) -> Self {
        let (name, code) = match raw.split_once(';') {
            Some((name, code)) => (name.trim(), code.trim()),
            None => (raw.trim(), ""),
        };
        Self {
            name: name.to_string(),
            code: (!code.is_empty()).then(|| code.to_string()),
        }
    }

    /// The short label used to prefix generated repeater channel names.
    pub fn label(&self) -> &str {
        self.code.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    pub name: String,
    pub code: Option<String>,
    pub channels: Vec<Channel>,
    pub source_order: usize,
    /// Source kind of the row that first referenced this zone.
    pub first_source: SourceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanList {
    pub name: String,
    pub channels: Vec<Channel>,
}

/// The canonical model of one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Codeplug {
    pub contacts: Vec<Contact>,
    pub zones: Vec<Zone>,
    pub scan_lists: Vec<ScanList>,
}

impl Codeplug {
    /// Every channel, zone by zone, in zone order.
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.zones.iter().flat_map(|zone| zone.channels.iter())
    }

    pub fn channel_count(&self) -> usize {
        self.zones.iter().map(|zone| zone.channels.len()).sum()
    }

    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.name == name)
    }
}

/// One input file handed to the readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub kind: SourceKind,
    pub name: String,
    pub contents: String,
}

/// A serialized file ready to be written under a radio's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct RadioOutput {
    pub radio_id: &'static str,
    pub radio_name: &'static str,
    pub files: Vec<OutputFile>,
    pub codeplug: Codeplug,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub outputs: Vec<RadioOutput>,
    pub warnings: Vec<crate::domain::diagnostics::ValidationWarning>,
}
