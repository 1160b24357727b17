pub mod cli;
pub mod toml_config;

use crate::core::orderer::SortMode;
use crate::core::ConfigProvider;
use crate::output::RadioModel;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_existing_dir, validate_non_empty_list, validate_path, validate_required_field,
    Validate,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

/// Which radios to write import files for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum RadioChoice {
    #[value(name = "878")]
    #[serde(rename = "878")]
    Anytone878,
    #[value(name = "890")]
    #[serde(rename = "890")]
    Anytone890,
    #[default]
    #[serde(rename = "both")]
    Both,
}

impl RadioChoice {
    pub fn radios(self) -> Vec<RadioModel> {
        match self {
            RadioChoice::Anytone878 => vec![RadioModel::Anytone878],
            RadioChoice::Anytone890 => vec![RadioModel::Anytone890],
            RadioChoice::Both => RadioModel::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "k7abd-anytone")]
#[command(about = "Convert K7ABD-format CSV files into Anytone 878/890 CPS import files")]
pub struct CliConfig {
    /// Directory holding the Analog__, Digital-Others__, Digital-Repeaters__
    /// and Talkgroups__ CSV files
    pub input_dir: Option<String>,

    /// Directory the per-radio import files are written under
    pub output_dir: Option<String>,

    #[arg(long, value_enum, help = "Radio to generate files for [default: both]")]
    pub radio: Option<RadioChoice>,

    #[arg(long, value_enum, help = "Zone ordering [default: alpha]")]
    pub sort: Option<SortMode>,

    #[arg(long, help = "Also write the finalized model as codeplug.json")]
    pub dump_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "TOML file with a [conversion] section")]
    pub config: Option<String>,

    #[arg(skip)]
    #[serde(skip)]
    radios_from_file: Option<Vec<RadioModel>>,
}

impl CliConfig {
    /// Fills every setting not given on the command line from the `--config`
    /// file, if there is one.
    pub fn merge_config_file(mut self) -> Result<Self> {
        let Some(path) = self.config.clone() else {
            return Ok(self);
        };
        tracing::debug!("Loading configuration from {}", path);
        let file = TomlConfig::from_file(&path)?;
        file.validate()?;
        self.merge(file)?;
        Ok(self)
    }

    fn merge(&mut self, file: TomlConfig) -> Result<()> {
        if self.radio.is_none() {
            self.radios_from_file = file.radios()?;
        }
        if self.sort.is_none() {
            self.sort = file.sort_mode()?;
        }
        let section = file.conversion;
        if self.input_dir.is_none() {
            self.input_dir = section.input_dir;
        }
        if self.output_dir.is_none() {
            self.output_dir = section.output_dir;
        }
        self.dump_json = self.dump_json || section.dump_json.unwrap_or(false);
        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn input_dir(&self) -> &str {
        self.input_dir.as_deref().unwrap_or_default()
    }

    fn output_dir(&self) -> &str {
        self.output_dir.as_deref().unwrap_or_default()
    }

    fn radios(&self) -> Vec<RadioModel> {
        match (self.radio, &self.radios_from_file) {
            (Some(choice), _) => choice.radios(),
            (None, Some(radios)) => radios.clone(),
            (None, None) => RadioChoice::default().radios(),
        }
    }

    fn sort_mode(&self) -> SortMode {
        self.sort.unwrap_or_default()
    }

    fn dump_json(&self) -> bool {
        self.dump_json
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let input_dir = validate_required_field("input_dir", &self.input_dir)?;
        validate_existing_dir("input_dir", input_dir)?;
        let output_dir = validate_required_field("output_dir", &self.output_dir)?;
        validate_path("output_dir", output_dir)?;
        validate_non_empty_list("radios", &self.radios())?;
        Ok(())
    }
}
