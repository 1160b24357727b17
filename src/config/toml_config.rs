use crate::core::orderer::SortMode;
use crate::output::RadioModel;
use crate::utils::error::{CodeplugError, Result};
use crate::utils::validation::{validate_non_empty_list, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conversion settings read from a TOML file.
///
/// ```toml
/// [conversion]
/// input_dir = "${HOME}/codeplug/input"
/// output_dir = "./out"
/// radios = ["878", "890"]
/// sort = "repeaters-first"
/// dump_json = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub conversion: ConversionSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionSection {
    pub input_dir: Option<String>,
    pub output_dir: Option<String>,
    pub radios: Option<Vec<String>>,
    pub sort: Option<String>,
    pub dump_json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| CodeplugError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CodeplugError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}` from the environment. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CodeplugError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Radios named in the file, parsed. `None` when the key is absent.
    pub fn radios(&self) -> Result<Option<Vec<RadioModel>>> {
        self.conversion
            .radios
            .as_ref()
            .map(|radios| {
                radios
                    .iter()
                    .map(|r| r.parse::<RadioModel>())
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()
    }

    pub fn sort_mode(&self) -> Result<Option<SortMode>> {
        self.conversion
            .sort
            .as_deref()
            .map(str::parse::<SortMode>)
            .transpose()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let section = &self.conversion;
        if let Some(input_dir) = &section.input_dir {
            validate_path("conversion.input_dir", input_dir)?;
        }
        if let Some(output_dir) = &section.output_dir {
            validate_path("conversion.output_dir", output_dir)?;
        }
        if let Some(radios) = self.radios()? {
            validate_non_empty_list("conversion.radios", &radios)?;
        }
        self.sort_mode()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_conversion_section() {
        let toml_content = r#"
[conversion]
input_dir = "./input"
output_dir = "./out"
radios = ["890"]
sort = "analog-first"
dump_json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.conversion.input_dir.as_deref(), Some("./input"));
        assert_eq!(config.radios().unwrap(), Some(vec![RadioModel::Anytone890]));
        assert_eq!(config.sort_mode().unwrap(), Some(SortMode::AnalogFirst));
        assert_eq!(config.conversion.dump_json, Some(true));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_section_is_empty() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.conversion.input_dir.is_none());
        assert_eq!(config.radios().unwrap(), None);
        assert_eq!(config.sort_mode().unwrap(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("K7ABD_TEST_INPUT", "/data/k7abd");

        let toml_content = r#"
[conversion]
input_dir = "${K7ABD_TEST_INPUT}"
output_dir = "${K7ABD_TEST_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.conversion.input_dir.as_deref(), Some("/data/k7abd"));
        assert_eq!(
            config.conversion.output_dir.as_deref(),
            Some("${K7ABD_TEST_UNSET_VAR}")
        );

        std::env::remove_var("K7ABD_TEST_INPUT");
    }

    #[test]
    fn test_unsupported_radio_is_rejected() {
        let config = TomlConfig::from_toml_str(
            r#"
[conversion]
radios = ["878", "868"]
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CodeplugError::InvalidConfigValueError { .. }));
        assert!(err.to_string().contains("868"));
    }

    #[test]
    fn test_empty_radio_list_is_rejected() {
        let config = TomlConfig::from_toml_str("[conversion]\nradios = []\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_key_is_a_config_error() {
        let err = TomlConfig::from_toml_str("[conversion]\nsort_mode = \"alpha\"\n").unwrap_err();
        assert!(matches!(err, CodeplugError::ConfigError { .. }));
    }

    #[test]
    fn test_unreadable_file_is_a_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = TomlConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CodeplugError::ConfigError { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[conversion]\nsort = \"repeaters-first\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.sort_mode().unwrap(), Some(SortMode::RepeatersFirst));
    }
}
