use crate::error::{IbanCleanerError, Result};
use crate::types::constants::DEFAULT_SUFFIX;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Config file section holding the tool's settings
const CONFIG_SECTION: &str = "IBANCLEANER";

/// Optional settings coming from a config file or the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub suffix: Option<String>,
    pub sheet: Option<String>,
    pub output_dir: Option<String>,
}

impl Settings {
    /// Load settings from IBANCLEANER_SUFFIX, IBANCLEANER_SHEET and
    /// IBANCLEANER_OUTPUT_DIR. Unset or empty variables are ignored.
    pub fn from_env() -> Result<Self> {
        Ok(Settings {
            suffix: env_setting("IBANCLEANER_SUFFIX")?,
            sheet: env_setting("IBANCLEANER_SHEET")?,
            output_dir: env_setting("IBANCLEANER_OUTPUT_DIR")?,
        })
    }

    /// Load settings from an INI style config file.
    /// Reads from the [IBANCLEANER] section
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            IbanCleanerError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current_section = String::new();

        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len() - 1].trim().to_uppercase();
                sections.entry(current_section.clone()).or_default();
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_uppercase();
                let value = value
                    .trim()
                    .trim_matches('"')
                    .trim_matches('\'')
                    .to_string();

                if let Some(section) = sections.get_mut(&current_section) {
                    section.insert(key, value);
                }
            }
        }

        let section = sections.get(CONFIG_SECTION).ok_or_else(|| {
            IbanCleanerError::ConfigError(format!(
                "Missing [{}] section in config file",
                CONFIG_SECTION
            ))
        })?;

        let get = |key: &str| section.get(key).filter(|v| !v.is_empty()).cloned();

        Ok(Settings {
            suffix: get("SUFFIX"),
            sheet: get("SHEET"),
            output_dir: get("OUTPUTDIR"),
        })
    }

    /// Fill the gaps in `self` from a lower priority source
    pub fn or(self, lower: Settings) -> Settings {
        Settings {
            suffix: self.suffix.or(lower.suffix),
            sheet: self.sheet.or(lower.sheet),
            output_dir: self.output_dir.or(lower.output_dir),
        }
    }
}

fn env_setting(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(IbanCleanerError::ConfigError(format!(
            "{} is not valid unicode",
            name
        ))),
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub filename: String,
    /// Explicit output path, overrides the derived name
    pub output: Option<String>,
    /// Directory for the derived output name (defaults to the input's directory)
    pub output_dir: Option<String>,
    pub sheet: Option<String>,
    pub suffix: String,
}

impl Config {
    pub fn new(filename: impl Into<String>) -> Self {
        Config {
            filename: filename.into(),
            output: None,
            output_dir: None,
            sheet: None,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Apply every setting that is present
    pub fn with_settings(mut self, settings: Settings) -> Self {
        if let Some(suffix) = settings.suffix {
            self.suffix = suffix;
        }
        if settings.sheet.is_some() {
            self.sheet = settings.sheet;
        }
        if settings.output_dir.is_some() {
            self.output_dir = settings.output_dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config_file() {
        let content = r#"
# ibancleaner settings
[OTHER]
SUFFIX = _ignored

[ibancleaner]
suffix = "_valid"
; no sheet configured
sheet =
OutputDir = '/tmp/out'
"#;
        let settings = Settings::parse(content).unwrap();
        assert_eq!(settings.suffix.as_deref(), Some("_valid"));
        assert_eq!(settings.sheet, None);
        assert_eq!(settings.output_dir.as_deref(), Some("/tmp/out"));
    }

    #[test]
    fn test_missing_section() {
        let err = Settings::parse("[OTHER]\nSUFFIX=_x\n").unwrap_err();
        assert!(matches!(err, IbanCleanerError::ConfigError(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[IBANCLEANER]\nSHEET=Accounts").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.sheet.as_deref(), Some("Accounts"));
        assert!(Settings::from_file("/nonexistent/ibancleaner.conf").is_err());
    }

    #[test]
    fn test_settings_priority() {
        let cli = Settings {
            suffix: Some("_cli".to_string()),
            ..Default::default()
        };
        let file = Settings {
            suffix: Some("_file".to_string()),
            sheet: Some("Sheet2".to_string()),
            output_dir: None,
        };
        let env = Settings {
            output_dir: Some("/env".to_string()),
            ..Default::default()
        };

        let merged = cli.or(file).or(env);
        assert_eq!(merged.suffix.as_deref(), Some("_cli"));
        assert_eq!(merged.sheet.as_deref(), Some("Sheet2"));
        assert_eq!(merged.output_dir.as_deref(), Some("/env"));
    }

    #[test]
    fn test_config_defaults_and_settings() {
        let config = Config::new("accounts.xlsx");
        assert_eq!(config.suffix, "_cleaned");
        assert_eq!(config.sheet, None);

        let config = config.with_settings(Settings {
            suffix: Some("_ok".to_string()),
            sheet: None,
            output_dir: Some("out".to_string()),
        });
        assert_eq!(config.suffix, "_ok");
        assert_eq!(config.output_dir.as_deref(), Some("out"));
    }
}
