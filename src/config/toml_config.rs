use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_string, validate_output_formats, validate_path,
    Validate, INPUT_EXTENSIONS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub exchange: ExchangeConfig,
    pub input: InputConfig,
    #[serde(default)]
    pub draw: DrawConfig,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub roster: String,
    pub roster_sheet: Option<String>,
    pub prior: String,
    pub prior_sheet: Option<String>,
    pub base_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawConfig {
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    pub report_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

fn default_formats() -> Vec<String> {
    vec!["csv".to_string()]
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SantaError::InputNotFound {
                    path: path.display().to_string(),
                }
            } else {
                SantaError::IoError(e)
            }
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SantaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ROSTER_FILE})
    ///
    /// Unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SantaError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("exchange.name", &self.exchange.name)?;
        validate_path("input.roster", &self.input.roster)?;
        validate_path("input.prior", &self.input.prior)?;
        validate_file_extensions(
            "input",
            &[self.input.roster.as_str(), self.input.prior.as_str()],
            INPUT_EXTENSIONS,
        )?;
        validate_path("output.path", &self.output.path)?;
        validate_output_formats("output.formats", &self.output.formats)?;

        if let Some(level) = self.log_level() {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(SantaError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }

    /// Directory relative input and output paths resolve against.
    pub fn base_dir(&self) -> &str {
        self.input.base_dir.as_deref().unwrap_or(".")
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn exchange_name(&self) -> &str {
        &self.exchange.name
    }

    fn roster_path(&self) -> &str {
        &self.input.roster
    }

    fn roster_sheet(&self) -> Option<&str> {
        self.input.roster_sheet.as_deref()
    }

    fn prior_path(&self) -> &str {
        &self.input.prior
    }

    fn prior_sheet(&self) -> Option<&str> {
        self.input.prior_sheet.as_deref()
    }

    fn output_file(&self) -> &str {
        &self.output.path
    }

    fn report_file(&self) -> &str {
        self.output
            .report_path
            .as_deref()
            .unwrap_or("output_secret_santa_report.json")
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn seed(&self) -> Option<u64> {
        self.draw.seed
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
