use crate::adapters::llm::ModelSettings;
use crate::core::prompt::DEFAULT_PERSONA;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:1234/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mistral-7b-instruct-v0.2";
pub const DEFAULT_STATUTE_PATH: &str = "zakony/ZZ_2011_203_20240301.docx";
pub const DEFAULT_CONTRACT_PATH: &str = "zmluvy/vzor_zmluva_01.docx";
pub const DEFAULT_OUTPUT_PATH: &str = "vysledky.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub model: ModelConfig,
    pub statute: StatuteConfig,
    pub contract: ContractConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub persona: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 500,
            persona: DEFAULT_PERSONA.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatuteConfig {
    pub path: String,
    pub allowed_prefixes: Vec<String>,
}

impl Default for StatuteConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STATUTE_PATH.to_string(),
            allowed_prefixes: vec!["§3".to_string(), "§5".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub path: String,
    pub preview_count: usize,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_CONTRACT_PATH.to_string(),
            preview_count: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub write_tsv: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
            write_tsv: false,
        }
    }
}

impl AuditConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AuditError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AuditError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LLM_ENDPOINT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var regex"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("model.endpoint", &self.model.endpoint)?;
        validation::validate_non_empty_string("model.model", &self.model.model)?;
        validation::validate_range("model.temperature", self.model.temperature, 0.0, 2.0)?;
        validation::validate_positive_number("model.max_tokens", self.model.max_tokens as usize, 1)?;

        validation::validate_path("statute.path", &self.statute.path)?;
        validation::validate_non_empty_list("statute.allowed_prefixes", &self.statute.allowed_prefixes)?;
        for prefix in &self.statute.allowed_prefixes {
            validation::validate_non_empty_string("statute.allowed_prefixes", prefix)?;
        }

        validation::validate_path("contract.path", &self.contract.path)?;
        validation::validate_path("output.path", &self.output.path)?;

        Ok(())
    }

    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            endpoint: self.model.endpoint.clone(),
            model: self.model.model.clone(),
            temperature: self.model.temperature,
            max_tokens: self.model.max_tokens,
            persona: self.model.persona.clone(),
        }
    }
}

impl ConfigProvider for AuditConfig {
    fn statute_path(&self) -> &str {
        &self.statute.path
    }

    fn contract_path(&self) -> &str {
        &self.contract.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn allowed_prefixes(&self) -> &[String] {
        &self.statute.allowed_prefixes
    }

    fn preview_count(&self) -> usize {
        self.contract.preview_count
    }

    fn write_tsv(&self) -> bool {
        self.output.write_tsv
    }
}

impl Validate for AuditConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_fixed_setup() {
        let config = AuditConfig::from_toml_str("").unwrap();

        assert_eq!(config.model.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model.model, DEFAULT_MODEL);
        assert_eq!(config.model.temperature, 0.3);
        assert_eq!(config.model.max_tokens, 500);
        assert_eq!(config.allowed_prefixes(), &["§3".to_string(), "§5".to_string()]);
        assert_eq!(config.output_path(), "vysledky.json");
        assert_eq!(config.preview_count(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[model]
endpoint = "http://127.0.0.1:8080/v1/chat/completions"
temperature = 0.0

[statute]
path = "zakony/zakon.txt"
allowed_prefixes = ["§27"]
"#;

        let config = AuditConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.model.endpoint, "http://127.0.0.1:8080/v1/chat/completions");
        assert_eq!(config.model.model, DEFAULT_MODEL);
        assert_eq!(config.model.temperature, 0.0);
        assert_eq!(config.statute_path(), "zakony/zakon.txt");
        assert_eq!(config.allowed_prefixes(), &["§27".to_string()]);
        assert_eq!(config.contract_path(), DEFAULT_CONTRACT_PATH);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CLAUSE_AUDIT_TEST_ENDPOINT", "http://llm.internal:1234/v1/chat/completions");

        let toml_content = r#"
[model]
endpoint = "${CLAUSE_AUDIT_TEST_ENDPOINT}"
"#;

        let config = AuditConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.model.endpoint, "http://llm.internal:1234/v1/chat/completions");

        std::env::remove_var("CLAUSE_AUDIT_TEST_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let config = AuditConfig::from_toml_str(
            r#"
[model]
endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AuditConfig::from_toml_str(
            r#"
[statute]
allowed_prefixes = []
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(AuditError::MissingConfigError { .. })
        ));

        let config = AuditConfig::from_toml_str(
            r#"
[model]
temperature = 3.5
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AuditConfig::from_toml_str("[model\nendpoint = 1").unwrap_err();
        assert!(matches!(err, AuditError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\npath = \"out/results.json\"\nwrite_tsv = true\n")
            .unwrap();

        let config = AuditConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "out/results.json");
        assert!(config.write_tsv());
    }
}
