//! # Config Loader
//!
//! 读取 Keystone producer 配置（TOML 为主，JSON 亦可），叠加命令行覆盖项，
//! 最后统一校验。
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), contracts::ContractError> {
//! let config = ConfigLoader::new()
//!     .with_operation("getAll")?
//!     .load_path(Path::new("keystone.toml"))?;
//! println!("Endpoint: {}", config.endpoint.host);
//! # Ok(())
//! # }
//! ```

mod validator;

pub use contracts::KeystoneConfig;

use contracts::{ContractError, Operation};
use std::path::Path;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// 按扩展名（不区分大小写）判断格式
    pub fn from_path(path: &Path) -> Result<Self, ContractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "" => Err(ContractError::config_parse(format!(
                "{} has no extension, expected .toml or .json",
                path.display()
            ))),
            other => Err(ContractError::config_parse(format!(
                "unsupported config format: .{other}"
            ))),
        }
    }

    fn parse(self, content: &str) -> Result<KeystoneConfig, ContractError> {
        let parsed = match self {
            Self::Toml => toml::from_str(content).map_err(|e| (e.to_string(), boxed(e))),
            Self::Json => serde_json::from_str(content).map_err(|e| (e.to_string(), boxed(e))),
        };

        parsed.map_err(|(message, source)| ContractError::ConfigParse {
            message: format!("{self:?}: {message}"),
            source: Some(source),
        })
    }
}

fn boxed<E: std::error::Error + Send + Sync + 'static>(
    e: E,
) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(e)
}

/// 配置加载器
///
/// 覆盖项在解析之后、校验之前写入，因此覆盖值同样受校验规则约束
/// （例如 `queue_capacity = 0` 会被拒绝）。
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    operation: Option<Operation>,
    queue_capacity: Option<usize>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 覆盖 `endpoint.operation`（按线上名称解析，如 `getAll`）
    pub fn with_operation(mut self, name: &str) -> Result<Self, ContractError> {
        self.operation = Some(name.parse()?);
        Ok(self)
    }

    /// 覆盖 `route.queue_capacity`
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// 从文件加载，格式由扩展名决定
    pub fn load_path(&self, path: &Path) -> Result<KeystoneConfig, ContractError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content, format)
    }

    /// 从字符串加载
    pub fn load_str(
        &self,
        content: &str,
        format: ConfigFormat,
    ) -> Result<KeystoneConfig, ContractError> {
        let mut config = format.parse(content)?;
        self.apply(&mut config);
        validator::validate(&config)?;
        Ok(config)
    }

    fn apply(&self, config: &mut KeystoneConfig) {
        if let Some(operation) = self.operation {
            config.endpoint.operation = Some(operation);
        }
        if let Some(capacity) = self.queue_capacity {
            config.route.queue_capacity = capacity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL_TOML: &str = r#"
[endpoint]
host = "http://keystone.local:5000/v3"
username = "admin"
project = "admin"
"#;

    const FULL_TOML: &str = r#"
[endpoint]
host = "http://keystone.local:5000/v3"
username = "admin"
password = "secret"
project = "admin"
domain = "corp"
operation = "getAll"

[route]
queue_capacity = 8

[[directory.groups]]
name = "ops"
description = "operators"
domain_id = "corp"
"#;

    fn load(content: &str) -> Result<KeystoneConfig, ContractError> {
        ConfigLoader::new().load_str(content, ConfigFormat::Toml)
    }

    #[test]
    fn test_defaults() {
        let config = load(MINIMAL_TOML).unwrap();
        assert_eq!(config.endpoint.domain, "default");
        assert_eq!(config.endpoint.password, "");
        assert_eq!(config.endpoint.operation, None);
        assert_eq!(config.route.queue_capacity, 64);
        assert!(config.directory.groups.is_empty());
    }

    #[test]
    fn test_full_toml() {
        let config = load(FULL_TOML).unwrap();
        assert_eq!(config.endpoint.domain, "corp");
        assert_eq!(config.endpoint.operation, Some(Operation::GetAll));
        assert_eq!(config.route.queue_capacity, 8);
        assert_eq!(config.directory.groups[0].name, "ops");
    }

    #[test]
    fn test_json() {
        let content = r#"{
            "endpoint": {
                "host": "http://keystone.local:5000/v3",
                "username": "admin",
                "project": "admin",
                "operation": "delete"
            },
            "directory": { "groups": [{ "name": "ops" }] }
        }"#;
        let config = ConfigLoader::new()
            .load_str(content, ConfigFormat::Json)
            .unwrap();
        assert_eq!(config.endpoint.operation, Some(Operation::Delete));
        assert_eq!(config.directory.groups.len(), 1);
    }

    #[test]
    fn test_unknown_operation_in_file_is_parse_error() {
        let content = format!("{MINIMAL_TOML}operation = \"purge\"\n");
        assert!(matches!(load(&content), Err(ContractError::ConfigParse { .. })));
        assert!(matches!(
            load("invalid toml [[["),
            Err(ContractError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_operation_override_replaces_file_value() {
        let config = ConfigLoader::new()
            .with_operation("delete")
            .unwrap()
            .load_str(FULL_TOML, ConfigFormat::Toml)
            .unwrap();
        assert_eq!(config.endpoint.operation, Some(Operation::Delete));

        let err = ConfigLoader::new().with_operation("purge").unwrap_err();
        assert!(matches!(err, ContractError::UnknownOperation { .. }));
    }

    #[test]
    fn test_queue_capacity_override_is_validated() {
        let config = ConfigLoader::new()
            .with_queue_capacity(2)
            .load_str(FULL_TOML, ConfigFormat::Toml)
            .unwrap();
        assert_eq!(config.route.queue_capacity, 2);

        let err = ConfigLoader::new()
            .with_queue_capacity(0)
            .load_str(FULL_TOML, ConfigFormat::Toml)
            .unwrap_err();
        match err {
            ContractError::ConfigValidation { field, .. } => {
                assert_eq!(field, "route.queue_capacity")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = MINIMAL_TOML.replace("http://keystone.local:5000/v3", "no scheme");
        let err = load(&content).unwrap_err();
        assert!(err.to_string().contains("endpoint.host"));
    }

    #[test]
    fn test_load_path() {
        let mut file = tempfile::Builder::new().suffix(".TOML").tempfile().unwrap();
        file.write_all(FULL_TOML.as_bytes()).unwrap();

        let config = ConfigLoader::new().load_path(file.path()).unwrap();
        assert_eq!(config.endpoint.username, "admin");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a.json")).unwrap(),
            ConfigFormat::Json
        );
        let err = ConfigFormat::from_path(Path::new("a.yaml")).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
        let err = ConfigFormat::from_path(Path::new("keystone")).unwrap_err();
        assert!(err.to_string().contains("no extension"));
    }
}
