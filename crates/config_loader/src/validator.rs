//! 配置校验模块
//!
//! 校验规则：
//! - 结构体字段规则 (`validator` derive)：host 为 URL、username / project 非空、
//!   queue_capacity >= 1、预置 group 名称非空
//! - 同一 domain 下预置 group 名称唯一

use std::collections::HashSet;

use contracts::{ContractError, KeystoneConfig};
use ::validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// 校验 KeystoneConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &KeystoneConfig) -> Result<(), ContractError> {
    validate_fields(config)?;
    validate_seed_names(config)?;
    Ok(())
}

/// 字段级规则
fn validate_fields(config: &KeystoneConfig) -> Result<(), ContractError> {
    let Err(errors) = config.validate() else {
        return Ok(());
    };

    let mut flat = Vec::new();
    flatten_errors("", &errors, &mut flat);

    match flat.into_iter().next() {
        Some((field, message)) => Err(ContractError::config_validation(field, message)),
        None => Err(ContractError::config_validation("config", errors.to_string())),
    }
}

/// 将嵌套错误展开为 (字段路径, 消息)，按字段名排序以保证结果稳定
fn flatten_errors(path: &str, errors: &ValidationErrors, out: &mut Vec<(String, String)>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        let field_path = if path.is_empty() {
            field.to_string()
        } else {
            format!("{path}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    out.push((field_path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(&field_path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_errors(&format!("{field_path}[{index}]"), inner, out);
                }
            }
        }
    }
}

/// 校验预置 group 在同一 domain 内名称唯一
fn validate_seed_names(config: &KeystoneConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (index, seed) in config.directory.groups.iter().enumerate() {
        let key = (seed.domain_id.as_deref(), seed.name.as_str());
        if !seen.insert(key) {
            return Err(ContractError::config_validation(
                format!("directory.groups[{index}].name"),
                format!("duplicate group name '{}'", seed.name),
            ));
        }
    }
    Ok(())
}
