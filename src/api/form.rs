// ==========================================
// 制造业 ERP - 表单解析（边界层）
// ==========================================
// 职责: 把界面录入的字符串解析为强类型数量，之后的引擎只接触 f64
// 规则: 去空白；允许千分位逗号；空串视为未填写
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::engine::error::ValidationReason;

/// 解析必填数量
///
/// # 错误
/// - EmptyField: 空白
/// - InvalidNumber: 不是有限数字
/// - NegativeQuantity: 小于 0
pub fn parse_quantity(field: &str, raw: &str) -> Result<f64, ValidationReason> {
    parse_optional_quantity(field, raw)?.ok_or_else(|| ValidationReason::EmptyField {
        field: field.to_string(),
    })
}

/// 解析可选数量（空白 → None）
pub fn parse_optional_quantity(field: &str, raw: &str) -> Result<Option<f64>, ValidationReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = trimmed
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationReason::InvalidNumber {
            field: field.to_string(),
            value: trimmed.to_string(),
        })?;

    if value < 0.0 {
        return Err(ValidationReason::NegativeQuantity {
            field: field.to_string(),
        });
    }
    Ok(Some(value))
}

/// 可选文本：去空白，空串 → None
pub fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 必填文本：去空白后不能为空
pub fn required_text(field: &str, raw: &str) -> Result<String, ValidationReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationReason::EmptyField {
            field: field.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// 操作人：表单未填写时取配置 audit.default_actor
pub fn resolve_actor(config: &ConfigManager, actor: Option<&str>) -> ApiResult<String> {
    match optional_text(actor) {
        Some(actor) => Ok(actor),
        None => config
            .get_default_actor()
            .map_err(|e| ApiError::ConfigurationError(e.to_string())),
    }
}
