// ==========================================
// 制造业 ERP - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: ValidationReason 的 Display 为稳定的英文原因码，
//       面向用户的本地化提示见 i18n（ApiError::toast_message）
// ==========================================

use thiserror::Error;

/// 校验失败原因（闭合枚举）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationReason {
    #[error("no quantity entered")]
    NoQuantityEntered,

    #[error("insufficient stock")]
    InsufficientStock { requested: f64, available: f64 },

    #[error("both add and remove amounts supplied")]
    AmountConflict,

    #[error("no adjustment amount supplied")]
    AmountMissing,

    #[error("negative quantity for {field}")]
    NegativeQuantity { field: String },

    #[error("invalid number for {field}: {value}")]
    InvalidNumber { field: String, value: String },

    #[error("{field} must not be empty")]
    EmptyField { field: String },

    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("target quantity must be positive")]
    InvalidTarget,

    #[error("duplicate item identifier: {identifier}")]
    DuplicateItem { identifier: String },
}

impl ValidationReason {
    /// i18n 键
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationReason::NoQuantityEntered => "validation.no_quantity_entered",
            ValidationReason::InsufficientStock { .. } => "validation.insufficient_stock",
            ValidationReason::AmountConflict => "validation.amount_conflict",
            ValidationReason::AmountMissing => "validation.amount_missing",
            ValidationReason::NegativeQuantity { .. } => "validation.negative_quantity",
            ValidationReason::InvalidNumber { .. } => "validation.invalid_number",
            ValidationReason::EmptyField { .. } => "validation.empty_field",
            ValidationReason::DuplicateName { .. } => "validation.duplicate_name",
            ValidationReason::InvalidTarget => "validation.invalid_target",
            ValidationReason::DuplicateItem { .. } => "validation.duplicate_item",
        }
    }

    /// i18n 占位参数
    pub fn message_args(&self) -> Vec<(&'static str, String)> {
        match self {
            ValidationReason::InsufficientStock { requested, available } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
            ],
            ValidationReason::NegativeQuantity { field }
            | ValidationReason::EmptyField { field } => vec![("field", field.clone())],
            ValidationReason::InvalidNumber { field, value } => {
                vec![("field", field.clone()), ("value", value.clone())]
            }
            ValidationReason::DuplicateName { name } => vec![("name", name.clone())],
            ValidationReason::DuplicateItem { identifier } => {
                vec![("identifier", identifier.clone())]
            }
            ValidationReason::NoQuantityEntered
            | ValidationReason::AmountConflict
            | ValidationReason::AmountMissing
            | ValidationReason::InvalidTarget => Vec::new(),
        }
    }
}

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 调用方输入违反前置条件（可在本地恢复）
    #[error("校验失败: {0}")]
    Validation(ValidationReason),

    /// 引用的物料不在订单内
    #[error("物料不存在: identifier={identifier}")]
    UnknownItem { identifier: String },

    /// 订单无物料明细，瓶颈无定义（配置错误）
    #[error("订单未配置物料明细: order_id={order_id}")]
    EmptyOrder { order_id: String },
}

impl From<ValidationReason> for EngineError {
    fn from(reason: ValidationReason) -> Self {
        EngineError::Validation(reason)
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
