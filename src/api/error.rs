// ==========================================
// 制造业 ERP - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换引擎/仓储/导入错误为用户可读的错误
// 分类: ValidationError（本地可恢复）/ NotFound（终止当前操作）/ StoreError（写入被拒）
// ==========================================

use crate::engine::error::{EngineError, ValidationReason};
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 输入违反前置条件：提示用户，操作中止，状态不变
    #[error("数据验证失败: {0}")]
    ValidationError(ValidationReason),

    /// 引用的订单/物料/供应商不存在
    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 存储拒绝写入（不保留部分提交）
    #[error("存储写入失败: {0}")]
    StoreError(String),

    /// 配置错误（如订单未配置物料明细）
    #[error("配置错误: {0}")]
    ConfigurationError(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 面向用户的本地化提示（toast）
    pub fn toast_message(&self) -> String {
        match self {
            ApiError::ValidationError(reason) => {
                let args = reason.message_args();
                let borrowed: Vec<(&str, &str)> =
                    args.iter().map(|(k, v)| (*k, v.as_str())).collect();
                crate::i18n::t_with_args(reason.message_key(), &borrowed)
            }
            ApiError::NotFound(what) => {
                crate::i18n::t_with_args("error.not_found", &[("what", what.as_str())])
            }
            ApiError::StoreError(_) => crate::i18n::t("error.store"),
            ApiError::ConfigurationError(_) => crate::i18n::t("error.configuration"),
            ApiError::ImportError(msg) => {
                crate::i18n::t_with_args("error.import", &[("reason", msg.as_str())])
            }
            ApiError::Other(_) => crate::i18n::t("error.internal"),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(reason) => ApiError::ValidationError(reason),
            EngineError::UnknownItem { identifier } => {
                ApiError::NotFound(format!("物料(identifier={})不存在", identifier))
            }
            EngineError::EmptyOrder { order_id } => {
                ApiError::ConfigurationError(format!("订单{}未配置物料明细", order_id))
            }
        }
    }
}

impl From<ValidationReason> for ApiError {
    fn from(reason: ValidationReason) -> Self {
        ApiError::ValidationError(reason)
    }
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将Repository层的技术错误转换为业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::StoreError(other.to_string()),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件{}", path)),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
