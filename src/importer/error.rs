// ==========================================
// 制造业 ERP - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv）")]
    UnsupportedFormat(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("缺少必需列: {0}")]
    MissingColumn(String),

    // ===== 行级错误 =====
    #[error("必填字段为空 (行 {row}, 字段 {field})")]
    RequiredFieldMissing { row: usize, field: String },

    #[error("类型转换失败 (行 {row}, 字段 {field}): {value}")]
    TypeConversionError {
        row: usize,
        field: String,
        value: String,
    },

    #[error("数值为负 (行 {row}, 字段 {field}): {value}")]
    NegativeValue { row: usize, field: String, value: f64 },

    #[error("物料编码重复 (行 {row}): {item_code}")]
    DuplicateCode { row: usize, item_code: String },

    // ===== 数据库/配置错误 =====
    #[error("数据库写入失败: {0}")]
    DatabaseError(String),

    #[error("配置读取失败: {0}")]
    ConfigReadError(String),
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<crate::repository::RepositoryError> for ImportError {
    fn from(err: crate::repository::RepositoryError) -> Self {
        ImportError::DatabaseError(err.to_string())
    }
}
