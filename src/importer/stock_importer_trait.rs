// ==========================================
// 制造业 ERP - 库存导入 Trait
// ==========================================
// 职责: 定义库存期初导入接口（不包含实现）
// ==========================================

use crate::importer::error::ImportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 被拒绝的行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRejection {
    pub row: usize,
    pub reason: String,
}

/// 导入结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub batch_id: String,
    pub total_rows: usize,
    pub imported: usize,
    pub rejected: Vec<RowRejection>,
    pub elapsed_ms: u128,
}

// ==========================================
// StockImporter Trait
// ==========================================
// 实现者: StockImporterImpl
#[async_trait]
pub trait StockImporter: Send + Sync {
    /// 从 CSV 文件导入库存物料
    ///
    /// # 列
    /// item_code, name, unit, plant, current_stock, min_stock
    ///
    /// # 返回
    /// - Ok(ImportResult): 逐行校验后写入的结果（被拒行附行号与原因）
    /// - Err: 文件读取错误、缺列、数据库错误
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> Result<ImportResult, ImportError>;

    /// 批量导入多个文件（并发执行，互不影响）
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportResult, String>>;
}
