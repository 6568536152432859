// ==========================================
// 制造业 ERP - 库存导入器实现
// ==========================================
// 流程: 解析 → 映射/校验 → 文件内去重 → 落库（事务化）→ 审计
// 说明: 期初导入直接写 current_stock，不生成出入库流水
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::inventory::StockItem;
use crate::importer::error::ImportError;
use crate::importer::file_parser::{FileParser, RawRow};
use crate::importer::stock_importer_trait::{ImportResult, RowRejection, StockImporter};
use crate::repository::{ActionLogRepository, StockRepository};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 必需列
const REQUIRED_COLUMNS: [&str; 2] = ["item_code", "name"];

/// 导入默认值（来自配置）
struct ImportDefaults {
    unit: String,
    plant: Option<String>,
}

// ==========================================
// StockImporterImpl - 库存导入器实现
// ==========================================
pub struct StockImporterImpl {
    stock_repo: Arc<StockRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<dyn ImportConfigReader>,
    file_parser: Box<dyn FileParser>,
    actor: String,
}

impl StockImporterImpl {
    pub fn new(
        stock_repo: Arc<StockRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<dyn ImportConfigReader>,
        file_parser: Box<dyn FileParser>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            stock_repo,
            action_log_repo,
            config,
            file_parser,
            actor: actor.into(),
        }
    }

    /// 单行映射与校验
    fn map_row(
        &self,
        row: &RawRow,
        defaults: &ImportDefaults,
        now: NaiveDateTime,
    ) -> Result<StockItem, ImportError> {
        let required = |field: &str| {
            row.get(field)
                .map(str::to_string)
                .ok_or_else(|| ImportError::RequiredFieldMissing {
                    row: row.line_no,
                    field: field.to_string(),
                })
        };
        let quantity = |field: &str| -> Result<f64, ImportError> {
            let Some(raw) = row.get(field) else {
                return Ok(0.0);
            };
            let value = raw
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: row.line_no,
                    field: field.to_string(),
                    value: raw.to_string(),
                })?;
            if value < 0.0 {
                return Err(ImportError::NegativeValue {
                    row: row.line_no,
                    field: field.to_string(),
                    value,
                });
            }
            Ok(value)
        };

        Ok(StockItem {
            item_id: Uuid::new_v4().to_string(),
            item_code: required("item_code")?.to_uppercase(),
            name: required("name")?,
            unit: row
                .get("unit")
                .map(str::to_string)
                .unwrap_or_else(|| defaults.unit.clone()),
            plant: row
                .get("plant")
                .map(str::to_string)
                .or_else(|| defaults.plant.clone()),
            current_stock: quantity("current_stock")?,
            min_stock: quantity("min_stock")?,
            updated_at: now,
        })
    }
}

#[async_trait::async_trait]
impl StockImporter for StockImporterImpl {
    #[instrument(skip(self, file_path), fields(batch_id = tracing::field::Empty))]
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> Result<ImportResult, ImportError> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let path_display = file_path.as_ref().display().to_string();
        info!(file_path = %path_display, "开始导入库存数据");

        // === 步骤 1: 解析文件 ===
        let rows = self.file_parser.parse_to_raw_rows(file_path.as_ref())?;
        if let Some(first) = rows.first() {
            for column in REQUIRED_COLUMNS {
                if !first.fields.contains_key(column) {
                    return Err(ImportError::MissingColumn(column.to_string()));
                }
            }
        }

        // === 步骤 2: 读取默认值 ===
        let unit = self
            .config
            .get_default_unit()
            .await
            .map_err(|e| ImportError::ConfigReadError(e.to_string()))?;
        let plant = self
            .config
            .get_default_plant()
            .await
            .map_err(|e| ImportError::ConfigReadError(e.to_string()))?;
        let defaults = ImportDefaults { unit, plant };

        // === 步骤 3: 映射、校验、去重 ===
        let now = chrono::Local::now().naive_local();
        let mut seen_codes = HashSet::new();
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for row in &rows {
            let mapped = self.map_row(row, &defaults, now).and_then(|item| {
                if seen_codes.insert(item.item_code.clone()) {
                    Ok(item)
                } else {
                    Err(ImportError::DuplicateCode {
                        row: row.line_no,
                        item_code: item.item_code,
                    })
                }
            });
            match mapped {
                Ok(item) => accepted.push(item),
                Err(e) => {
                    warn!(row = row.line_no, error = %e, "行校验失败");
                    rejected.push(RowRejection {
                        row: row.line_no,
                        reason: e.to_string(),
                    });
                }
            }
        }

        // === 步骤 4: 落库 ===
        let imported = if accepted.is_empty() {
            0
        } else {
            self.stock_repo.upsert_batch_by_code(&accepted)?
        };

        // === 步骤 5: 审计 ===
        let log = ActionLog::new(ActionType::StockImport, &self.actor, Some(&batch_id))
            .with_payload(serde_json::json!({
                "file": path_display,
                "total_rows": rows.len(),
                "imported": imported,
                "rejected": rejected.len(),
            }));
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "导入审计日志写入失败");
        }

        let elapsed_ms = start_time.elapsed().as_millis();
        info!(
            total_rows = rows.len(),
            imported,
            rejected = rejected.len(),
            elapsed_ms = elapsed_ms as u64,
            "库存导入完成"
        );

        Ok(ImportResult {
            batch_id,
            total_rows: rows.len(),
            imported,
            rejected,
            elapsed_ms,
        })
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportResult, String>> {
        let futures = file_paths
            .iter()
            .map(|path| async move { self.import_from_csv(path.as_ref()).await });

        futures::future::join_all(futures)
            .await
            .into_iter()
            .map(|result| result.map_err(|e| e.to_string()))
            .collect()
    }
}
