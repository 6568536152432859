// ==========================================
// 制造业 ERP - 文件解析器实现
// ==========================================
// 支持: CSV (.csv)
// 输出: 每行一个 表头 → 值 的映射，附带源文件行号
// ==========================================

use crate::importer::error::ImportError;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 解析后的原始行
#[derive(Debug, Clone)]
pub struct RawRow {
    pub line_no: usize, // 源文件行号（表头为第 1 行）
    pub fields: HashMap<String, String>,
}

impl RawRow {
    /// 读取字段（去空白；空串视为缺失）
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    fn parse_to_raw_rows(&self, file_path: &Path) -> Result<Vec<RawRow>, ImportError>;
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_rows(&self, file_path: &Path) -> Result<Vec<RawRow>, ImportError> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let mut fields = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    fields.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if fields.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawRow {
                line_no: row_idx + 2,
                fields,
            });
        }

        Ok(rows)
    }
}
