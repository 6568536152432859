// ==========================================
// 制造业 ERP - 导入层
// ==========================================
// 职责: 库存物料期初 CSV 导入
// ==========================================

pub mod error;
pub mod file_parser;
pub mod stock_importer_impl;
pub mod stock_importer_trait;

pub use error::ImportError;
pub use file_parser::{CsvParser, FileParser, RawRow};
pub use stock_importer_impl::StockImporterImpl;
pub use stock_importer_trait::{ImportResult, RowRejection, StockImporter};
