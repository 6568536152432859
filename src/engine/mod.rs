// ==========================================
// 制造业 ERP - 引擎层
// ==========================================
// 职责: 业务计算（纯函数），不做 I/O
// ==========================================

pub mod display_format;
pub mod error;
pub mod pipeline;
pub mod stage_progress;
pub mod stock_adjuster;

pub use error::{EngineError, EngineResult, ValidationReason};
pub use pipeline::{PipelineAggregator, PipelineMetrics};
pub use stage_progress::{CommitOutcome, ItemProgress, ProgressReport, StageProgressCalculator};
pub use stock_adjuster::StockAdjuster;
