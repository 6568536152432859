// ==========================================
// 制造业 ERP - 操作日志领域模型
// ==========================================
// 红线: 所有写入必须记录
// 用途: 审计追踪（进度提交 / 库存调整 / 基础资料维护 / 导入）
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,         // 日志ID
    pub action_type: ActionType,   // 操作类型
    pub action_ts: NaiveDateTime,  // 操作时间戳
    pub actor: String,             // 操作人
    pub target_id: Option<String>, // 作用对象（订单ID / 物料ID / 批次ID）

    // ===== 操作负载 =====
    pub payload_json: Option<JsonValue>,
    pub detail: Option<String>,
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    ProgressCommit, // 工序进度提交
    StockAdjust,    // 库存调整
    ReferenceAdd,   // 新增基础资料
    StockImport,    // 库存导入
}

impl ActionType {
    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::ProgressCommit => "ProgressCommit",
            ActionType::StockAdjust => "StockAdjust",
            ActionType::ReferenceAdd => "ReferenceAdd",
            ActionType::StockImport => "StockImport",
        }
    }

    /// 从字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ProgressCommit" => Some(ActionType::ProgressCommit),
            "StockAdjust" => Some(ActionType::StockAdjust),
            "ReferenceAdd" => Some(ActionType::ReferenceAdd),
            "StockImport" => Some(ActionType::StockImport),
            _ => None,
        }
    }
}

impl ActionLog {
    /// 创建新的操作日志（ID 使用 UUID，时间取本地当前时间）
    pub fn new(action_type: ActionType, actor: &str, target_id: Option<&str>) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type,
            action_ts: chrono::Local::now().naive_local(),
            actor: actor.to_string(),
            target_id: target_id.map(str::to_string),
            payload_json: None,
            detail: None,
        }
    }

    /// 设置操作负载
    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }

    /// 设置详细描述
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
