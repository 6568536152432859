// ==========================================
// 制造业 ERP - 领域类型定义
// ==========================================
// 职责: 闭合枚举（研发项目状态 / 库存流水方向 / 基础资料类型）
// 约束: 所有分支必须穷举匹配，不允许字符串字面量散落各处
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 研发项目状态 (Project Status)
// ==========================================
// 顺序即看板列顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "Idea Submitted")]
    IdeaSubmitted,
    #[serde(rename = "Costing Pending")]
    CostingPending,
    #[serde(rename = "Costing Received")]
    CostingReceived,
    #[serde(rename = "Prototype")]
    Prototype,
    #[serde(rename = "Red Seal")]
    RedSeal,
    #[serde(rename = "Green Seal")]
    GreenSeal,
    #[serde(rename = "Final Approved")]
    FinalApproved,
    #[serde(rename = "PO Issued")]
    PoIssued,
}

impl ProjectStatus {
    /// 全部状态（看板列顺序）
    pub const ALL: [ProjectStatus; 8] = [
        ProjectStatus::IdeaSubmitted,
        ProjectStatus::CostingPending,
        ProjectStatus::CostingReceived,
        ProjectStatus::Prototype,
        ProjectStatus::RedSeal,
        ProjectStatus::GreenSeal,
        ProjectStatus::FinalApproved,
        ProjectStatus::PoIssued,
    ];

    /// 转换为字符串 (用于数据库存储与展示)
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::IdeaSubmitted => "Idea Submitted",
            ProjectStatus::CostingPending => "Costing Pending",
            ProjectStatus::CostingReceived => "Costing Received",
            ProjectStatus::Prototype => "Prototype",
            ProjectStatus::RedSeal => "Red Seal",
            ProjectStatus::GreenSeal => "Green Seal",
            ProjectStatus::FinalApproved => "Final Approved",
            ProjectStatus::PoIssued => "PO Issued",
        }
    }

    /// 从字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s.trim())
    }

    /// 是否为终态（已定型 / 已下单）
    pub fn is_terminal(&self) -> bool {
        match self {
            ProjectStatus::FinalApproved | ProjectStatus::PoIssued => true,
            ProjectStatus::IdeaSubmitted
            | ProjectStatus::CostingPending
            | ProjectStatus::CostingReceived
            | ProjectStatus::Prototype
            | ProjectStatus::RedSeal
            | ProjectStatus::GreenSeal => false,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 库存流水方向 (Transaction Direction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionDirection {
    #[serde(rename = "Stock In")]
    StockIn, // 入库
    #[serde(rename = "Stock Out")]
    StockOut, // 出库
}

impl TransactionDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionDirection::StockIn => "Stock In",
            TransactionDirection::StockOut => "Stock Out",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Stock In" => Some(TransactionDirection::StockIn),
            "Stock Out" => Some(TransactionDirection::StockOut),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 基础资料类型 (Reference Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceKind {
    Plant, // 工厂
    Unit,  // 计量单位
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Plant => "PLANT",
            ReferenceKind::Unit => "UNIT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "PLANT" => Some(ReferenceKind::Plant),
            "UNIT" => Some(ReferenceKind::Unit),
            _ => None,
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
