// ==========================================
// 制造业 ERP - 生产订单领域模型
// ==========================================
// 用途: 工序进度（下料/裁切）弹窗的数据快照
// 红线: 订单与明细归仓储所有，引擎与视图只持有快照
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// TrackedItem - 跟踪物料
// ==========================================
// completed + pending 可以超过 required（超额完成合法，仅展示时截断）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub identifier: String,       // 订单内唯一键
    pub name: String,             // 展示名称
    pub required_quantity: f64,   // 满足订单目标所需数量
    pub completed_quantity: f64,  // 今日之前累计完成
    pub pending_quantity: f64,    // 今日拟完成（未提交）
    pub unit_of_measure: String,  // 计量单位
}

impl TrackedItem {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        required_quantity: f64,
        completed_quantity: f64,
        unit_of_measure: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            required_quantity,
            completed_quantity,
            pending_quantity: 0.0,
            unit_of_measure: unit_of_measure.into(),
        }
    }

    /// 设置今日拟完成数量（链式构造，测试与导入使用）
    pub fn with_pending(mut self, pending_quantity: f64) -> Self {
        self.pending_quantity = pending_quantity;
        self
    }
}

// ==========================================
// ProductionOrder - 生产订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrder {
    // ===== 标识 =====
    pub order_id: String,
    pub order_no: String,
    pub product_name: String,
    pub stage: String, // 工序名称，如 "Cutting"
    pub due_date: Option<NaiveDate>,

    // ===== 计算输入 =====
    pub target_quantity: f64,     // 成品目标数量 (> 0)
    pub items: Vec<TrackedItem>,  // 有序物料明细
}

impl ProductionOrder {
    /// 按标识查找物料
    pub fn find_item(&self, identifier: &str) -> Option<&TrackedItem> {
        self.items.iter().find(|item| item.identifier == identifier)
    }

    /// 是否存在未提交的今日数量
    pub fn has_pending(&self) -> bool {
        self.items.iter().any(|item| item.pending_quantity > 0.0)
    }
}
