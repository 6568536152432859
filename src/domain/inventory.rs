// ==========================================
// 制造业 ERP - 库存领域模型
// ==========================================
// 用途: 库存调整表单、出入库流水
// 红线: 流水只追加，不修改不删除
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::TransactionDirection;

// ==========================================
// StockItem - 库存物料
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub item_id: String,
    pub item_code: String,        // 物料编码（导入时的业务主键）
    pub name: String,
    pub unit: String,
    pub plant: Option<String>,    // 所属工厂
    pub current_stock: f64,       // 当前库存 (>= 0)
    pub min_stock: f64,           // 安全库存
    pub updated_at: NaiveDateTime,
}

// ==========================================
// StockReference - 单据参考信息
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockReference {
    pub bill_no: Option<String>,  // 单据号
    pub vendor: Option<String>,   // 供应商
    pub remarks: Option<String>,  // 备注
}

// ==========================================
// StockMovement - 库存变动（引擎输出，尚未落库）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub direction: TransactionDirection,
    pub quantity: f64,
    pub previous_stock: f64,
    pub new_stock: f64,
    pub reference: StockReference,
}

// ==========================================
// StockTransaction - 出入库流水
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTransaction {
    pub transaction_id: String,
    pub item_id: String,
    pub direction: TransactionDirection,
    pub quantity: f64,
    pub previous_stock: f64,
    pub new_stock: f64,
    pub reference: StockReference,
    pub actor: String,
    pub transaction_date: NaiveDateTime,
}

impl StockTransaction {
    /// 由引擎输出的库存变动生成流水
    pub fn from_movement(
        transaction_id: String,
        item_id: String,
        movement: StockMovement,
        actor: String,
        transaction_date: NaiveDateTime,
    ) -> Self {
        Self {
            transaction_id,
            item_id,
            direction: movement.direction,
            quantity: movement.quantity,
            previous_stock: movement.previous_stock,
            new_stock: movement.new_stock,
            reference: movement.reference,
            actor,
            transaction_date,
        }
    }
}
