// ==========================================
// 测试数据构建器
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use mfg_erp::domain::production::{ProductionOrder, TrackedItem};

/// 生产订单构建器
pub struct OrderBuilder {
    order: ProductionOrder,
}

impl OrderBuilder {
    pub fn new(order_id: &str) -> Self {
        Self {
            order: ProductionOrder {
                order_id: order_id.to_string(),
                order_no: format!("NO-{}", order_id),
                product_name: "Steel Cabinet".to_string(),
                stage: "Cutting".to_string(),
                due_date: NaiveDate::from_ymd_opt(2026, 11, 30),
                target_quantity: 2000.0,
                items: Vec::new(),
            },
        }
    }

    pub fn target(mut self, target_quantity: f64) -> Self {
        self.order.target_quantity = target_quantity;
        self
    }

    pub fn item(mut self, identifier: &str, required: f64, completed: f64) -> Self {
        self.order.items.push(TrackedItem::new(
            identifier,
            format!("Part {}", identifier),
            required,
            completed,
            "pcs",
        ));
        self
    }

    pub fn item_with_pending(
        mut self,
        identifier: &str,
        required: f64,
        completed: f64,
        pending: f64,
    ) -> Self {
        self.order.items.push(
            TrackedItem::new(identifier, format!("Part {}", identifier), required, completed, "pcs")
                .with_pending(pending),
        );
        self
    }

    pub fn build(self) -> ProductionOrder {
        self.order
    }
}

/// 下料场景订单：A 已完成 1500，B 已完成 1000，目标 2000
pub fn cutting_order(order_id: &str) -> ProductionOrder {
    OrderBuilder::new(order_id)
        .target(2000.0)
        .item("A", 2000.0, 1500.0)
        .item("B", 2000.0, 1000.0)
        .build()
}
