// ==========================================
// 制造业 ERP - 库存调整引擎
// ==========================================
// 职责: 入库/出库算术 + 校验，产出库存变动记录
// 红线: 出库不得超过当前库存；入库与出库二选一
// ==========================================

use crate::domain::inventory::{StockItem, StockMovement, StockReference};
use crate::domain::types::TransactionDirection;
use crate::engine::error::{EngineResult, ValidationReason};

// ==========================================
// StockAdjuster - 库存调整引擎
// ==========================================
#[derive(Debug, Default)]
pub struct StockAdjuster {
    // 无状态引擎
}

impl StockAdjuster {
    pub fn new() -> Self {
        Self {}
    }

    /// 应用一次库存调整
    ///
    /// # 参数
    /// - current_stock: 当前库存
    /// - add_amount: 入库数量（与 remove_amount 二选一）
    /// - remove_amount: 出库数量（与 add_amount 二选一）
    /// - reference: 单据号 / 供应商 / 备注
    ///
    /// # 返回
    /// - Ok(StockMovement): 新库存及流水要素
    /// - Err(Validation): 同时填写/均未填写、数量非法、库存不足
    pub fn apply_adjustment(
        &self,
        current_stock: f64,
        add_amount: Option<f64>,
        remove_amount: Option<f64>,
        reference: StockReference,
    ) -> EngineResult<StockMovement> {
        let (direction, quantity) = match (add_amount, remove_amount) {
            (Some(_), Some(_)) => return Err(ValidationReason::AmountConflict.into()),
            (None, None) => return Err(ValidationReason::AmountMissing.into()),
            (Some(add), None) => (TransactionDirection::StockIn, add),
            (None, Some(remove)) => (TransactionDirection::StockOut, remove),
        };

        let field = match direction {
            TransactionDirection::StockIn => "add_amount",
            TransactionDirection::StockOut => "remove_amount",
        };
        if !quantity.is_finite() {
            return Err(ValidationReason::InvalidNumber {
                field: field.to_string(),
                value: quantity.to_string(),
            }
            .into());
        }
        if quantity < 0.0 {
            return Err(ValidationReason::NegativeQuantity {
                field: field.to_string(),
            }
            .into());
        }

        let new_stock = match direction {
            TransactionDirection::StockIn => current_stock + quantity,
            TransactionDirection::StockOut => {
                if quantity > current_stock {
                    return Err(ValidationReason::InsufficientStock {
                        requested: quantity,
                        available: current_stock,
                    }
                    .into());
                }
                current_stock - quantity
            }
        };

        Ok(StockMovement {
            direction,
            quantity,
            previous_stock: current_stock,
            new_stock,
            reference,
        })
    }

    /// 低于安全库存
    pub fn is_below_minimum(&self, item: &StockItem) -> bool {
        item.current_stock < item.min_stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::EngineError;

    #[test]
    fn test_scenario_5_stock_in() {
        let adjuster = StockAdjuster::new();
        let reference = StockReference {
            bill_no: Some("GRN-778".to_string()),
            vendor: Some("Acme Metals".to_string()),
            remarks: None,
        };

        let movement = adjuster
            .apply_adjustment(500.0, Some(200.0), None, reference.clone())
            .unwrap();

        assert_eq!(movement.new_stock, 700.0);
        assert_eq!(movement.previous_stock, 500.0);
        assert_eq!(movement.direction, TransactionDirection::StockIn);
        assert_eq!(movement.direction.as_str(), "Stock In");
        assert_eq!(movement.reference, reference);
    }

    #[test]
    fn test_scenario_4_insufficient_stock() {
        let adjuster = StockAdjuster::new();

        let result = adjuster.apply_adjustment(500.0, None, Some(600.0), StockReference::default());

        assert_eq!(
            result,
            Err(EngineError::Validation(ValidationReason::InsufficientStock {
                requested: 600.0,
                available: 500.0,
            }))
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "校验失败: insufficient stock"
        );
    }

    #[test]
    fn test_stock_out_down_to_zero() {
        let adjuster = StockAdjuster::new();
        let movement = adjuster
            .apply_adjustment(500.0, None, Some(500.0), StockReference::default())
            .unwrap();
        assert_eq!(movement.new_stock, 0.0);
        assert_eq!(movement.direction, TransactionDirection::StockOut);
    }

    #[test]
    fn test_exactly_one_amount_required() {
        let adjuster = StockAdjuster::new();
        assert_eq!(
            adjuster.apply_adjustment(10.0, Some(1.0), Some(1.0), StockReference::default()),
            Err(EngineError::Validation(ValidationReason::AmountConflict))
        );
        assert_eq!(
            adjuster.apply_adjustment(10.0, None, None, StockReference::default()),
            Err(EngineError::Validation(ValidationReason::AmountMissing))
        );
    }

    #[test]
    fn test_negative_amount_rejected() {
        let adjuster = StockAdjuster::new();
        assert!(matches!(
            adjuster.apply_adjustment(10.0, Some(-5.0), None, StockReference::default()),
            Err(EngineError::Validation(ValidationReason::NegativeQuantity { .. }))
        ));
    }

    #[test]
    fn test_zero_amount_is_accepted() {
        let adjuster = StockAdjuster::new();
        let movement = adjuster
            .apply_adjustment(10.0, Some(0.0), None, StockReference::default())
            .unwrap();
        assert_eq!(movement.new_stock, 10.0);
    }
}
