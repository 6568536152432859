// ==========================================
// 制造业 ERP - 工序进度计算引擎
// ==========================================
// 职责: 最小可用量（瓶颈）产能计算
// 输入: ProductionOrder 快照 + 今日拟完成数量
// 输出: 可生产数量、瓶颈物料、提交后的订单
// 红线: 纯计算，不做 I/O；提交只作用于副本
// ==========================================

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::production::{ProductionOrder, TrackedItem};
use crate::engine::error::{EngineError, EngineResult, ValidationReason};

// ==========================================
// 输出结构
// ==========================================

/// 单个物料的进度行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProgress {
    pub identifier: String,
    pub name: String,
    pub unit_of_measure: String,
    pub required_quantity: f64,
    pub completed_quantity: f64,
    pub pending_quantity: f64,
    pub running_total: f64,
    pub remaining: f64,
    pub completion_ratio: f64, // [0, 1]
    pub is_bottleneck: bool,
}

/// 订单进度汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub order_id: String,
    pub target_quantity: f64,
    pub producible_quantity: f64,
    pub shortfall: f64,         // max(target - producible, 0)
    pub can_meet_target: bool,
    pub overall_ratio: f64,     // min(producible / target, 1)
    pub items: Vec<ItemProgress>,
}

/// 提交结果
#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub order: ProductionOrder,
    pub producible_quantity: f64,
}

// ==========================================
// StageProgressCalculator - 工序进度计算引擎
// ==========================================
#[derive(Debug, Default)]
pub struct StageProgressCalculator {
    // 无状态引擎
}

impl StageProgressCalculator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 单物料计算
    // ==========================================

    /// 累计量 = 已完成 + 今日拟完成
    pub fn running_total(&self, item: &TrackedItem) -> f64 {
        item.completed_quantity + item.pending_quantity
    }

    /// 剩余量，永不为负
    pub fn remaining(&self, item: &TrackedItem) -> f64 {
        (item.required_quantity - self.running_total(item)).max(0.0)
    }

    /// 完成比例 [0, 1]
    ///
    /// required_quantity 为 0 时视为已满足，返回 1.0
    pub fn completion_ratio(&self, item: &TrackedItem) -> f64 {
        if item.required_quantity <= 0.0 {
            return 1.0;
        }
        (self.running_total(item) / item.required_quantity).clamp(0.0, 1.0)
    }

    // ==========================================
    // 订单级计算
    // ==========================================

    /// 可生产数量 = 所有物料累计量的最小值（BOM 约束）
    ///
    /// # 错误
    /// - EngineError::EmptyOrder: 订单没有物料明细
    pub fn producible_quantity(&self, order: &ProductionOrder) -> EngineResult<f64> {
        order
            .items
            .iter()
            .map(|item| self.running_total(item))
            .reduce(f64::min)
            .ok_or_else(|| EngineError::EmptyOrder {
                order_id: order.order_id.clone(),
            })
    }

    /// 是否满足订单目标
    pub fn can_meet_target(&self, order: &ProductionOrder) -> EngineResult<bool> {
        Ok(self.producible_quantity(order)? >= order.target_quantity)
    }

    /// 瓶颈物料
    ///
    /// 仅当可生产数量低于目标时才有瓶颈；并列时全部返回，保持订单内顺序
    pub fn bottleneck_items<'a>(
        &self,
        order: &'a ProductionOrder,
    ) -> EngineResult<Vec<&'a TrackedItem>> {
        let producible = self.producible_quantity(order)?;
        if producible >= order.target_quantity {
            return Ok(Vec::new());
        }

        Ok(order
            .items
            .iter()
            .filter(|item| self.running_total(item) == producible)
            .collect())
    }

    /// 订单进度汇总（弹窗展示用）
    #[instrument(skip(self, order), fields(order_id = %order.order_id, items = order.items.len()))]
    pub fn summarize(&self, order: &ProductionOrder) -> EngineResult<ProgressReport> {
        let producible = self.producible_quantity(order)?;
        let bottleneck_ids: HashSet<&str> = self
            .bottleneck_items(order)?
            .into_iter()
            .map(|item| item.identifier.as_str())
            .collect();

        let items = order
            .items
            .iter()
            .map(|item| ItemProgress {
                identifier: item.identifier.clone(),
                name: item.name.clone(),
                unit_of_measure: item.unit_of_measure.clone(),
                required_quantity: item.required_quantity,
                completed_quantity: item.completed_quantity,
                pending_quantity: item.pending_quantity,
                running_total: self.running_total(item),
                remaining: self.remaining(item),
                completion_ratio: self.completion_ratio(item),
                is_bottleneck: bottleneck_ids.contains(item.identifier.as_str()),
            })
            .collect();

        let overall_ratio = if order.target_quantity > 0.0 {
            (producible / order.target_quantity).clamp(0.0, 1.0)
        } else {
            1.0
        };

        debug!(producible, bottlenecks = bottleneck_ids.len(), "进度汇总完成");

        Ok(ProgressReport {
            order_id: order.order_id.clone(),
            target_quantity: order.target_quantity,
            producible_quantity: producible,
            shortfall: (order.target_quantity - producible).max(0.0),
            can_meet_target: producible >= order.target_quantity,
            overall_ratio,
            items,
        })
    }

    /// 校验订单快照本身（目标、数量、标识）
    pub fn validate_order(&self, order: &ProductionOrder) -> EngineResult<()> {
        if !order.target_quantity.is_finite() || order.target_quantity <= 0.0 {
            return Err(ValidationReason::InvalidTarget.into());
        }

        let mut seen = HashSet::new();
        for item in &order.items {
            if item.identifier.trim().is_empty() {
                return Err(ValidationReason::EmptyField {
                    field: "identifier".to_string(),
                }
                .into());
            }
            if !seen.insert(item.identifier.as_str()) {
                return Err(ValidationReason::DuplicateItem {
                    identifier: item.identifier.clone(),
                }
                .into());
            }
            for (field, value) in [
                ("required_quantity", item.required_quantity),
                ("completed_quantity", item.completed_quantity),
                ("pending_quantity", item.pending_quantity),
            ] {
                check_quantity(&format!("{}.{}", item.identifier, field), value)?;
            }
        }
        Ok(())
    }

    // ==========================================
    // 提交
    // ==========================================

    /// 提交今日数量：completed += pending，pending = 0（全部物料同时生效）
    ///
    /// # 参数
    /// - order: 订单快照（不会被修改）
    /// - pending_by_item: 物料标识 → 今日数量；未出现的物料沿用自身 pending_quantity
    ///
    /// # 错误
    /// - EmptyOrder: 订单没有物料明细
    /// - Validation(NegativeQuantity / InvalidNumber): 数量非法
    /// - UnknownItem: 标识不在订单内
    /// - Validation(NoQuantityEntered): 所有今日数量均为 0
    #[instrument(skip(self, order, pending_by_item), fields(order_id = %order.order_id))]
    pub fn commit(
        &self,
        order: &ProductionOrder,
        pending_by_item: &HashMap<String, f64>,
    ) -> EngineResult<CommitOutcome> {
        if order.items.is_empty() {
            return Err(EngineError::EmptyOrder {
                order_id: order.order_id.clone(),
            });
        }

        for (identifier, &quantity) in pending_by_item {
            if order.find_item(identifier).is_none() {
                return Err(EngineError::UnknownItem {
                    identifier: identifier.clone(),
                });
            }
            check_quantity(identifier, quantity)?;
        }

        let pendings: Vec<f64> = order
            .items
            .iter()
            .map(|item| {
                pending_by_item
                    .get(&item.identifier)
                    .copied()
                    .unwrap_or(item.pending_quantity)
            })
            .collect();

        for (item, pending) in order.items.iter().zip(&pendings) {
            check_quantity(&item.identifier, *pending)?;
        }

        if pendings.iter().all(|pending| *pending == 0.0) {
            return Err(ValidationReason::NoQuantityEntered.into());
        }

        let mut updated = order.clone();
        for (item, pending) in updated.items.iter_mut().zip(pendings) {
            item.completed_quantity += pending;
            item.pending_quantity = 0.0;
        }

        let producible_quantity = self.producible_quantity(&updated)?;
        debug!(producible_quantity, "进度提交计算完成");

        Ok(CommitOutcome {
            order: updated,
            producible_quantity,
        })
    }
}

/// 数量必须为有限非负数
fn check_quantity(field: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(ValidationReason::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        }
        .into());
    }
    if value < 0.0 {
        return Err(ValidationReason::NegativeQuantity {
            field: field.to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn create_test_order(items: Vec<TrackedItem>, target: f64) -> ProductionOrder {
        ProductionOrder {
            order_id: "PO-001".to_string(),
            order_no: "WO-2026-001".to_string(),
            product_name: "Gasket".to_string(),
            stage: "Cutting".to_string(),
            due_date: None,
            target_quantity: target,
            items,
        }
    }

    /// 场景1 的物料：A 1500/2000，B 1000/2000
    fn scenario_items() -> Vec<TrackedItem> {
        vec![
            TrackedItem::new("A", "Rubber sheet", 2000.0, 1500.0, "pcs"),
            TrackedItem::new("B", "Steel ring", 2000.0, 1000.0, "pcs"),
        ]
    }

    #[test]
    fn test_running_total_and_remaining() {
        let calc = StageProgressCalculator::new();
        let item = TrackedItem::new("A", "Rubber sheet", 2000.0, 1500.0, "pcs").with_pending(200.0);

        assert_eq!(calc.running_total(&item), 1700.0);
        assert_eq!(calc.remaining(&item), 300.0);

        let over = item.clone().with_pending(900.0);
        assert_eq!(calc.running_total(&over), 2400.0);
        assert_eq!(calc.remaining(&over), 0.0);
    }

    #[test]
    fn test_running_total_monotonic_in_pending() {
        let calc = StageProgressCalculator::new();
        let base = TrackedItem::new("A", "Rubber sheet", 100.0, 10.0, "pcs");
        let mut last = calc.running_total(&base);
        for pending in [0.0, 1.0, 5.5, 40.0, 500.0] {
            let total = calc.running_total(&base.clone().with_pending(pending));
            assert!(total >= last);
            last = total;
        }
    }

    #[test]
    fn test_completion_ratio_clipped_and_zero_required() {
        let calc = StageProgressCalculator::new();
        let half = TrackedItem::new("A", "a", 200.0, 100.0, "pcs");
        assert_eq!(calc.completion_ratio(&half), 0.5);

        let over = TrackedItem::new("B", "b", 100.0, 150.0, "pcs");
        assert_eq!(calc.completion_ratio(&over), 1.0);

        let nothing_required = TrackedItem::new("C", "c", 0.0, 0.0, "pcs");
        assert_eq!(calc.completion_ratio(&nothing_required), 1.0);
    }

    #[test]
    fn test_scenario_1_bottleneck_below_target() {
        let calc = StageProgressCalculator::new();
        let order = create_test_order(scenario_items(), 2000.0);

        assert_eq!(calc.producible_quantity(&order).unwrap(), 1000.0);
        assert!(!calc.can_meet_target(&order).unwrap());

        let bottlenecks = calc.bottleneck_items(&order).unwrap();
        assert_eq!(bottlenecks.len(), 1);
        assert_eq!(bottlenecks[0].identifier, "B");
    }

    #[test]
    fn test_scenario_2_target_met_no_bottleneck() {
        let calc = StageProgressCalculator::new();
        let mut items = scenario_items();
        items[0].pending_quantity = 500.0;
        items[1].pending_quantity = 1000.0;
        let order = create_test_order(items, 2000.0);

        assert_eq!(calc.running_total(&order.items[0]), 2000.0);
        assert_eq!(calc.running_total(&order.items[1]), 2000.0);
        assert_eq!(calc.producible_quantity(&order).unwrap(), 2000.0);
        assert!(calc.can_meet_target(&order).unwrap());
        assert!(calc.bottleneck_items(&order).unwrap().is_empty());
    }

    #[test]
    fn test_bottleneck_ties_all_reported() {
        let calc = StageProgressCalculator::new();
        let order = create_test_order(
            vec![
                TrackedItem::new("A", "a", 100.0, 40.0, "pcs"),
                TrackedItem::new("B", "b", 100.0, 70.0, "pcs"),
                TrackedItem::new("C", "c", 100.0, 40.0, "pcs"),
            ],
            100.0,
        );

        let ids: Vec<_> = calc
            .bottleneck_items(&order)
            .unwrap()
            .into_iter()
            .map(|i| i.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn test_producible_is_lower_bound_of_every_item() {
        let calc = StageProgressCalculator::new();
        let order = create_test_order(
            vec![
                TrackedItem::new("A", "a", 10.0, 3.0, "kg").with_pending(2.5),
                TrackedItem::new("B", "b", 10.0, 9.0, "kg"),
                TrackedItem::new("C", "c", 10.0, 0.0, "kg").with_pending(7.0),
            ],
            10.0,
        );
        let producible = calc.producible_quantity(&order).unwrap();
        assert_eq!(producible, 5.5);
        for item in &order.items {
            assert!(calc.running_total(item) >= producible);
        }
        assert_eq!(
            calc.can_meet_target(&order).unwrap(),
            producible >= order.target_quantity
        );
    }

    #[test]
    fn test_scenario_6_empty_order_is_configuration_error() {
        let calc = StageProgressCalculator::new();
        let order = create_test_order(Vec::new(), 10.0);

        assert_eq!(
            calc.producible_quantity(&order),
            Err(EngineError::EmptyOrder {
                order_id: "PO-001".to_string()
            })
        );
        assert!(calc.can_meet_target(&order).is_err());
        assert!(calc.bottleneck_items(&order).is_err());
        assert!(calc.summarize(&order).is_err());
    }

    #[test]
    fn test_commit_empty_order_is_configuration_error() {
        let calc = StageProgressCalculator::new();
        let order = create_test_order(Vec::new(), 10.0);

        let result = calc.commit(&order, &HashMap::new());

        assert_eq!(
            result,
            Err(EngineError::EmptyOrder {
                order_id: "PO-001".to_string()
            })
        );
    }

    #[test]
    fn test_scenario_3_commit_folds_pending() {
        let calc = StageProgressCalculator::new();
        let order = create_test_order(scenario_items(), 2000.0);
        let pending = HashMap::from([("A".to_string(), 500.0), ("B".to_string(), 1000.0)]);

        let outcome = calc.commit(&order, &pending).unwrap();

        assert_eq!(outcome.producible_quantity, 2000.0);
        for item in &outcome.order.items {
            assert_eq!(item.completed_quantity, 2000.0);
            assert_eq!(item.pending_quantity, 0.0);
        }
        // 原快照保持不变
        assert_eq!(order.items[0].completed_quantity, 1500.0);
    }

    #[test]
    fn test_commit_preserves_running_totals() {
        let calc = StageProgressCalculator::new();
        let mut items = scenario_items();
        items[1].pending_quantity = 250.0;
        let order = create_test_order(items, 2000.0);
        let pending = HashMap::from([("A".to_string(), 30.0)]);

        let before: Vec<f64> = order
            .items
            .iter()
            .map(|item| {
                item.completed_quantity
                    + pending.get(&item.identifier).copied().unwrap_or(item.pending_quantity)
            })
            .collect();

        let outcome = calc.commit(&order, &pending).unwrap();
        let after: Vec<f64> = outcome
            .order
            .items
            .iter()
            .map(|item| item.completed_quantity)
            .collect();
        assert_eq!(before, after);
        assert!(!outcome.order.has_pending());
    }

    #[test]
    fn test_commit_all_zero_rejected_and_order_unchanged() {
        let calc = StageProgressCalculator::new();
        let order = create_test_order(scenario_items(), 2000.0);
        let snapshot = serde_json::to_vec(&order).unwrap();
        let pending = HashMap::from([("A".to_string(), 0.0)]);

        let result = calc.commit(&order, &pending);

        assert_eq!(
            result,
            Err(EngineError::Validation(ValidationReason::NoQuantityEntered))
        );
        assert_eq!(serde_json::to_vec(&order).unwrap(), snapshot);
    }

    #[test]
    fn test_commit_rejects_negative_and_unknown() {
        let calc = StageProgressCalculator::new();
        let order = create_test_order(scenario_items(), 2000.0);

        let negative = HashMap::from([("A".to_string(), -1.0)]);
        assert!(matches!(
            calc.commit(&order, &negative),
            Err(EngineError::Validation(ValidationReason::NegativeQuantity { .. }))
        ));

        let unknown = HashMap::from([("Z".to_string(), 5.0)]);
        assert_eq!(
            calc.commit(&order, &unknown),
            Err(EngineError::UnknownItem {
                identifier: "Z".to_string()
            })
        );

        let nan = HashMap::from([("B".to_string(), f64::NAN)]);
        assert!(matches!(
            calc.commit(&order, &nan),
            Err(EngineError::Validation(ValidationReason::InvalidNumber { .. }))
        ));
    }

    #[test]
    fn test_summarize_report() {
        let calc = StageProgressCalculator::new();
        let order = create_test_order(scenario_items(), 2000.0);

        let report = calc.summarize(&order).unwrap();

        assert_eq!(report.producible_quantity, 1000.0);
        assert_eq!(report.shortfall, 1000.0);
        assert!(!report.can_meet_target);
        assert_eq!(report.overall_ratio, 0.5);
        assert!(!report.items[0].is_bottleneck);
        assert!(report.items[1].is_bottleneck);
        assert_eq!(report.items[0].completion_ratio, 0.75);
        assert_eq!(report.items[1].remaining, 1000.0);
    }

    #[test]
    fn test_validate_order() {
        let calc = StageProgressCalculator::new();
        assert!(calc.validate_order(&create_test_order(scenario_items(), 2000.0)).is_ok());

        assert_eq!(
            calc.validate_order(&create_test_order(scenario_items(), 0.0)),
            Err(EngineError::Validation(ValidationReason::InvalidTarget))
        );

        let mut dup = scenario_items();
        dup[1].identifier = "A".to_string();
        assert!(matches!(
            calc.validate_order(&create_test_order(dup, 10.0)),
            Err(EngineError::Validation(ValidationReason::DuplicateItem { .. }))
        ));

        let mut negative = scenario_items();
        negative[0].completed_quantity = -3.0;
        assert!(matches!(
            calc.validate_order(&create_test_order(negative, 10.0)),
            Err(EngineError::Validation(ValidationReason::NegativeQuantity { .. }))
        ));
    }
}
