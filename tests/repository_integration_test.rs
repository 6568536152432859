// ==========================================
// Repository 集成测试
// ==========================================
// 测试范围: 订单读写、提交事务回滚、库存流水只追加
// ==========================================

mod helpers;
mod test_helpers;

use chrono::NaiveDate;
use helpers::test_data_builder::{cutting_order, OrderBuilder};
use mfg_erp::domain::inventory::{StockItem, StockReference, StockTransaction};
use mfg_erp::domain::types::TransactionDirection;
use mfg_erp::repository::{
    ProductionOrderRepository, ProductionOrderStore, RepositoryError, StockRepository, StockStore,
};
use test_helpers::{create_test_db, open_shared_connection};

fn ts(day: u32, hour: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

#[test]
fn test_order_读写保持物料顺序() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = ProductionOrderRepository::new(open_shared_connection(&db_path).unwrap());
    let order = OrderBuilder::new("PO-7")
        .target(50.0)
        .item("Z", 50.0, 10.0)
        .item_with_pending("A", 100.0, 20.0, 5.0)
        .item("M", 25.0, 25.0)
        .build();

    repo.insert_order(&order).unwrap();

    let loaded = repo.get_order("PO-7").unwrap();
    assert_eq!(loaded, order);
    assert_eq!(repo.list_order_ids().unwrap(), vec!["PO-7".to_string()]);
}

#[test]
fn test_get_order_不存在() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = ProductionOrderRepository::new(open_shared_connection(&db_path).unwrap());

    let result = repo.get_order("PO-404");

    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}

#[test]
fn test_commit_order_任一物料失败整体回滚() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = ProductionOrderRepository::new(open_shared_connection(&db_path).unwrap());
    let original = cutting_order("PO-1");
    repo.insert_order(&original).unwrap();

    // A 可更新，X 不在订单内
    let mut updated = original.clone();
    updated.items[0].completed_quantity = 2000.0;
    updated.items[1].identifier = "X".to_string();

    let result = repo.commit_order("PO-1", &updated);

    assert!(matches!(result, Err(RepositoryError::WriteRejected { .. })));
    assert_eq!(repo.get_order("PO-1").unwrap(), original);
}

#[test]
fn test_commit_order_订单不存在被拒绝() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = ProductionOrderRepository::new(open_shared_connection(&db_path).unwrap());

    let result = repo.commit_order("PO-404", &cutting_order("PO-404"));

    assert!(matches!(
        result,
        Err(RepositoryError::WriteRejected { ref entity, .. }) if entity == "ProductionOrder"
    ));
}

#[test]
fn test_stock_流水按交易时间排序() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = StockRepository::new(open_shared_connection(&db_path).unwrap());
    let item = StockItem {
        item_id: "I-1".to_string(),
        item_code: "CU-1".to_string(),
        name: "Copper coil".to_string(),
        unit: "kg".to_string(),
        plant: None,
        current_stock: 10.0,
        min_stock: 0.0,
        updated_at: ts(1, 8),
    };
    repo.insert_item(&item).unwrap();

    let txn = |id: &str, day: u32, previous: f64, new: f64| StockTransaction {
        transaction_id: id.to_string(),
        item_id: "I-1".to_string(),
        direction: TransactionDirection::StockIn,
        quantity: new - previous,
        previous_stock: previous,
        new_stock: new,
        reference: StockReference::default(),
        actor: "system".to_string(),
        transaction_date: ts(day, 9),
    };

    // 后发生的先写入
    repo.apply_movement(&txn("T-2", 3, 10.0, 30.0)).unwrap();
    repo.record_transaction(&txn("T-1", 2, 0.0, 10.0)).unwrap();

    let ids: Vec<String> = repo
        .get_transactions_for_item("I-1")
        .unwrap()
        .into_iter()
        .map(|t| t.transaction_id)
        .collect();
    assert_eq!(ids, vec!["T-1".to_string(), "T-2".to_string()]);
    assert_eq!(repo.get_item("I-1").unwrap().current_stock, 30.0);
}

#[test]
fn test_apply_movement_物料不存在不写流水() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = StockRepository::new(open_shared_connection(&db_path).unwrap());
    let txn = StockTransaction {
        transaction_id: "T-9".to_string(),
        item_id: "ghost".to_string(),
        direction: TransactionDirection::StockOut,
        quantity: 1.0,
        previous_stock: 1.0,
        new_stock: 0.0,
        reference: StockReference::default(),
        actor: "system".to_string(),
        transaction_date: ts(5, 9),
    };

    let result = repo.apply_movement(&txn);

    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    assert!(repo.get_transactions_for_item("ghost").unwrap().is_empty());
}

#[test]
fn test_apply_movement_库存已变更被拒绝() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = StockRepository::new(open_shared_connection(&db_path).unwrap());
    repo.insert_item(&StockItem {
        item_id: "I-2".to_string(),
        item_code: "AL-2".to_string(),
        name: "Aluminium bar".to_string(),
        unit: "kg".to_string(),
        plant: None,
        current_stock: 500.0,
        min_stock: 0.0,
        updated_at: ts(1, 8),
    })
    .unwrap();

    // 两次出库都基于 500 计算，第二次落库时库存已是 200
    let stock_out = |id: &str| StockTransaction {
        transaction_id: id.to_string(),
        item_id: "I-2".to_string(),
        direction: TransactionDirection::StockOut,
        quantity: 300.0,
        previous_stock: 500.0,
        new_stock: 200.0,
        reference: StockReference::default(),
        actor: "system".to_string(),
        transaction_date: ts(6, 9),
    };
    repo.apply_movement(&stock_out("T-A")).unwrap();

    let result = repo.apply_movement(&stock_out("T-B"));

    assert!(matches!(result, Err(RepositoryError::WriteRejected { .. })));
    assert_eq!(repo.get_item("I-2").unwrap().current_stock, 200.0);
    assert_eq!(repo.get_transactions_for_item("I-2").unwrap().len(), 1);
}
