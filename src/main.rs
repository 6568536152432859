// ==========================================
// 制造业 ERP - 命令行入口
// ==========================================
// 用法: mfg-erp [--db <path>] [stock.csv ...]
// 行为: 初始化数据库 → 导入给定 CSV → 输出看板与低库存摘要
// ==========================================

use anyhow::{anyhow, Context, Result};
use mfg_erp::app::{get_default_db_path, AppState};
use mfg_erp::importer::StockImporter;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    mfg_erp::logging::init();

    info!("==================================================");
    info!("{} v{}", mfg_erp::APP_NAME, mfg_erp::VERSION);
    info!("==================================================");

    let (db_path, csv_paths) = parse_args(std::env::args().skip(1))?;
    info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    if !csv_paths.is_empty() {
        let runtime = tokio::runtime::Runtime::new().context("无法创建 tokio 运行时")?;
        let results = runtime.block_on(state.stock_importer.batch_import(csv_paths.clone()));
        for (path, result) in csv_paths.iter().zip(results) {
            match result {
                Ok(summary) => {
                    info!(
                        file = %path,
                        imported = summary.imported,
                        rejected = summary.rejected.len(),
                        "导入完成"
                    );
                    for rejection in &summary.rejected {
                        warn!(file = %path, row = rejection.row, reason = %rejection.reason, "行被拒绝");
                    }
                }
                Err(e) => error!(file = %path, error = %e, "导入失败"),
            }
        }
    }

    let dashboard = state.pipeline_api.get_dashboard()?;
    info!(
        total = dashboard.metrics.total,
        live = dashboard.metrics.live,
        closed = dashboard.metrics.closed,
        success_rate = %dashboard.success_rate_display,
        "研发看板"
    );

    let low_stock = state.inventory_api.list_low_stock()?;
    info!(count = low_stock.len(), "低于安全库存物料");
    for item in &low_stock {
        info!(item_code = %item.item_code, current = item.current_stock, min = item.min_stock, "低库存");
    }

    let orders = state
        .order_repo
        .list_order_ids()
        .context("读取生产订单失败")?;
    info!(count = orders.len(), "生产订单");

    Ok(())
}

/// 解析命令行参数
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(String, Vec<String>)> {
    let mut db_path = None;
    let mut csv_paths = Vec::new();
    while let Some(arg) = args.next() {
        if arg == "--db" {
            db_path = Some(args.next().ok_or_else(|| anyhow!("--db 需要指定路径"))?);
        } else {
            csv_paths.push(arg);
        }
    }
    Ok((db_path.unwrap_or_else(get_default_db_path), csv_paths))
}
