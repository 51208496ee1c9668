//! 每日原料需求示例
//!
//! 用法：`cargo run --example daily_needs -- [state.json] [YYYY-MM-DD]`
//! 未指定狀態檔時使用內建示範資料。

use anyhow::Context;
use chrono::NaiveDate;
use plant::plant_calc::report::{deficit_rows, kfc_overview, schnitzel_breakdown};
use plant::plant_core::persistence::load_state_file;
use plant::plant_core::*;
use plant::{BalanceCalculator, NeedsResolver, NeedsScope};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).with_line_number(true).init();
}

fn demo_state(date: NaiveDate) -> AppState {
    let kg = |v: i64| Decimal::from(v);
    let mut state = AppState::seed()
        .with_material(
            RawMaterial::new("RIZKY-BBQ", "Řízky BBQ").with_kind(MaterialKind::Product {
                base_id: "RIZKY".to_string(),
                marinade_percent: kg(15),
                loss_percent: kg(5),
            }),
        )
        .with_material(RawMaterial::new("BURGER-MIX", "Burger mix").with_kind(MaterialKind::Mix {
            components: vec![
                MixComponent::new("STEAK", kg(60)),
                MixComponent::new("STEHNA", kg(40)),
            ],
        }))
        .with_customer(Customer::new("BILLA", "Billa"))
        .with_customer(Customer::new("LIDL", "Lidl"))
        .with_order(
            Order::new("BILLA", date)
                .with_item(OrderItem::new("RIZKY", 40, PackagingType::VL))
                .with_item(OrderItem::new("RIZKY-BBQ", 25, PackagingType::RB)),
        )
        .with_order(Order::new("LIDL", date).with_item(OrderItem::new("BURGER-MIX", 60, PackagingType::OA)));

    state
        .box_weights
        .upsert(BoxWeight::new("BILLA", "RIZKY-BBQ").with_grams(PackagingType::RB, kg(4000)));
    state.kfc_products = vec![KfcProduct::new("K-STRIPS", "Strips", kg(10))
        .with_raw_material("RIZKY")
        .with_yield_percent(kg(80))];
    state.kfc_orders = vec![KfcOrder::new(date, "K-STRIPS", 30).with_produced(10)];
    state.spiz_orders = vec![SpizOrder::new(date, kg(120))];
    for (id, pallets) in [("RIZKY", 1), ("STEHNA", 2), ("STEAK", 0)] {
        if let Some(material) = state.material_mut(id) {
            material.stock = StockLevel::new(kg(pallets));
        }
    }
    state
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let path = args.next();
    let date = match args.next() {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").with_context(|| format!("日期格式錯誤: {}", raw))?,
        None => NaiveDate::from_ymd_opt(2025, 11, 3).context("無效的示範日期")?,
    };

    let state = match path {
        Some(path) => load_state_file(&path).with_context(|| format!("無法載入狀態檔 {}", path))?,
        None => demo_state(date),
    };

    let resolver = NeedsResolver::new(&state);
    let report = resolver.compute_daily_needs(date, NeedsScope::All);

    println!("=== {} 原料需求 ===\n", date);
    let balances = BalanceCalculator::calculate(&state, &report);
    for balance in &balances {
        println!(
            "  {:<20} 需求 {:>10} kg  庫存 {:>10} kg  差額 {:>10} kg",
            balance.name,
            balance.required_kg.round_dp(2),
            balance.on_hand_kg.round_dp(2),
            balance.balance_kg.round_dp(2)
        );
    }

    let deficits = deficit_rows(&balances);
    if !deficits.is_empty() {
        println!("\n缺料:");
        for row in &deficits {
            match row.missing_pallets {
                Some(pallets) => println!("  - {}: {} kg（約 {} 棧板）", row.name, row.missing_kg.round_dp(2), pallets),
                None => println!("  - {}: {} kg", row.name, row.missing_kg.round_dp(2)),
            }
        }
    }

    if let Some(breakdown) = schnitzel_breakdown(&state, &report) {
        println!("\nřízky 明細（共 {} kg）:", breakdown.total_kg.round_dp(2));
        for (source, kg) in &breakdown.by_source {
            println!("  - {}: {} kg", source, kg.round_dp(2));
        }
    }

    let kfc = kfc_overview(&state, date);
    if !kfc.is_empty() {
        println!("\nKFC:");
        for row in &kfc {
            println!(
                "  - {}: 訂 {} 箱，已產 {} 箱，剩 {} 箱（{} kg）",
                row.name, row.ordered_boxes, row.produced_boxes, row.remaining_boxes, row.remaining_kg
            );
        }
    }

    let non_kfc = resolver.compute_daily_needs(date, NeedsScope::NonKfc);
    println!("\n不含 KFC 總需求: {} kg", non_kfc.total_kg().round_dp(2));

    for warning in &report.warnings {
        tracing::warn!("{}: {}", warning.subject, warning.message);
    }

    Ok(())
}
