//! 報表資料列（缺料、řízky 明細、KFC 生產概況）

use std::collections::BTreeMap;

use chrono::NaiveDate;
use plant_core::{AppState, RawMaterialId};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::balance::MaterialBalance;
use crate::NeedsReport;

/// 缺料報表列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeficitRow {
    pub key: RawMaterialId,
    pub name: String,
    pub required_kg: Decimal,
    pub on_hand_kg: Decimal,
    pub missing_kg: Decimal,
    pub missing_pallets: Option<Decimal>,
}

/// 只列出缺料的原料，按名稱排序
pub fn deficit_rows(balances: &[MaterialBalance]) -> Vec<DeficitRow> {
    let mut rows: Vec<DeficitRow> = balances
        .iter()
        .filter(|b| b.is_shortage())
        .map(|b| DeficitRow {
            key: b.key.clone(),
            name: b.name.clone(),
            required_kg: b.required_kg,
            on_hand_kg: b.on_hand_kg,
            missing_kg: b.shortage_kg(),
            missing_pallets: b.shortage_pallets().map(|p| p.round_dp(2)),
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

/// řízky 明細：按來源加總
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchnitzelBreakdown {
    pub material_id: RawMaterialId,
    pub total_kg: Decimal,
    /// 來源名稱 → 公斤
    pub by_source: BTreeMap<String, Decimal>,
    /// 訂購品項 → 公斤（子域來源不列入）
    pub by_ordered_material: BTreeMap<RawMaterialId, Decimal>,
}

/// 依設定的 řízky 原料產生明細；未設定或無需求時回傳 None
pub fn schnitzel_breakdown(state: &AppState, report: &NeedsReport) -> Option<SchnitzelBreakdown> {
    let material_id = state.settings.schnitzel_material_id.as_ref()?;
    let contributions = report.contributions.get(material_id)?;

    let mut by_source = BTreeMap::new();
    let mut by_ordered_material = BTreeMap::new();
    for contribution in contributions {
        let by_label = by_source
            .entry(contribution.source.label())
            .or_insert(Decimal::ZERO);
        *by_label = by_label.saturating_add(contribution.kg);
        if let Some(ordered) = &contribution.ordered_material {
            let by_material = by_ordered_material
                .entry(ordered.clone())
                .or_insert(Decimal::ZERO);
            *by_material = by_material.saturating_add(contribution.kg);
        }
    }

    Some(SchnitzelBreakdown {
        material_id: material_id.clone(),
        total_kg: report.need(material_id),
        by_source,
        by_ordered_material,
    })
}

/// KFC 生產概況列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KfcOverviewRow {
    pub product_id: String,
    pub name: String,
    pub ordered_boxes: i64,
    pub produced_boxes: i64,
    pub remaining_boxes: i64,
    pub remaining_kg: Decimal,
}

/// 某日 KFC 訂單概況（同產品合併），按名稱排序
pub fn kfc_overview(state: &AppState, date: NaiveDate) -> Vec<KfcOverviewRow> {
    let mut rows: BTreeMap<String, KfcOverviewRow> = BTreeMap::new();

    for order in state.kfc_orders_on(date) {
        let (name, box_weight_kg) = match state.kfc_product(&order.product_id) {
            Some(product) => (product.name.clone(), product.box_weight_kg),
            None => (order.product_id.clone(), Decimal::ZERO),
        };

        let row = rows.entry(order.product_id.clone()).or_insert_with(|| KfcOverviewRow {
            product_id: order.product_id.clone(),
            name,
            ordered_boxes: 0,
            produced_boxes: 0,
            remaining_boxes: 0,
            remaining_kg: Decimal::ZERO,
        });
        row.ordered_boxes = row.ordered_boxes.saturating_add(order.ordered_boxes.max(0));
        row.produced_boxes = row.produced_boxes.saturating_add(order.produced_boxes.max(0));
        row.remaining_boxes = row.remaining_boxes.saturating_add(order.remaining_boxes());
        let remaining_kg = Decimal::from(order.remaining_boxes()).saturating_mul(box_weight_kg.max(Decimal::ZERO));
        row.remaining_kg = row.remaining_kg.saturating_add(remaining_kg);
    }

    let mut rows: Vec<KfcOverviewRow> = rows.into_values().collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::BalanceCalculator;
    use crate::resolver::compute_daily_needs;
    use crate::NeedsScope;
    use plant_core::{
        Customer, KfcOrder, KfcProduct, MaterialKind, Order, OrderItem, PackagingType, PlantSettings,
        RawMaterial, SpizIngredient, SpizIngredientKind, SpizOrder, SpizRecipe, StockLevel,
    };
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
    }

    fn state() -> AppState {
        let recipe = SpizRecipe::new(vec![SpizIngredient::new(SpizIngredientKind::Steak, dec!(100))
            .with_raw_material("RIZKY")]);

        let mut state = AppState::new()
            .with_material(
                RawMaterial::new("RIZKY", "Řízky")
                    .with_weights(dec!(500), dec!(10))
                    .with_stock(StockLevel::new(dec!(1))),
            )
            .with_material(
                RawMaterial::new("STEHNA", "Stehna")
                    .with_weights(dec!(600), dec!(10))
                    .with_stock(StockLevel::new(dec!(5))),
            )
            .with_material(RawMaterial::new("RIZKY-MAR", "Řízky marinované").with_kind(
                MaterialKind::Product {
                    base_id: "RIZKY".to_string(),
                    marinade_percent: dec!(20),
                    loss_percent: Decimal::ZERO,
                },
            ))
            .with_customer(Customer::new("BILLA", "Billa"))
            .with_order(
                Order::new("BILLA", day())
                    .with_item(OrderItem::new("RIZKY", 50, PackagingType::VL))
                    .with_item(OrderItem::new("RIZKY-MAR", 10, PackagingType::VL))
                    .with_item(OrderItem::new("STEHNA", 10, PackagingType::VL)),
            )
            .with_settings(
                PlantSettings::new()
                    .with_schnitzel_material("RIZKY")
                    .with_spiz_recipe(recipe),
            );
        state.spiz_orders = vec![SpizOrder::new(day(), dec!(40))];
        state
    }

    #[test]
    fn test_deficit_rows() {
        let state = state();
        let report = compute_daily_needs(&state, day(), NeedsScope::All);
        let balances = BalanceCalculator::calculate(&state, &report);
        let rows = deficit_rows(&balances);

        // řízky: 500 + 80 + 40 = 620 kg，庫存 500 kg；stehna 足夠
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "RIZKY");
        assert_eq!(rows[0].missing_kg, dec!(120));
        assert_eq!(rows[0].missing_pallets, Some(dec!(0.24)));
    }

    #[test]
    fn test_schnitzel_breakdown() {
        let state = state();
        let report = compute_daily_needs(&state, day(), NeedsScope::All);
        let breakdown = schnitzel_breakdown(&state, &report).unwrap();

        assert_eq!(breakdown.total_kg, dec!(620));
        assert_eq!(breakdown.by_source["BILLA"], dec!(580));
        assert_eq!(breakdown.by_source["Špíz Steak"], dec!(40));
        assert_eq!(breakdown.by_ordered_material["RIZKY-MAR"], dec!(80));
        assert_eq!(breakdown.by_ordered_material["RIZKY"], dec!(500));
    }

    #[test]
    fn test_schnitzel_breakdown_unconfigured() {
        let mut state = state();
        state.settings.schnitzel_material_id = None;
        let report = compute_daily_needs(&state, day(), NeedsScope::All);
        assert!(schnitzel_breakdown(&state, &report).is_none());
    }

    #[test]
    fn test_kfc_overview() {
        let mut state = AppState::new();
        state.kfc_products = vec![KfcProduct::new("K1", "Steak", dec!(10))];
        state.kfc_orders = vec![
            KfcOrder::new(day(), "K1", 20).with_produced(5),
            KfcOrder::new(day(), "K1", 10),
            KfcOrder::new(day(), "K9", 3),
        ];

        let rows = kfc_overview(&state, day());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "K9");
        assert_eq!(rows[0].remaining_kg, Decimal::ZERO);
        assert_eq!(rows[1].ordered_boxes, 30);
        assert_eq!(rows[1].remaining_boxes, 25);
        assert_eq!(rows[1].remaining_kg, dec!(250));
    }
}
