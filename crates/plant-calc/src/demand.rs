//! 需求行收集（訂單與計劃生產）

use chrono::NaiveDate;
use plant_core::{AppState, PackagingType, PlannedActionKind, RawMaterialId, SpizIngredientKind};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::{NeedsReport, NeedsScope, NeedsWarning};

const GRAMS_PER_KG: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// 需求來源
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DemandSource {
    Order { customer_id: String },
    PlannedAction { action_id: Uuid, customer_id: String },
    Kfc { product_id: String },
    Spiz { ingredient: SpizIngredientKind },
}

impl DemandSource {
    /// 報表上的來源名稱
    pub fn label(&self) -> String {
        match self {
            DemandSource::Order { customer_id } => customer_id.clone(),
            DemandSource::PlannedAction { customer_id, .. } => format!("{} (plán)", customer_id),
            DemandSource::Kfc { product_id } => format!("KFC {}", product_id),
            DemandSource::Spiz { ingredient } => format!("Špíz {}", ingredient.label()),
        }
    }
}

/// 需求追溯記錄
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub source: DemandSource,

    /// 訂購的原料（經混合／產品展開時為原始訂購品項）
    pub ordered_material: Option<RawMaterialId>,

    pub kg: Decimal,
}

/// 需求行：某來源對某原料的成品公斤數（尚未展開）
#[derive(Debug, Clone, PartialEq)]
pub struct DemandLine {
    pub source: DemandSource,
    pub raw_material_id: RawMaterialId,
    pub kg: Decimal,
}

/// 箱數換算公斤；溢位時回傳 None
pub fn boxes_to_kg(boxes: i64, grams_per_box: Decimal) -> Option<Decimal> {
    Decimal::from(boxes.max(0))
        .checked_mul(grams_per_box)?
        .checked_div(GRAMS_PER_KG)
}

/// 需求行收集器
pub struct DemandCollector;

impl DemandCollector {
    /// 收集某日所有訂單與計劃生產的需求行
    pub fn collect(
        state: &AppState,
        date: NaiveDate,
        scope: NeedsScope,
        report: &mut NeedsReport,
    ) -> Vec<DemandLine> {
        let mut lines = Vec::new();

        for order in state.orders_on(date) {
            if !Self::customer_in_scope(state, &order.customer_id, scope) {
                continue;
            }

            for item in order.active_items() {
                let boxes = item.effective_boxes();
                if boxes == 0 {
                    continue;
                }

                let grams = Self::grams_per_box(
                    state,
                    &order.customer_id,
                    &item.raw_material_id,
                    item.packaging,
                    report,
                );

                Self::push_line(
                    &mut lines,
                    DemandSource::Order {
                        customer_id: order.customer_id.clone(),
                    },
                    &item.raw_material_id,
                    boxes,
                    grams,
                    report,
                );
            }
        }

        for action in state.planned_actions_on(date) {
            // Lima 不連結原料
            let PlannedActionKind::Production {
                customer_id,
                raw_material_id,
                packaging,
            } = &action.kind
            else {
                continue;
            };

            if !Self::customer_in_scope(state, customer_id, scope) {
                continue;
            }

            let boxes = action.boxes_on(date);
            if boxes == 0 {
                continue;
            }

            let grams = Self::grams_per_box(state, customer_id, raw_material_id, *packaging, report);

            Self::push_line(
                &mut lines,
                DemandSource::PlannedAction {
                    action_id: action.id,
                    customer_id: customer_id.clone(),
                },
                raw_material_id,
                boxes,
                grams,
                report,
            );
        }

        tracing::debug!("{} 需求行: {} 筆", date, lines.len());
        lines
    }

    fn push_line(
        lines: &mut Vec<DemandLine>,
        source: DemandSource,
        raw_material_id: &str,
        boxes: i64,
        grams: Decimal,
        report: &mut NeedsReport,
    ) {
        match boxes_to_kg(boxes, grams) {
            Some(kg) => lines.push(DemandLine {
                source,
                raw_material_id: raw_material_id.to_string(),
                kg,
            }),
            None => {
                tracing::warn!("{} 箱 × {} g 溢位，{} 不計入", boxes, grams, raw_material_id);
                report.add_warning(NeedsWarning::warning(
                    raw_material_id,
                    format!("{} 箱 × {} g 超出可計算範圍，不計入", boxes, grams),
                ));
            }
        }
    }

    /// 查詢箱重，未設定時退回預設值並記錄
    fn grams_per_box(
        state: &AppState,
        customer_id: &str,
        raw_material_id: &str,
        packaging: PackagingType,
        report: &mut NeedsReport,
    ) -> Decimal {
        match state.box_weight_grams(customer_id, raw_material_id, packaging) {
            Some(grams) => grams,
            None => {
                let fallback = state.settings.effective_default_box_weight_grams();
                tracing::debug!(
                    "客戶 {} 原料 {} 包裝 {} 未設定箱重，使用 {} g",
                    customer_id,
                    raw_material_id,
                    packaging.code(),
                    fallback
                );
                report.add_warning(NeedsWarning::info(
                    format!("{}/{}", customer_id, raw_material_id),
                    format!("未設定 {} 箱重，使用預設 {} g", packaging.code(), fallback),
                ));
                fallback
            }
        }
    }

    fn customer_in_scope(state: &AppState, customer_id: &str, scope: NeedsScope) -> bool {
        if scope.includes_kfc() {
            return true;
        }
        !state.customer(customer_id).map(|c| c.is_kfc).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plant_core::{BoxWeight, Customer, Order, OrderItem, PlannedAction};
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn collect(state: &AppState, date: NaiveDate, scope: NeedsScope) -> (Vec<DemandLine>, NeedsReport) {
        let mut report = NeedsReport::empty(date, scope);
        let lines = DemandCollector::collect(state, date, scope, &mut report);
        (lines, report)
    }

    #[test]
    fn test_boxes_to_kg() {
        assert_eq!(boxes_to_kg(10, dec!(10000)), Some(dec!(100)));
        assert_eq!(boxes_to_kg(3, dec!(500)), Some(dec!(1.5)));
        assert_eq!(boxes_to_kg(-4, dec!(500)), Some(Decimal::ZERO));
        assert_eq!(boxes_to_kg(i64::MAX, Decimal::MAX), None);
    }

    #[test]
    fn test_collect_orders_with_box_weights() {
        let mut state = AppState::new()
            .with_customer(Customer::new("BILLA", "Billa"))
            .with_order(
                Order::new("BILLA", day(3))
                    .with_item(OrderItem::new("RIZKY", 4, PackagingType::OA))
                    .with_item(OrderItem::new("STEHNA", 10, PackagingType::VL))
                    .with_item(OrderItem::new("KRIDLA", 7, PackagingType::VL).with_active(false))
                    .with_item(OrderItem::new("STEAK", 0, PackagingType::VL)),
            );
        state
            .box_weights
            .upsert(BoxWeight::new("BILLA", "RIZKY").with_grams(PackagingType::OA, dec!(2500)));

        let (lines, report) = collect(&state, day(3), NeedsScope::All);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].kg, dec!(10));
        // 未設定箱重：10 000 g
        assert_eq!(lines[1].kg, dec!(100));
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_collect_planned_actions() {
        let mut state = AppState::new().with_customer(Customer::new("BILLA", "Billa"));
        state.planned_actions = vec![
            PlannedAction::new(
                day(1),
                day(7),
                PlannedActionKind::Production {
                    customer_id: "BILLA".to_string(),
                    raw_material_id: "RIZKY".to_string(),
                    packaging: PackagingType::RB,
                },
            )
            .with_boxes(day(3), 5),
            PlannedAction::new(
                day(1),
                day(7),
                PlannedActionKind::Lima {
                    name: "Lima 1".to_string(),
                },
            )
            .with_boxes(day(3), 50),
        ];

        let (lines, _) = collect(&state, day(3), NeedsScope::All);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kg, dec!(50));
        assert!(matches!(lines[0].source, DemandSource::PlannedAction { .. }));

        let (lines, _) = collect(&state, day(4), NeedsScope::All);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_non_kfc_scope_skips_kfc_customers() {
        let state = AppState::new()
            .with_customer(Customer::new("KFC", "KFC").kfc())
            .with_customer(Customer::new("BILLA", "Billa"))
            .with_order(Order::new("KFC", day(3)).with_item(OrderItem::new("STEHNA", 2, PackagingType::VL)))
            .with_order(Order::new("BILLA", day(3)).with_item(OrderItem::new("STEHNA", 3, PackagingType::VL)));

        let (all, _) = collect(&state, day(3), NeedsScope::All);
        let (non_kfc, _) = collect(&state, day(3), NeedsScope::NonKfc);

        assert_eq!(all.len(), 2);
        assert_eq!(non_kfc.len(), 1);
        assert_eq!(non_kfc[0].kg, dec!(30));
    }

    #[test]
    fn test_overflowing_quantity_is_skipped_with_warning() {
        let mut state = AppState::new()
            .with_customer(Customer::new("BILLA", "Billa"))
            .with_order(
                Order::new("BILLA", day(3))
                    .with_item(OrderItem::new("RIZKY", i64::MAX, PackagingType::VL))
                    .with_item(OrderItem::new("STEHNA", 2, PackagingType::VL)),
            );
        state
            .box_weights
            .upsert(BoxWeight::new("BILLA", "RIZKY").with_grams(PackagingType::VL, dec!(100000000000)));

        let (lines, report) = collect(&state, day(3), NeedsScope::All);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].raw_material_id, "STEHNA");
        assert!(report.warnings.iter().any(|w| w.subject == "RIZKY"));
    }
}
