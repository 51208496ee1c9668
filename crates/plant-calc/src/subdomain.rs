//! KFC 與 Špíz 子域需求，合併到同一份結果

use chrono::NaiveDate;
use plant_core::AppState;
use rust_decimal::Decimal;

use crate::demand::{Contribution, DemandSource};
use crate::expansion::gross_up_for_yield;
use crate::{NeedsReport, NeedsWarning};

/// 依產出率回推；產出率無效時原樣計入並記錄
fn apply_yield(subject: &str, kg: Decimal, yield_percent: Option<Decimal>, report: &mut NeedsReport) -> Decimal {
    match yield_percent {
        None => kg,
        Some(pct) => gross_up_for_yield(kg, pct).unwrap_or_else(|| {
            report.add_warning(NeedsWarning::warning(
                subject,
                format!("產出率 {} % 無法回推，原樣計入", pct),
            ));
            kg
        }),
    }
}

/// KFC 需求：已訂未產箱數 × 每箱公斤
pub struct KfcNeeds;

impl KfcNeeds {
    pub fn merge(state: &AppState, date: NaiveDate, report: &mut NeedsReport) {
        for order in state.kfc_orders_on(date) {
            let Some(product) = state.kfc_product(&order.product_id) else {
                tracing::warn!("找不到 KFC 產品 {}", order.product_id);
                report.add_warning(NeedsWarning::warning(
                    order.product_id.clone(),
                    "找不到 KFC 產品，不計入",
                ));
                continue;
            };

            let remaining = order.remaining_boxes();
            if remaining == 0 {
                continue;
            }

            if product.box_weight_kg <= Decimal::ZERO {
                report.add_warning(NeedsWarning::warning(
                    product.id.clone(),
                    "KFC 產品未設定箱重，不計入",
                ));
                continue;
            }

            let Some(finished) = Decimal::from(remaining).checked_mul(product.box_weight_kg) else {
                report.add_warning(NeedsWarning::warning(
                    product.id.clone(),
                    format!("{} 箱 × {} kg 超出可計算範圍，不計入", remaining, product.box_weight_kg),
                ));
                continue;
            };
            let kg = apply_yield(&product.id, finished, product.yield_percent, report);
            let key = product.needs_key();

            tracing::debug!("KFC {} 剩餘 {} 箱 → {}: {} kg", product.name, remaining, key, kg);
            report.accumulate(
                &key,
                kg,
                Contribution {
                    source: DemandSource::Kfc {
                        product_id: product.id.clone(),
                    },
                    ordered_material: None,
                    kg,
                },
            );
        }
    }
}

/// Špíz 需求：已訂未產公斤數按配方拆成各成分
pub struct SpizNeeds;

impl SpizNeeds {
    pub fn merge(state: &AppState, date: NaiveDate, report: &mut NeedsReport) {
        let remaining = state
            .spiz_orders_on(date)
            .try_fold(Decimal::ZERO, |total, order| total.checked_add(order.remaining_kg()));
        let Some(remaining) = remaining else {
            report.add_warning(NeedsWarning::warning("Špíz", "訂單公斤數超出可計算範圍，不計入"));
            return;
        };
        if remaining <= Decimal::ZERO {
            return;
        }

        let recipe = &state.settings.spiz_recipe;
        let total_percent: Decimal = recipe.ingredients.iter().map(|i| i.percent).sum();
        if total_percent != Decimal::ONE_HUNDRED {
            report.add_warning(NeedsWarning::info(
                "Špíz",
                format!("配方百分比總和為 {}", total_percent),
            ));
        }

        for ingredient in &recipe.ingredients {
            let key = ingredient.needs_key();
            let share = ingredient
                .percent
                .checked_div(Decimal::ONE_HUNDRED)
                .and_then(|pct| remaining.checked_mul(pct));
            let Some(share) = share else {
                report.add_warning(NeedsWarning::warning(
                    key,
                    format!("{} kg × {} % 超出可計算範圍，不計入", remaining, ingredient.percent),
                ));
                continue;
            };
            let kg = apply_yield(&key, share, ingredient.yield_percent, report);

            tracing::debug!("Špíz {} → {}: {} kg", ingredient.kind.label(), key, kg);
            report.accumulate(
                &key,
                kg,
                Contribution {
                    source: DemandSource::Spiz {
                        ingredient: ingredient.kind,
                    },
                    ordered_material: None,
                    kg,
                },
            );
        }
    }
}
