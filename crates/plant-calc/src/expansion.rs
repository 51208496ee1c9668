//! 複合原料展開：混合分配、產品回推醃料與損耗

use plant_core::{AppState, MaterialKind};
use rust_decimal::Decimal;

use crate::demand::{Contribution, DemandLine};
use crate::{NeedsReport, NeedsWarning};

/// 扣除醃料重量：`kg × (1 − m/100)`
///
/// `m ≤ 0` 時不處理；`m ≥ 100` 時無可用肉重，回傳 None。
pub fn remove_marinade(kg: Decimal, marinade_percent: Decimal) -> Option<Decimal> {
    if marinade_percent <= Decimal::ZERO {
        return Some(kg);
    }
    if marinade_percent >= Decimal::ONE_HUNDRED {
        return None;
    }
    kg.checked_mul(Decimal::ONE - marinade_percent / Decimal::ONE_HUNDRED)
}

/// 補回修整損耗：`kg / (1 − l/100)`
///
/// `l ≤ 0` 時不處理；`l ≥ 100` 時分母非正，回傳 None。
pub fn gross_up_for_loss(kg: Decimal, loss_percent: Decimal) -> Option<Decimal> {
    if loss_percent <= Decimal::ZERO {
        return Some(kg);
    }
    let remaining = Decimal::ONE - loss_percent / Decimal::ONE_HUNDRED;
    if remaining <= Decimal::ZERO {
        return None;
    }
    kg.checked_div(remaining)
}

/// 依產出率回推原料：`kg × 100 / y`；`y ≤ 0` 時回傳 None
pub fn gross_up_for_yield(kg: Decimal, yield_percent: Decimal) -> Option<Decimal> {
    if yield_percent <= Decimal::ZERO {
        return None;
    }
    kg.checked_mul(Decimal::ONE_HUNDRED)?.checked_div(yield_percent)
}

/// 展開計算器
pub struct ExpansionCalculator;

impl ExpansionCalculator {
    /// 展開一筆需求行並累加到結果
    ///
    /// 只展開一層：混合成分即使本身是產品或混合，也直接記在成分自己名下。
    pub fn expand(state: &AppState, line: &DemandLine, report: &mut NeedsReport) {
        let Some(material) = state.material(&line.raw_material_id) else {
            tracing::warn!("找不到原料 {}，需求 {} kg 不計", line.raw_material_id, line.kg);
            report.add_warning(NeedsWarning::warning(
                line.raw_material_id.clone(),
                format!("找不到原料，{} kg 不計入", line.kg),
            ));
            return;
        };

        if !material.is_active {
            report.add_warning(NeedsWarning::info(material.id.clone(), "原料已停用，但仍有需求"));
        }

        let contribution = |kg: Decimal| Contribution {
            source: line.source.clone(),
            ordered_material: Some(line.raw_material_id.clone()),
            kg,
        };

        match &material.kind {
            MaterialKind::Plain => {
                report.accumulate(&material.id, line.kg, contribution(line.kg));
            }

            MaterialKind::Product {
                base_id,
                marinade_percent,
                loss_percent,
            } => {
                let usable = match remove_marinade(line.kg, *marinade_percent) {
                    Some(usable) => usable,
                    None => {
                        report.add_warning(NeedsWarning::warning(
                            material.id.clone(),
                            format!("醃料 {} % 無法扣除，不計入", marinade_percent),
                        ));
                        Decimal::ZERO
                    }
                };

                let raw = match gross_up_for_loss(usable, *loss_percent) {
                    Some(raw) => raw,
                    None => {
                        report.add_warning(NeedsWarning::warning(
                            material.id.clone(),
                            format!("損耗 {} % 無法回推，忽略損耗", loss_percent),
                        ));
                        usable
                    }
                };

                Self::warn_unknown(state, base_id, report);
                tracing::debug!("產品 {} → {}: {} kg → {} kg", material.id, base_id, line.kg, raw);
                report.accumulate(base_id, raw, contribution(raw));
            }

            MaterialKind::Mix { components } => {
                if components.is_empty() {
                    report.add_warning(NeedsWarning::warning(
                        material.id.clone(),
                        "混合沒有成分，不計入",
                    ));
                    return;
                }

                for component in components {
                    let share = component
                        .percentage
                        .checked_div(Decimal::ONE_HUNDRED)
                        .and_then(|share| line.kg.checked_mul(share));
                    let Some(kg) = share else {
                        report.add_warning(NeedsWarning::warning(
                            component.raw_material_id.clone(),
                            format!("{} kg × {} % 超出可計算範圍，不計入", line.kg, component.percentage),
                        ));
                        continue;
                    };
                    Self::warn_unknown(state, &component.raw_material_id, report);
                    tracing::debug!(
                        "混合 {} → {} ({} %): {} kg",
                        material.id,
                        component.raw_material_id,
                        component.percentage,
                        kg
                    );
                    report.accumulate(&component.raw_material_id, kg, contribution(kg));
                }
            }

            MaterialKind::Calibrated { base_id, .. } => {
                Self::warn_unknown(state, base_id, report);
                report.accumulate(base_id, line.kg, contribution(line.kg));
            }
        }
    }

    fn warn_unknown(state: &AppState, id: &str, report: &mut NeedsReport) {
        if state.material(id).is_none() {
            report.add_warning(NeedsWarning::info(id, "原料不在原料表中，以ID記錄"));
        }
    }
}
