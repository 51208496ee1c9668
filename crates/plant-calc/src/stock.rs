//! 庫存編輯與腿肉拆分

use plant_core::{AppState, PlantError, RawMaterialId, Result};
use rust_decimal::Decimal;

/// 庫存編輯結果
#[derive(Debug, Clone, PartialEq)]
pub struct StockEdit {
    pub material_id: RawMaterialId,
    pub previous_pallets: Decimal,
    pub new_pallets: Decimal,
    /// 自動加到上腿的棧板數
    pub upper_credit: Option<(RawMaterialId, Decimal)>,
}

impl StockEdit {
    pub fn delta(&self) -> Decimal {
        self.new_pallets.saturating_sub(self.previous_pallets)
    }
}

/// 設定原料庫存（棧板）
///
/// 若為設定的下腿原料且庫存增加，按比例把增量加到上腿庫存。
pub fn apply_stock_edit(
    state: &mut AppState,
    material_id: &str,
    new_pallets: Decimal,
) -> Result<StockEdit> {
    if new_pallets < Decimal::ZERO {
        return Err(PlantError::InvalidInput(format!(
            "庫存不可為負數: {}",
            new_pallets
        )));
    }

    let material = state
        .material_mut(material_id)
        .ok_or_else(|| PlantError::MaterialNotFound(material_id.to_string()))?;
    let previous_pallets = material.stock.pallets;
    material.stock.pallets = new_pallets;

    let mut edit = StockEdit {
        material_id: material_id.to_string(),
        previous_pallets,
        new_pallets,
        upper_credit: None,
    };

    let Some(split) = state.settings.thigh_split.clone() else {
        return Ok(edit);
    };
    if split.lower_id != material_id {
        return Ok(edit);
    }

    let credit = split.upper_credit(edit.delta());
    if credit.is_zero() {
        return Ok(edit);
    }

    match state.material_mut(&split.upper_id) {
        Some(upper) => {
            upper.stock.pallets = upper.stock.pallets.saturating_add(credit);
            tracing::info!(
                "下腿 {} 增加 {} 棧板，上腿 {} 自動加 {} 棧板",
                material_id,
                edit.delta(),
                split.upper_id,
                credit
            );
            edit.upper_credit = Some((split.upper_id, credit));
        }
        None => {
            tracing::warn!("找不到上腿原料 {}，不自動拆分", split.upper_id);
        }
    }

    Ok(edit)
}
