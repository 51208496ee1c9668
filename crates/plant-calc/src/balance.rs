//! 需求與現有庫存的差額

use plant_core::{AppState, RawMaterialId};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::NeedsReport;

/// 單一原料的庫存差額
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialBalance {
    /// 原料ID或合成鍵
    pub key: RawMaterialId,
    /// 顯示名稱（合成鍵直接顯示鍵）
    pub name: String,
    /// 需求
    pub required_kg: Decimal,
    /// 現有庫存
    pub on_hand_kg: Decimal,
    /// 差額（庫存 − 需求）
    pub balance_kg: Decimal,
    /// 每棧板重量，用於換算缺口
    pub pallet_weight_kg: Decimal,
}

impl MaterialBalance {
    /// 創建新的差額記錄
    pub fn new(key: RawMaterialId, name: String, required_kg: Decimal, on_hand_kg: Decimal) -> Self {
        Self {
            key,
            name,
            required_kg,
            on_hand_kg,
            balance_kg: on_hand_kg.saturating_sub(required_kg),
            pallet_weight_kg: Decimal::ZERO,
        }
    }

    pub fn is_shortage(&self) -> bool {
        self.balance_kg < Decimal::ZERO
    }

    /// 缺口（公斤），無缺口為 0
    pub fn shortage_kg(&self) -> Decimal {
        if self.is_shortage() {
            -self.balance_kg
        } else {
            Decimal::ZERO
        }
    }

    /// 缺口換算棧板；未設定棧板重量時回傳 None
    pub fn shortage_pallets(&self) -> Option<Decimal> {
        if self.pallet_weight_kg <= Decimal::ZERO {
            return None;
        }
        self.shortage_kg().checked_div(self.pallet_weight_kg)
    }
}

/// 差額計算器
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// 計算每個有需求的原料的差額，按顯示名稱排序
    pub fn calculate(state: &AppState, report: &NeedsReport) -> Vec<MaterialBalance> {
        let mut balances: Vec<MaterialBalance> = report
            .needs
            .iter()
            .map(|(key, required)| match state.material(key) {
                Some(material) => {
                    let mut balance = MaterialBalance::new(
                        key.clone(),
                        material.name.clone(),
                        *required,
                        material.on_hand_kg(),
                    );
                    balance.pallet_weight_kg = material.pallet_weight_kg;
                    balance
                }
                // 合成鍵沒有庫存
                None => MaterialBalance::new(key.clone(), key.clone(), *required, Decimal::ZERO),
            })
            .collect();

        balances.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.key.cmp(&b.key)));
        balances
    }
}
