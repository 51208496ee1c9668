//! 狀態持久化：JSON 載入／儲存、遷移與備份

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::box_weight::DEFAULT_BOX_WEIGHT_GRAMS;
use crate::state::AppState;
use crate::Result;

/// 整份備份：工廠狀態＋獨立的排班資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupBundle {
    pub state: AppState,

    /// 員工排班（另一份獨立的 JSON，原樣保存）
    #[serde(default)]
    pub schedule: Option<serde_json::Value>,
}

impl BackupBundle {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            schedule: None,
        }
    }

    /// 建構器模式：附上排班資料
    pub fn with_schedule(mut self, schedule: serde_json::Value) -> Self {
        self.schedule = Some(schedule);
        self
    }
}

/// 從 JSON 載入狀態；缺少的欄位以預設值補齊
pub fn load_state(json: &str) -> Result<AppState> {
    let mut state: AppState = serde_json::from_str(json)?;
    let applied = migrate(&mut state);
    tracing::info!(
        "載入狀態：原料 {} 筆，訂單 {} 筆，計劃生產 {} 筆，遷移 {} 項",
        state.materials.len(),
        state.orders.len(),
        state.planned_actions.len(),
        applied
    );
    Ok(state)
}

/// 載入狀態；資料損壞時回報並退回種子資料
pub fn load_state_or_default(json: &str) -> AppState {
    match load_state(json) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!("狀態資料無法解析，改用預設資料: {}", err);
            AppState::seed()
        }
    }
}

/// 序列化狀態
pub fn save_state(state: &AppState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// 載入時的遷移檢查，回傳套用的項目數
pub fn migrate(state: &mut AppState) -> usize {
    let mut applied = 0;

    if state.settings.default_box_weight_grams <= Decimal::ZERO {
        tracing::debug!("遷移：預設箱重未設定，改為 {} g", DEFAULT_BOX_WEIGHT_GRAMS);
        state.settings.default_box_weight_grams = DEFAULT_BOX_WEIGHT_GRAMS;
        applied += 1;
    }

    for action in &mut state.planned_actions {
        if action.end_date < action.start_date {
            tracing::debug!("遷移：計劃生產 {} 的日期範圍顛倒", action.id);
            std::mem::swap(&mut action.start_date, &mut action.end_date);
            applied += 1;
        }
    }

    for order in &mut state.orders {
        let before = order.items.len();
        order.items.retain(|item| !item.raw_material_id.is_empty());
        if order.items.len() != before {
            tracing::debug!("遷移：訂單 {} 移除 {} 筆空白項目", order.id, before - order.items.len());
            applied += 1;
        }
    }

    applied
}

pub fn load_state_file<P: AsRef<Path>>(path: P) -> Result<AppState> {
    let content = fs::read_to_string(path)?;
    load_state(&content)
}

pub fn save_state_file<P: AsRef<Path>>(path: P, state: &AppState) -> Result<()> {
    fs::write(path, save_state(state)?)?;
    Ok(())
}

/// 讀取備份；狀態部分同樣經過遷移
pub fn load_backup_file<P: AsRef<Path>>(path: P) -> Result<BackupBundle> {
    let content = fs::read_to_string(path)?;
    let mut bundle: BackupBundle = serde_json::from_str(&content)?;
    migrate(&mut bundle.state);
    Ok(bundle)
}

pub fn save_backup_file<P: AsRef<Path>>(path: P, bundle: &BackupBundle) -> Result<()> {
    let json = serde_json::to_string_pretty(bundle)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::RawMaterial;
    use crate::order::{Customer, Order, OrderItem, PackagingType};
    use crate::PlantError;
    use chrono::NaiveDate;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_fills_missing_keys() {
        let state = load_state(r#"{"materials": [{"id": "RIZKY", "name": "Řízky"}]}"#).unwrap();

        assert_eq!(state.materials.len(), 1);
        assert!(state.orders.is_empty());
        assert_eq!(state.settings.default_box_weight_grams, DEFAULT_BOX_WEIGHT_GRAMS);
    }

    #[test]
    fn test_migrate_zero_default_box_weight() {
        let state = load_state(r#"{"settings": {"default_box_weight_grams": "0"}}"#).unwrap();
        assert_eq!(state.settings.default_box_weight_grams, DEFAULT_BOX_WEIGHT_GRAMS);
    }

    #[test]
    fn test_migrate_drops_blank_items() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        let mut state = AppState::new().with_order(
            Order::new("BILLA", date)
                .with_item(OrderItem::new("", 3, PackagingType::VL))
                .with_item(OrderItem::new("RIZKY", 3, PackagingType::VL)),
        );

        assert_eq!(migrate(&mut state), 1);
        assert_eq!(state.orders[0].items.len(), 1);
    }

    #[test]
    fn test_corrupt_json() {
        assert!(matches!(load_state("{not json"), Err(PlantError::Json(_))));

        let fallback = load_state_or_default("{not json");
        assert_eq!(fallback, AppState::seed());
    }

    #[test]
    fn test_state_file_roundtrip() {
        let state = AppState::new()
            .with_material(RawMaterial::new("RIZKY", "Řízky"))
            .with_customer(Customer::new("BILLA", "Billa"));

        let file = NamedTempFile::new().unwrap();
        save_state_file(file.path(), &state).unwrap();

        let reloaded = load_state_file(file.path()).unwrap();
        assert_eq!(reloaded, state);
    }

    #[test]
    fn test_backup_keeps_schedule() {
        let schedule = serde_json::json!({"employees": [{"name": "Jana", "shift": "R"}]});
        let bundle = BackupBundle::new(AppState::seed()).with_schedule(schedule.clone());

        let file = NamedTempFile::new().unwrap();
        save_backup_file(file.path(), &bundle).unwrap();

        let reloaded = load_backup_file(file.path()).unwrap();
        assert_eq!(reloaded.schedule, Some(schedule));
        assert_eq!(reloaded.state.materials.len(), bundle.state.materials.len());
    }
}
