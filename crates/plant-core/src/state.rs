//! 應用狀態（整份持久化資料）

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::box_weight::BoxWeightTable;
use crate::config::PlantSettings;
use crate::import::OrderCodeMap;
use crate::kfc::{KfcOrder, KfcProduct};
use crate::material::RawMaterial;
use crate::order::{Customer, Order, PackagingType};
use crate::planned::PlannedAction;
use crate::spiz::SpizOrder;
use crate::{PlantError, Result};

/// 應用狀態
///
/// 計算器只讀取此快照；所有修改都透過 `&mut AppState` 明確進行。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppState {
    #[serde(default)]
    pub materials: Vec<RawMaterial>,

    #[serde(default)]
    pub customers: Vec<Customer>,

    #[serde(default)]
    pub orders: Vec<Order>,

    #[serde(default)]
    pub box_weights: BoxWeightTable,

    #[serde(default)]
    pub planned_actions: Vec<PlannedAction>,

    #[serde(default)]
    pub kfc_products: Vec<KfcProduct>,

    #[serde(default)]
    pub kfc_orders: Vec<KfcOrder>,

    #[serde(default)]
    pub spiz_orders: Vec<SpizOrder>,

    /// 訂單匯入用的產品代碼對照表
    #[serde(default)]
    pub order_codes: OrderCodeMap,

    #[serde(default)]
    pub settings: PlantSettings,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 預設種子資料（載入失敗時使用）
    pub fn seed() -> Self {
        let kg = |v: i64| Decimal::from(v);
        let mut state = Self::new();
        state.materials = vec![
            RawMaterial::new("STEHNA", "Stehna").with_weights(kg(600), kg(10)),
            RawMaterial::new("SPODNI-STEHNA", "Spodní stehna").with_weights(kg(600), kg(10)),
            RawMaterial::new("HORNI-STEHNA", "Horní stehna").with_weights(kg(600), kg(10)),
            RawMaterial::new("RIZKY", "Řízky").with_weights(kg(500), kg(10)),
            RawMaterial::new("STEAK", "Steak").with_weights(kg(500), kg(10)),
            RawMaterial::new("KRIDLA", "Křídla").with_weights(kg(500), kg(10)),
        ];
        state.settings = PlantSettings::new().with_schnitzel_material("RIZKY");
        state
    }

    /// 建構器模式：添加原料
    pub fn with_material(mut self, material: RawMaterial) -> Self {
        self.materials.push(material);
        self
    }

    /// 建構器模式：添加客戶
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customers.push(customer);
        self
    }

    /// 建構器模式：添加訂單
    pub fn with_order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// 建構器模式：設置參數
    pub fn with_settings(mut self, settings: PlantSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn material(&self, id: &str) -> Option<&RawMaterial> {
        self.materials.iter().find(|m| m.id == id)
    }

    pub fn material_mut(&mut self, id: &str) -> Option<&mut RawMaterial> {
        self.materials.iter_mut().find(|m| m.id == id)
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn kfc_product(&self, id: &str) -> Option<&KfcProduct> {
        self.kfc_products.iter().find(|p| p.id == id)
    }

    /// 新增或替換原料（替換前檢查配方）
    pub fn upsert_material(&mut self, material: RawMaterial) -> Result<()> {
        material.kind.validate()?;
        match self.material_mut(&material.id) {
            Some(existing) => *existing = material,
            None => self.materials.push(material),
        }
        Ok(())
    }

    /// 某日訂單
    pub fn orders_on(&self, date: NaiveDate) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |o| o.date == date)
    }

    /// 取得（必要時建立）某客戶某日的訂單
    pub fn order_for_mut(&mut self, customer_id: &str, date: NaiveDate) -> Result<&mut Order> {
        if self.customer(customer_id).is_none() {
            return Err(PlantError::CustomerNotFound(customer_id.to_string()));
        }

        let index = match self
            .orders
            .iter()
            .position(|o| o.customer_id == customer_id && o.date == date)
        {
            Some(index) => index,
            None => {
                self.orders.push(Order::new(customer_id, date));
                self.orders.len() - 1
            }
        };

        Ok(&mut self.orders[index])
    }

    /// 某日範圍內的計劃生產
    pub fn planned_actions_on(&self, date: NaiveDate) -> impl Iterator<Item = &PlannedAction> {
        self.planned_actions.iter().filter(move |a| a.covers(date))
    }

    pub fn kfc_orders_on(&self, date: NaiveDate) -> impl Iterator<Item = &KfcOrder> {
        self.kfc_orders.iter().filter(move |o| o.date == date)
    }

    pub fn spiz_orders_on(&self, date: NaiveDate) -> impl Iterator<Item = &SpizOrder> {
        self.spiz_orders.iter().filter(move |o| o.date == date)
    }

    /// 查詢客戶箱重（公克）；未設定時回傳 None
    pub fn box_weight_grams(
        &self,
        customer_id: &str,
        raw_material_id: &str,
        packaging: PackagingType,
    ) -> Option<Decimal> {
        self.box_weights.lookup(customer_id, raw_material_id, packaging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{MaterialKind, MixComponent};
    use crate::order::OrderItem;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    #[test]
    fn test_seed_has_materials() {
        let state = AppState::seed();
        assert!(state.material("RIZKY").is_some());
        assert_eq!(state.settings.schnitzel_material_id.as_deref(), Some("RIZKY"));
    }

    #[test]
    fn test_order_for_mut_creates_once() {
        let mut state = AppState::new().with_customer(Customer::new("BILLA", "Billa"));

        state
            .order_for_mut("BILLA", day(3))
            .unwrap()
            .add_item(OrderItem::new("RIZKY", 5, PackagingType::VL));
        state
            .order_for_mut("BILLA", day(3))
            .unwrap()
            .add_item(OrderItem::new("STEHNA", 2, PackagingType::OA));

        assert_eq!(state.orders.len(), 1);
        assert_eq!(state.orders[0].items.len(), 2);
        assert_eq!(state.orders_on(day(3)).count(), 1);
        assert_eq!(state.orders_on(day(4)).count(), 0);
    }

    #[test]
    fn test_order_for_unknown_customer() {
        let mut state = AppState::new();
        assert!(matches!(
            state.order_for_mut("NOBODY", day(3)),
            Err(PlantError::CustomerNotFound(_))
        ));
    }

    #[test]
    fn test_upsert_material_validates() {
        let mut state = AppState::seed();
        let bad_mix = RawMaterial::new("BURGER-MIX", "Burger mix").with_kind(MaterialKind::Mix {
            components: vec![MixComponent::new("STEAK", dec!(70))],
        });

        assert!(state.upsert_material(bad_mix).is_err());
        assert!(state.material("BURGER-MIX").is_none());

        let renamed = RawMaterial::new("RIZKY", "Kuřecí řízky");
        state.upsert_material(renamed).unwrap();
        assert_eq!(state.material("RIZKY").map(|m| m.name.as_str()), Some("Kuřecí řízky"));
    }
}
