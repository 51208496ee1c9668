//! Špíz（肉串）子域：配方與訂單

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::material::RawMaterialId;

/// 肉串成分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpizIngredientKind {
    Klobasa,
    Spek,
    Cibule,
    Paprika,
    /// 牛排，由 řízky 切出
    Steak,
}

impl SpizIngredientKind {
    pub fn label(&self) -> &'static str {
        match self {
            SpizIngredientKind::Klobasa => "Klobása",
            SpizIngredientKind::Spek => "Špek",
            SpizIngredientKind::Cibule => "Cibule",
            SpizIngredientKind::Paprika => "Paprika",
            SpizIngredientKind::Steak => "Steak",
        }
    }
}

/// 配方中的一種成分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpizIngredient {
    pub kind: SpizIngredientKind,

    /// 佔肉串重量百分比
    pub percent: Decimal,

    /// 對應原料；未設定時以合成鍵 `Špíz-<成分>` 記錄
    #[serde(default)]
    pub raw_material_id: Option<RawMaterialId>,

    /// 由原料加工成此成分的產出率（%）
    #[serde(default)]
    pub yield_percent: Option<Decimal>,
}

impl SpizIngredient {
    pub fn new(kind: SpizIngredientKind, percent: Decimal) -> Self {
        Self {
            kind,
            percent,
            raw_material_id: None,
            yield_percent: None,
        }
    }

    /// 建構器模式：設置原料
    pub fn with_raw_material(mut self, raw_material_id: impl Into<RawMaterialId>) -> Self {
        self.raw_material_id = Some(raw_material_id.into());
        self
    }

    /// 建構器模式：設置產出率
    pub fn with_yield_percent(mut self, yield_percent: Decimal) -> Self {
        self.yield_percent = Some(yield_percent);
        self
    }

    /// 需求鍵
    pub fn needs_key(&self) -> String {
        match &self.raw_material_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => format!("Špíz-{}", self.kind.label()),
        }
    }
}

/// 肉串配方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpizRecipe {
    pub ingredients: Vec<SpizIngredient>,
}

impl SpizRecipe {
    pub fn new(ingredients: Vec<SpizIngredient>) -> Self {
        Self { ingredients }
    }

    pub fn ingredient(&self, kind: SpizIngredientKind) -> Option<&SpizIngredient> {
        self.ingredients.iter().find(|i| i.kind == kind)
    }

    pub fn ingredient_mut(&mut self, kind: SpizIngredientKind) -> Option<&mut SpizIngredient> {
        self.ingredients.iter_mut().find(|i| i.kind == kind)
    }
}

impl Default for SpizRecipe {
    fn default() -> Self {
        let pct = |v: i64| Decimal::from(v);
        Self::new(vec![
            SpizIngredient::new(SpizIngredientKind::Steak, pct(40)),
            SpizIngredient::new(SpizIngredientKind::Klobasa, pct(20)),
            SpizIngredient::new(SpizIngredientKind::Spek, pct(15)),
            SpizIngredient::new(SpizIngredientKind::Cibule, pct(15)),
            SpizIngredient::new(SpizIngredientKind::Paprika, pct(10)),
        ])
    }
}

/// 肉串訂單（以公斤計）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpizOrder {
    pub date: NaiveDate,
    #[serde(default)]
    pub ordered_kg: Decimal,
    #[serde(default)]
    pub produced_kg: Decimal,
}

impl SpizOrder {
    pub fn new(date: NaiveDate, ordered_kg: Decimal) -> Self {
        Self {
            date,
            ordered_kg,
            produced_kg: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置已生產公斤數
    pub fn with_produced(mut self, produced_kg: Decimal) -> Self {
        self.produced_kg = produced_kg;
        self
    }

    /// 已訂未產公斤數
    pub fn remaining_kg(&self) -> Decimal {
        let ordered = self.ordered_kg.max(Decimal::ZERO);
        let produced = self.produced_kg.max(Decimal::ZERO);
        (ordered - produced).max(Decimal::ZERO)
    }
}
