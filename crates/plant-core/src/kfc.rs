//! KFC 子域：獨立的產品目錄與訂單

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::material::RawMaterialId;

/// KFC 產品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KfcProduct {
    pub id: String,
    pub name: String,

    /// 每箱重量（公斤）
    #[serde(default)]
    pub box_weight_kg: Decimal,

    /// 消耗的原料；未設定時以合成鍵 `KFC-<名稱>` 記錄
    #[serde(default)]
    pub raw_material_id: Option<RawMaterialId>,

    /// 產出率（%），例如 Maykawa 去骨線由腿肉產出牛排
    #[serde(default)]
    pub yield_percent: Option<Decimal>,
}

impl KfcProduct {
    pub fn new(id: impl Into<String>, name: impl Into<String>, box_weight_kg: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            box_weight_kg,
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
            _ => format!("KFC-{}", self.name),
        }
    }
}

/// KFC 訂單
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KfcOrder {
    pub date: NaiveDate,
    pub product_id: String,
    #[serde(default)]
    pub ordered_boxes: i64,
    #[serde(default)]
    pub produced_boxes: i64,
}

impl KfcOrder {
    pub fn new(date: NaiveDate, product_id: impl Into<String>, ordered_boxes: i64) -> Self {
        Self {
            date,
            product_id: product_id.into(),
            ordered_boxes,
            produced_boxes: 0,
        }
    }

    /// 建構器模式：設置已生產箱數
    pub fn with_produced(mut self, produced_boxes: i64) -> Self {
        self.produced_boxes = produced_boxes;
        self
    }

    /// 已訂未產箱數
    pub fn remaining_boxes(&self) -> i64 {
        (self.ordered_boxes.max(0) - self.produced_boxes.max(0)).max(0)
    }
}
