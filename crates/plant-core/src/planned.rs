//! 計劃生產模型（非客戶直接訂單的生產承諾）

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::material::RawMaterialId;
use crate::order::PackagingType;

/// 計劃生產類型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlannedActionKind {
    /// 針對客戶＋原料＋包裝的生產
    Production {
        customer_id: String,
        raw_material_id: RawMaterialId,
        packaging: PackagingType,
    },
    /// Lima：自由命名的生產批次，不連結原料
    Lima { name: String },
}

/// 計劃生產
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedAction {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: PlannedActionKind,
    /// 每日箱數
    #[serde(default)]
    pub daily_boxes: BTreeMap<NaiveDate, i64>,
}

impl PlannedAction {
    /// 創建新的計劃生產
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, kind: PlannedActionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_date,
            end_date,
            kind,
            daily_boxes: BTreeMap::new(),
        }
    }

    /// 建構器模式：設置某日箱數
    pub fn with_boxes(mut self, date: NaiveDate, boxes: i64) -> Self {
        self.daily_boxes.insert(date, boxes);
        self
    }

    /// 日期是否在計劃範圍內（含首尾）
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// 某日有效箱數（範圍外、負數或缺失均為 0）
    pub fn boxes_on(&self, date: NaiveDate) -> i64 {
        if !self.covers(date) {
            return 0;
        }
        self.daily_boxes.get(&date).copied().unwrap_or(0).max(0)
    }

    pub fn is_lima(&self) -> bool {
        matches!(self.kind, PlannedActionKind::Lima { .. })
    }
}
