//! 客戶箱重表

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::material::RawMaterialId;
use crate::order::PackagingType;

/// 未設定箱重時的預設值（公克／箱，散裝假設）
pub const DEFAULT_BOX_WEIGHT_GRAMS: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// 某客戶某原料的每箱重量（公克），按包裝類型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxWeight {
    pub customer_id: String,
    pub raw_material_id: RawMaterialId,
    #[serde(default, rename = "OA")]
    pub oa: Option<Decimal>,
    #[serde(default, rename = "RB")]
    pub rb: Option<Decimal>,
    #[serde(default, rename = "VL")]
    pub vl: Option<Decimal>,
}

impl BoxWeight {
    pub fn new(customer_id: impl Into<String>, raw_material_id: impl Into<RawMaterialId>) -> Self {
        Self {
            customer_id: customer_id.into(),
            raw_material_id: raw_material_id.into(),
            oa: None,
            rb: None,
            vl: None,
        }
    }

    /// 建構器模式：設置某包裝類型的箱重
    pub fn with_grams(mut self, packaging: PackagingType, grams: Decimal) -> Self {
        *self.slot_mut(packaging) = Some(grams);
        self
    }

    pub fn grams(&self, packaging: PackagingType) -> Option<Decimal> {
        match packaging {
            PackagingType::OA => self.oa,
            PackagingType::RB => self.rb,
            PackagingType::VL => self.vl,
        }
    }

    fn slot_mut(&mut self, packaging: PackagingType) -> &mut Option<Decimal> {
        match packaging {
            PackagingType::OA => &mut self.oa,
            PackagingType::RB => &mut self.rb,
            PackagingType::VL => &mut self.vl,
        }
    }
}

/// 箱重表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct BoxWeightTable {
    entries: Vec<BoxWeight>,
}

impl BoxWeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增或覆蓋（同客戶同原料只保留一筆）
    pub fn upsert(&mut self, entry: BoxWeight) {
        match self.entries.iter_mut().find(|e| {
            e.customer_id == entry.customer_id && e.raw_material_id == entry.raw_material_id
        }) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// 查詢箱重（公克）；未設定時回傳 None
    pub fn lookup(
        &self,
        customer_id: &str,
        raw_material_id: &str,
        packaging: PackagingType,
    ) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|e| e.customer_id == customer_id && e.raw_material_id == raw_material_id)
            .and_then(|e| e.grams(packaging))
            .filter(|grams| *grams > Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<BoxWeight> for BoxWeightTable {
    fn from_iter<I: IntoIterator<Item = BoxWeight>>(iter: I) -> Self {
        let mut table = BoxWeightTable::new();
        for entry in iter {
            table.upsert(entry);
        }
        table
    }
}
