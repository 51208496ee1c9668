//! 原料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PlantError, Result};

/// 原料ID
pub type RawMaterialId = String;

/// 原料種類
///
/// 同一筆原料記錄可能是實際原料，也可能是由其他原料組成的「虛擬產品」。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialKind {
    /// 一般原料
    #[default]
    Plain,

    /// 混合（按百分比由多種原料組成）
    Mix { components: Vec<MixComponent> },

    /// 醃製／修整產品：訂購量為成品重量
    Product {
        base_id: RawMaterialId,
        /// 醃料佔成品重量百分比（0-100）
        #[serde(default)]
        marinade_percent: Decimal,
        /// 修整損耗百分比（0-100）
        #[serde(default)]
        loss_percent: Decimal,
    },

    /// 分級（按重量範圍）產品
    Calibrated {
        base_id: RawMaterialId,
        #[serde(default)]
        range: String,
    },
}

impl MaterialKind {
    /// 編輯時檢查配方（讀取時不檢查，計算器信任已儲存的資料）
    pub fn validate(&self) -> Result<()> {
        let hundred = Decimal::ONE_HUNDRED;
        let in_range = |value: Decimal| value >= Decimal::ZERO && value <= hundred;

        match self {
            MaterialKind::Plain => Ok(()),
            MaterialKind::Mix { components } => {
                if components.is_empty() {
                    return Err(PlantError::InvalidMix("混合沒有任何成分".to_string()));
                }
                if let Some(bad) = components.iter().find(|c| !in_range(c.percentage)) {
                    return Err(PlantError::InvalidMix(format!(
                        "成分 {} 的百分比 {} 超出範圍",
                        bad.raw_material_id, bad.percentage
                    )));
                }
                let total: Decimal = components.iter().map(|c| c.percentage).sum();
                if total != hundred {
                    return Err(PlantError::InvalidMix(format!(
                        "成分百分比總和為 {}，應為 100",
                        total
                    )));
                }
                Ok(())
            }
            MaterialKind::Product {
                base_id,
                marinade_percent,
                loss_percent,
            } => {
                if base_id.is_empty() {
                    return Err(PlantError::InvalidInput("產品缺少基礎原料".to_string()));
                }
                if !in_range(*marinade_percent) || !in_range(*loss_percent) {
                    return Err(PlantError::InvalidInput(format!(
                        "醃料 {} % 或損耗 {} % 超出範圍",
                        marinade_percent, loss_percent
                    )));
                }
                Ok(())
            }
            MaterialKind::Calibrated { base_id, .. } => {
                if base_id.is_empty() {
                    return Err(PlantError::InvalidInput("分級產品缺少基礎原料".to_string()));
                }
                Ok(())
            }
        }
    }

    /// 基礎原料（僅產品與分級產品有）
    pub fn base_id(&self) -> Option<&str> {
        match self {
            MaterialKind::Product { base_id, .. } | MaterialKind::Calibrated { base_id, .. } => {
                Some(base_id)
            }
            MaterialKind::Plain | MaterialKind::Mix { .. } => None,
        }
    }
}

/// 混合成分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixComponent {
    pub raw_material_id: RawMaterialId,
    pub percentage: Decimal,
}

impl MixComponent {
    pub fn new(raw_material_id: impl Into<RawMaterialId>, percentage: Decimal) -> Self {
        Self {
            raw_material_id: raw_material_id.into(),
            percentage,
        }
    }
}

/// 庫存量（以棧板計，另加零散箱數調整）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StockLevel {
    #[serde(default)]
    pub pallets: Decimal,
    #[serde(default)]
    pub adjustment_boxes: Decimal,
}

impl StockLevel {
    pub fn new(pallets: Decimal) -> Self {
        Self {
            pallets,
            adjustment_boxes: Decimal::ZERO,
        }
    }

    /// 換算為公斤
    pub fn on_hand_kg(&self, pallet_weight_kg: Decimal, box_weight_kg: Decimal) -> Decimal {
        self.pallets
            .saturating_mul(pallet_weight_kg)
            .saturating_add(self.adjustment_boxes.saturating_mul(box_weight_kg))
    }
}

/// 原料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMaterial {
    /// 原料ID
    pub id: RawMaterialId,

    /// 顯示名稱
    pub name: String,

    /// 每棧板重量（公斤）
    #[serde(default)]
    pub pallet_weight_kg: Decimal,

    /// 每箱重量（公斤）
    #[serde(default)]
    pub box_weight_kg: Decimal,

    /// 現有庫存
    #[serde(default)]
    pub stock: StockLevel,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub kind: MaterialKind,
}

fn default_true() -> bool {
    true
}

impl RawMaterial {
    /// 創建新的一般原料
    pub fn new(id: impl Into<RawMaterialId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pallet_weight_kg: Decimal::ZERO,
            box_weight_kg: Decimal::ZERO,
            stock: StockLevel::default(),
            is_active: true,
            kind: MaterialKind::Plain,
        }
    }

    /// 建構器模式：設置種類
    pub fn with_kind(mut self, kind: MaterialKind) -> Self {
        self.kind = kind;
        self
    }

    /// 建構器模式：設置棧板與箱重量
    pub fn with_weights(mut self, pallet_weight_kg: Decimal, box_weight_kg: Decimal) -> Self {
        self.pallet_weight_kg = pallet_weight_kg;
        self.box_weight_kg = box_weight_kg;
        self
    }

    /// 建構器模式：設置庫存
    pub fn with_stock(mut self, stock: StockLevel) -> Self {
        self.stock = stock;
        self
    }

    /// 建構器模式：標記為停用
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn is_mix(&self) -> bool {
        matches!(self.kind, MaterialKind::Mix { .. })
    }

    pub fn is_product(&self) -> bool {
        matches!(self.kind, MaterialKind::Product { .. })
    }

    pub fn is_calibrated(&self) -> bool {
        matches!(self.kind, MaterialKind::Calibrated { .. })
    }

    /// 現有庫存（公斤）
    pub fn on_hand_kg(&self) -> Decimal {
        self.stock.on_hand_kg(self.pallet_weight_kg, self.box_weight_kg)
    }
}
