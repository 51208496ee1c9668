//! 工廠參數配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::box_weight::DEFAULT_BOX_WEIGHT_GRAMS;
use crate::material::RawMaterialId;
use crate::spiz::SpizRecipe;

/// 工廠參數配置（隨狀態一併儲存）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSettings {
    /// 客戶未設定箱重時使用的預設值（公克／箱）
    #[serde(default = "default_box_weight_grams")]
    pub default_box_weight_grams: Decimal,

    /// 下腿／上腿庫存拆分
    #[serde(default)]
    pub thigh_split: Option<ThighSplit>,

    /// 肉串配方
    #[serde(default)]
    pub spiz_recipe: SpizRecipe,

    /// řízky 原料（řízky 報表用）
    #[serde(default)]
    pub schnitzel_material_id: Option<RawMaterialId>,
}

fn default_box_weight_grams() -> Decimal {
    DEFAULT_BOX_WEIGHT_GRAMS
}

impl Default for PlantSettings {
    fn default() -> Self {
        Self {
            default_box_weight_grams: DEFAULT_BOX_WEIGHT_GRAMS,
            thigh_split: None,
            spiz_recipe: SpizRecipe::default(),
            schnitzel_material_id: None,
        }
    }
}

impl PlantSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置預設箱重
    pub fn with_default_box_weight_grams(mut self, grams: Decimal) -> Self {
        self.default_box_weight_grams = grams;
        self
    }

    /// 建構器模式：設置腿肉拆分
    pub fn with_thigh_split(mut self, split: ThighSplit) -> Self {
        self.thigh_split = Some(split);
        self
    }

    /// 建構器模式：設置肉串配方
    pub fn with_spiz_recipe(mut self, recipe: SpizRecipe) -> Self {
        self.spiz_recipe = recipe;
        self
    }

    /// 建構器模式：設置 řízky 原料
    pub fn with_schnitzel_material(mut self, id: impl Into<RawMaterialId>) -> Self {
        self.schnitzel_material_id = Some(id.into());
        self
    }

    /// 有效的預設箱重；配置為 0 或負數時退回 10 000 g
    pub fn effective_default_box_weight_grams(&self) -> Decimal {
        if self.default_box_weight_grams > Decimal::ZERO {
            self.default_box_weight_grams
        } else {
            DEFAULT_BOX_WEIGHT_GRAMS
        }
    }
}

/// 下腿庫存增加時，按固定比例自動加到上腿庫存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThighSplit {
    pub lower_id: RawMaterialId,
    pub upper_id: RawMaterialId,
    /// 上腿佔下腿增量的百分比
    pub upper_percent: Decimal,
}

impl ThighSplit {
    pub fn new(
        lower_id: impl Into<RawMaterialId>,
        upper_id: impl Into<RawMaterialId>,
        upper_percent: Decimal,
    ) -> Self {
        Self {
            lower_id: lower_id.into(),
            upper_id: upper_id.into(),
            upper_percent,
        }
    }

    /// 下腿增量對應的上腿增量；減少或不變時為 0
    pub fn upper_credit(&self, lower_increase: Decimal) -> Decimal {
        if lower_increase <= Decimal::ZERO || self.upper_percent <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        lower_increase.saturating_mul(self.upper_percent / Decimal::ONE_HUNDRED)
    }
}
