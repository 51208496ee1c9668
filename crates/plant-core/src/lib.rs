//! # Plant Core
//!
//! 核心資料模型與類型定義（原料、訂單、箱重、計劃生產、KFC / Špíz 子域）

pub mod box_weight;
pub mod config;
pub mod import;
pub mod kfc;
pub mod material;
pub mod order;
pub mod persistence;
pub mod planned;
pub mod spiz;
pub mod state;

// Re-export 主要類型
pub use box_weight::{BoxWeight, BoxWeightTable, DEFAULT_BOX_WEIGHT_GRAMS};
pub use config::{PlantSettings, ThighSplit};
pub use import::{ImportSummary, OrderCode, OrderCodeMap, RawOrderRow};
pub use kfc::{KfcOrder, KfcProduct};
pub use material::{MaterialKind, MixComponent, RawMaterial, RawMaterialId, StockLevel};
pub use order::{Customer, Order, OrderItem, PackagingType};
pub use persistence::BackupBundle;
pub use planned::{PlannedAction, PlannedActionKind};
pub use spiz::{SpizIngredient, SpizIngredientKind, SpizOrder, SpizRecipe};
pub use state::AppState;

/// 工廠資料錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlantError {
    #[error("找不到原料: {0}")]
    MaterialNotFound(String),

    #[error("找不到客戶: {0}")]
    CustomerNotFound(String),

    #[error("混合配方無效: {0}")]
    InvalidMix(String),

    #[error("輸入無效: {0}")]
    InvalidInput(String),

    #[error("JSON 錯誤: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV 錯誤: {0}")]
    Csv(#[from] csv::Error),

    #[error("試算表錯誤: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("不支援的檔案格式: {0}")]
    UnsupportedFormat(String),

    #[error("IO 錯誤: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlantError>;
