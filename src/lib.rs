//! # Plant
//!
//! 禽肉加工廠每日原料需求引擎：資料模型（`plant_core`）與計算（`plant_calc`）

pub use plant_calc;
pub use plant_core;

pub use plant_calc::{
    compute_daily_needs, BalanceCalculator, MaterialBalance, NeedsReport, NeedsResolver, NeedsScope,
    NeedsWarning, WarningSeverity,
};
pub use plant_core::{AppState, PlantError, PlantSettings, Result};
