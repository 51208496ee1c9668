//! # Plant Calculation Engine
//!
//! 每日原料需求計算：訂單與計劃生產展開、混合／產品回推、KFC 與 Špíz 子域合併

pub mod balance;
pub mod demand;
pub mod expansion;
pub mod report;
pub mod resolver;
pub mod stock;
pub mod subdomain;

use std::collections::HashMap;

use chrono::NaiveDate;
use plant_core::RawMaterialId;
use rust_decimal::Decimal;
use serde::Serialize;

// Re-export 主要類型
pub use balance::{BalanceCalculator, MaterialBalance};
pub use demand::{Contribution, DemandLine, DemandSource};
pub use resolver::{compute_daily_needs, NeedsResolver};
pub use stock::{apply_stock_edit, StockEdit};

/// 計算範圍
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum NeedsScope {
    /// 全部來源
    #[default]
    All,
    /// 排除 KFC 子域與 KFC 客戶的訂單
    NonKfc,
}

impl NeedsScope {
    pub fn includes_kfc(&self) -> bool {
        *self == NeedsScope::All
    }
}

/// 需求計算結果
#[derive(Debug, Clone, Serialize)]
pub struct NeedsReport {
    pub date: NaiveDate,

    pub scope: NeedsScope,

    /// 原料ID（或合成鍵）→ 需求公斤數；零需求不出現
    pub needs: HashMap<RawMaterialId, Decimal>,

    /// 需求來源追溯
    pub contributions: HashMap<RawMaterialId, Vec<Contribution>>,

    /// 警告信息（所有退回預設值的情況）
    pub warnings: Vec<NeedsWarning>,

    /// 計算耗時（毫秒）
    #[serde(skip)]
    pub calculation_time_ms: Option<u128>,
}

impl NeedsReport {
    /// 創建空的計算結果
    pub fn empty(date: NaiveDate, scope: NeedsScope) -> Self {
        Self {
            date,
            scope,
            needs: HashMap::new(),
            contributions: HashMap::new(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 某鍵的需求（無需求時為 0）
    pub fn need(&self, key: &str) -> Decimal {
        self.needs.get(key).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn total_kg(&self) -> Decimal {
        self.needs
            .values()
            .fold(Decimal::ZERO, |total, kg| total.saturating_add(*kg))
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: NeedsWarning) {
        self.warnings.push(warning);
    }

    /// 累加需求；非正數不記錄，溢位時不累加並記錄警告
    pub(crate) fn accumulate(&mut self, key: &str, kg: Decimal, contribution: Contribution) {
        if kg <= Decimal::ZERO {
            return;
        }
        let current = self.need(key);
        let Some(total) = current.checked_add(kg) else {
            tracing::warn!("{} 累加 {} kg 溢位，不計入", key, kg);
            self.add_warning(NeedsWarning::warning(key, format!("累加 {} kg 超出可計算範圍，不計入", kg)));
            return;
        };
        self.needs.insert(key.to_string(), total);
        self.contributions
            .entry(key.to_string())
            .or_default()
            .push(contribution);
    }
}

/// 計算警告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeedsWarning {
    /// 相關的原料、客戶或產品
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl NeedsWarning {
    pub fn new(subject: impl Into<String>, message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            severity,
        }
    }

    pub fn info(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
