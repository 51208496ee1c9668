//! 每日原料需求計算器

use std::collections::BTreeMap;

use chrono::NaiveDate;
use plant_core::AppState;

use crate::demand::DemandCollector;
use crate::expansion::ExpansionCalculator;
use crate::subdomain::{KfcNeeds, SpizNeeds};
use crate::{NeedsReport, NeedsScope};

/// 需求計算器（只讀狀態快照）
pub struct NeedsResolver<'a> {
    state: &'a AppState,
}

impl<'a> NeedsResolver<'a> {
    /// 創建新的需求計算器
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// 主計算入口：某日每種原料需要多少公斤
    pub fn compute_daily_needs(&self, date: NaiveDate, scope: NeedsScope) -> NeedsReport {
        tracing::info!("開始需求計算：{}，範圍 {:?}", date, scope);
        let start_time = std::time::Instant::now();
        let mut report = NeedsReport::empty(date, scope);

        // Step 1: 收集需求行（訂單、計劃生產）
        tracing::debug!("Step 1: 收集需求行");
        let lines = DemandCollector::collect(self.state, date, scope, &mut report);

        // Step 2: 展開複合原料
        tracing::debug!("Step 2: 展開複合原料");
        for line in &lines {
            ExpansionCalculator::expand(self.state, line, &mut report);
        }

        // Step 3: 合併子域
        tracing::debug!("Step 3: 合併 KFC / Špíz");
        if scope.includes_kfc() {
            KfcNeeds::merge(self.state, date, &mut report);
        }
        SpizNeeds::merge(self.state, date, &mut report);

        // Step 4: 零需求不出現
        report.needs.retain(|_, kg| !kg.is_zero());
        report.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!(
            "需求計算完成：原料 {} 種，警告 {} 筆，耗時 {:?}",
            report.needs.len(),
            report.warnings.len(),
            start_time.elapsed()
        );

        report
    }

    /// 連續多日的需求（含首尾）
    pub fn compute_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        scope: NeedsScope,
    ) -> BTreeMap<NaiveDate, NeedsReport> {
        start
            .iter_days()
            .take_while(|date| *date <= end)
            .map(|date| (date, self.compute_daily_needs(date, scope)))
            .collect()
    }
}

/// 便捷函式
pub fn compute_daily_needs(state: &AppState, date: NaiveDate, scope: NeedsScope) -> NeedsReport {
    NeedsResolver::new(state).compute_daily_needs(date, scope)
}
