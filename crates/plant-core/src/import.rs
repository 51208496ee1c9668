//! 原始訂單匯入（試算表或 CSV：產品代碼、訂購量、已交貨量）

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::material::RawMaterialId;
use crate::order::{OrderItem, PackagingType};
use crate::state::AppState;
use crate::{PlantError, Result};

/// 產品代碼對應的（客戶、原料、包裝）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCode {
    pub customer_id: String,
    pub raw_material_id: RawMaterialId,
    pub packaging: PackagingType,
}

impl OrderCode {
    pub fn new(
        customer_id: impl Into<String>,
        raw_material_id: impl Into<RawMaterialId>,
        packaging: PackagingType,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            raw_material_id: raw_material_id.into(),
            packaging,
        }
    }
}

/// 六位數產品代碼對照表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct OrderCodeMap {
    codes: HashMap<String, OrderCode>,
}

impl OrderCodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：添加代碼
    pub fn with_code(mut self, code: impl Into<String>, target: OrderCode) -> Self {
        self.insert(code, target);
        self
    }

    pub fn insert(&mut self, code: impl Into<String>, target: OrderCode) {
        self.codes.insert(code.into(), target);
    }

    pub fn get(&self, code: &str) -> Option<&OrderCode> {
        self.codes.get(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// 匯入結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    /// 新增的訂單項目
    pub added: usize,
    /// 覆蓋的既有項目
    pub updated: usize,
    /// 對照表中找不到的代碼
    pub unknown_codes: Vec<String>,
    /// 格式錯誤或客戶不存在而略過的列
    pub skipped_rows: usize,
    /// 已交貨箱數合計
    pub delivered_boxes: i64,
}

/// 匯入的一列（代碼、訂購量、已交貨量），數量保留原始文字
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawOrderRow {
    pub code: String,
    pub requested: String,
    #[serde(default)]
    pub delivered: String,
}

/// 是否為六位數產品代碼
pub fn is_product_code(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

/// 解析數量（接受小數逗號），四捨五入為整箱
fn parse_boxes(raw: &str) -> Option<i64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return Some(0);
    }
    normalized
        .parse::<Decimal>()
        .ok()
        .and_then(|value| value.round_dp(0).to_i64())
}

/// 匯入某日訂單（CSV 文字）
///
/// 第一列為標題列（code, requested, delivered）。以 `state.order_codes`
/// 對照代碼，同原料同包裝的既有項目會被覆蓋。
pub fn import_orders(state: &mut AppState, date: NaiveDate, csv_text: &str) -> Result<ImportSummary> {
    let reader = csv_reader_builder().from_reader(csv_text.as_bytes());
    let rows = read_csv_rows(reader);
    Ok(apply_rows(state, date, rows))
}

/// 依副檔名選擇讀取方式匯入訂單檔（`.csv`、`.xlsx`、`.xls`）
pub fn import_orders_file<P: AsRef<Path>>(
    state: &mut AppState,
    date: NaiveDate,
    path: P,
) -> Result<ImportSummary> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_csv_rows(csv_reader_builder().from_path(path)?),
        "xlsx" | "xls" => read_spreadsheet_rows(path)?,
        _ => return Err(PlantError::UnsupportedFormat(ext)),
    };

    tracing::info!("匯入訂單檔 {}（{} 列）", path.display(), rows.len());
    Ok(apply_rows(state, date, rows))
}

fn csv_reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(csv::Trim::All);
    builder
}

/// 讀取 CSV 的所有列；無法解析的列以 None 表示
fn read_csv_rows<R: std::io::Read>(mut reader: csv::Reader<R>) -> Vec<Option<RawOrderRow>> {
    reader
        .deserialize::<RawOrderRow>()
        .map(|record| match record {
            Ok(row) => Some(row),
            Err(err) => {
                tracing::warn!("匯入：無法解析的列: {}", err);
                None
            }
        })
        .collect()
}

/// 讀取試算表第一個工作表；第一列為標題列
fn read_spreadsheet_rows(path: &Path) -> Result<Vec<Option<RawOrderRow>>> {
    let mut workbook = open_workbook_auto(path)?;

    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(PlantError::InvalidInput("試算表沒有工作表".to_string()));
    };
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_lowercase())
            .collect(),
        None => return Ok(Vec::new()),
    };
    let column = |name: &str| headers.iter().position(|h| h == name);

    let (Some(code_col), Some(requested_col)) = (column("code"), column("requested")) else {
        return Err(PlantError::InvalidInput(format!(
            "試算表缺少 code 或 requested 欄: {:?}",
            headers
        )));
    };
    let delivered_col = column("delivered");

    let cell = |row: &[Data], col: usize| {
        row.get(col)
            .map(|c| c.to_string().trim().to_string())
            .unwrap_or_default()
    };

    Ok(rows
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .map(|row| {
            Some(RawOrderRow {
                code: cell(row, code_col),
                requested: cell(row, requested_col),
                delivered: delivered_col.map(|col| cell(row, col)).unwrap_or_default(),
            })
        })
        .collect())
}

/// 套用匯入列；CSV 與試算表共用
pub fn apply_rows(
    state: &mut AppState,
    date: NaiveDate,
    rows: impl IntoIterator<Item = Option<RawOrderRow>>,
) -> ImportSummary {
    let mut summary = ImportSummary::default();

    if state.order_codes.is_empty() {
        tracing::warn!("匯入：代碼對照表為空，所有代碼都會被列為未知");
    }

    for row in rows {
        match row {
            Some(row) => apply_row(state, date, row, &mut summary),
            None => summary.skipped_rows += 1,
        }
    }

    tracing::info!(
        "匯入完成：新增 {}，覆蓋 {}，未知代碼 {}，略過 {}（對照表 {} 筆）",
        summary.added,
        summary.updated,
        summary.unknown_codes.len(),
        summary.skipped_rows,
        state.order_codes.len()
    );

    summary
}

fn apply_row(state: &mut AppState, date: NaiveDate, row: RawOrderRow, summary: &mut ImportSummary) {
    if !is_product_code(&row.code) {
        tracing::warn!("匯入：代碼 {:?} 不是六位數", row.code);
        summary.skipped_rows += 1;
        return;
    }

    let (requested, delivered) = match (parse_boxes(&row.requested), parse_boxes(&row.delivered)) {
        (Some(requested), Some(delivered)) => (requested, delivered),
        _ => {
            tracing::warn!("匯入：代碼 {} 的數量無效", row.code);
            summary.skipped_rows += 1;
            return;
        }
    };

    let Some(target) = state.order_codes.get(&row.code).cloned() else {
        tracing::warn!("匯入：對照表中沒有代碼 {}", row.code);
        summary.unknown_codes.push(row.code);
        return;
    };

    let order = match state.order_for_mut(&target.customer_id, date) {
        Ok(order) => order,
        Err(err) => {
            tracing::warn!("匯入：代碼 {} 略過: {}", row.code, err);
            summary.skipped_rows += 1;
            return;
        }
    };

    match order.find_item_mut(&target.raw_material_id, target.packaging) {
        Some(item) => {
            item.box_count = requested;
            item.is_active = true;
            summary.updated += 1;
        }
        None => {
            order.add_item(OrderItem::new(
                target.raw_material_id.clone(),
                requested,
                target.packaging,
            ));
            summary.added += 1;
        }
    }
    summary.delivered_boxes += delivered.max(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Customer;
    use rstest::rstest;
    use std::io::Write;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
    }

    fn state() -> AppState {
        let mut state = AppState::new()
            .with_customer(Customer::new("BILLA", "Billa"))
            .with_customer(Customer::new("LIDL", "Lidl"));
        state.order_codes = OrderCodeMap::new()
            .with_code("100200", OrderCode::new("BILLA", "RIZKY", PackagingType::VL))
            .with_code("100201", OrderCode::new("BILLA", "STEHNA", PackagingType::OA))
            .with_code("300100", OrderCode::new("GHOST", "RIZKY", PackagingType::RB));
        state
    }

    #[test]
    fn test_import_adds_and_updates() {
        let mut state = state();
        let csv = "code,requested,delivered\n100200,12,10\n100201,\"4,0\",4\n100200,15,0\n";

        let summary = import_orders(&mut state, date(), csv).unwrap();

        assert_eq!(summary.added, 2);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.delivered_boxes, 14);

        let order = state.orders_on(date()).next().unwrap();
        assert_eq!(order.customer_id, "BILLA");
        assert_eq!(order.items.len(), 2);
        // 同代碼第二次出現時覆蓋
        assert_eq!(order.items[0].box_count, 15);
        assert_eq!(order.items[1].box_count, 4);
    }

    #[test]
    fn test_unknown_and_bad_rows_are_skipped() {
        let mut state = state();
        let csv = "code,requested,delivered\n999999,5,0\n12AB56,5,0\n100200,abc,0\n300100,5,0\n";

        let summary = import_orders(&mut state, date(), csv).unwrap();

        assert_eq!(summary.unknown_codes, vec!["999999".to_string()]);
        // 非六位數代碼、數量無效、客戶不存在
        assert_eq!(summary.skipped_rows, 3);
        assert_eq!(summary.added, 0);
        assert!(state.orders.is_empty());
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
    }

    #[test]
    fn test_import_xlsx_file() {
        let mut state = state();

        let summary = import_orders_file(&mut state, date(), fixture("orders.xlsx")).unwrap();

        assert_eq!(summary.added, 2);
        assert_eq!(summary.unknown_codes, vec!["999999".to_string()]);
        assert_eq!(summary.skipped_rows, 0);
        assert_eq!(summary.delivered_boxes, 14);

        let order = state.orders_on(date()).next().unwrap();
        // 文字代碼與數字代碼都能對照；4.4 箱四捨五入
        assert_eq!(order.items[0].raw_material_id, "RIZKY");
        assert_eq!(order.items[0].box_count, 12);
        assert_eq!(order.items[1].raw_material_id, "STEHNA");
        assert_eq!(order.items[1].box_count, 4);
    }

    #[test]
    fn test_csv_file_and_text_agree() {
        let csv = "code,requested,delivered\n100200,12,10\n100201,\"4,4\",4\n999999,5,0\n";
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(csv.as_bytes()).unwrap();

        let mut from_file = state();
        let mut from_text = state();
        let file_summary = import_orders_file(&mut from_file, date(), file.path()).unwrap();
        let text_summary = import_orders(&mut from_text, date(), csv).unwrap();

        assert_eq!(file_summary, text_summary);
        assert_eq!(from_file.orders[0].items, from_text.orders[0].items);
    }

    #[test]
    fn test_unsupported_extension() {
        let mut state = state();
        let result = import_orders_file(&mut state, date(), fixture("orders.pdf"));
        assert!(matches!(result, Err(PlantError::UnsupportedFormat(ext)) if ext == "pdf"));
    }

    #[test]
    fn test_missing_rows_count_as_skipped() {
        let mut state = state();
        let summary = apply_rows(&mut state, date(), vec![None, None]);
        assert_eq!(summary.skipped_rows, 2);
        assert!(state.orders.is_empty());
    }

    #[rstest]
    #[case("123456", true)]
    #[case("12345", false)]
    #[case("1234567", false)]
    #[case("12a456", false)]
    fn test_is_product_code(#[case] code: &str, #[case] expected: bool) {
        assert_eq!(is_product_code(code), expected);
    }

    #[rstest]
    #[case("12", Some(12))]
    #[case("12,6", Some(13))]
    #[case(" ", Some(0))]
    #[case("x", None)]
    fn test_parse_boxes(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_boxes(raw), expected);
    }
}
