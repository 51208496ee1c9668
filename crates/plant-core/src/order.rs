//! 客戶訂單模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::material::RawMaterialId;

/// 包裝類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackagingType {
    /// 小托盤
    OA,
    /// 家庭包
    RB,
    /// 散裝（volně loženo）
    VL,
}

impl PackagingType {
    pub fn code(&self) -> &'static str {
        match self {
            PackagingType::OA => "OA",
            PackagingType::RB => "RB",
            PackagingType::VL => "VL",
        }
    }

    /// 解析包裝代碼（不分大小寫）
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "OA" => Some(PackagingType::OA),
            "RB" => Some(PackagingType::RB),
            "VL" => Some(PackagingType::VL),
            _ => None,
        }
    }
}

/// 客戶
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// KFC 客戶的訂單走獨立的 KFC 子域
    #[serde(default)]
    pub is_kfc: bool,
}

impl Customer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_kfc: false,
        }
    }

    pub fn kfc(mut self) -> Self {
        self.is_kfc = true;
        self
    }
}

/// 訂單項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub raw_material_id: RawMaterialId,

    /// 箱數（負數或缺失視為 0）
    #[serde(default)]
    pub box_count: i64,

    pub packaging: PackagingType,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl OrderItem {
    pub fn new(raw_material_id: impl Into<RawMaterialId>, box_count: i64, packaging: PackagingType) -> Self {
        Self {
            raw_material_id: raw_material_id.into(),
            box_count,
            packaging,
            is_active: true,
        }
    }

    /// 建構器模式：設置是否啟用
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// 有效箱數
    pub fn effective_boxes(&self) -> i64 {
        self.box_count.max(0)
    }
}

/// 訂單（每個客戶每天一張）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// 創建新的訂單
    pub fn new(customer_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id: customer_id.into(),
            date,
            items: Vec::new(),
        }
    }

    /// 建構器模式：添加項目
    pub fn with_item(mut self, item: OrderItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn add_item(&mut self, item: OrderItem) {
        self.items.push(item);
    }

    /// 只有啟用的項目計入需求
    pub fn active_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter().filter(|item| item.is_active)
    }

    /// 找到同原料同包裝的項目
    pub fn find_item_mut(
        &mut self,
        raw_material_id: &str,
        packaging: PackagingType,
    ) -> Option<&mut OrderItem> {
        self.items
            .iter_mut()
            .find(|item| item.raw_material_id == raw_material_id && item.packaging == packaging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        let order = Order::new("BILLA", date)
            .with_item(OrderItem::new("RIZKY", 10, PackagingType::VL))
            .with_item(OrderItem::new("STEHNA", 4, PackagingType::OA).with_active(false));

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.active_items().count(), 1);
    }

    #[test]
    fn test_negative_boxes_count_as_zero() {
        let item = OrderItem::new("RIZKY", -5, PackagingType::RB);
        assert_eq!(item.effective_boxes(), 0);
    }

    #[test]
    fn test_packaging_parse() {
        assert_eq!(PackagingType::parse(" vl "), Some(PackagingType::VL));
        assert_eq!(PackagingType::parse("XX"), None);
        assert_eq!(PackagingType::OA.code(), "OA");
    }

    #[test]
    fn test_item_defaults_from_json() {
        let item: OrderItem =
            serde_json::from_str(r#"{"raw_material_id": "RIZKY", "packaging": "VL"}"#).unwrap();
        assert_eq!(item.box_count, 0);
        assert!(item.is_active);
    }
}
