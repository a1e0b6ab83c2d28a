//! 產品模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 箱體體積下限（零或次正規體積一律以此值替代）
pub const MIN_BOX_VOLUME_M3: f64 = 1e-9;

/// 候選產品（原始輸入）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// 產品編號（唯一鍵）
    #[serde(rename = "SKU")]
    pub sku: String,

    /// 描述
    #[serde(rename = "Description", default)]
    pub description: String,

    /// 箱長（公尺）
    #[serde(rename = "BoxLength_m")]
    pub box_length_m: f64,

    /// 箱寬（公尺）
    #[serde(rename = "BoxWidth_m")]
    pub box_width_m: f64,

    /// 箱高（公尺）
    #[serde(rename = "BoxHeight_m")]
    pub box_height_m: f64,

    /// 每箱重量（公斤）
    #[serde(rename = "WeightPerBox_kg")]
    pub weight_per_box_kg: f64,

    /// 每箱成本
    #[serde(rename = "CostPerBox")]
    pub cost_per_box: Decimal,

    /// 每箱利潤
    #[serde(rename = "ProfitPerBox")]
    pub profit_per_box: Decimal,

    /// 最小出貨箱數（要嘛不出，要嘛至少這麼多）
    #[serde(rename = "MinShipQty", default, skip_serializing_if = "Option::is_none")]
    pub min_ship_qty: Option<f64>,

    /// 覆蓋天數
    #[serde(rename = "CoverageDays", default, skip_serializing_if = "Option::is_none")]
    pub coverage_days: Option<f64>,

    /// 日銷量（箱/天）
    #[serde(rename = "SalesPerDay", default, skip_serializing_if = "Option::is_none")]
    pub sales_per_day: Option<f64>,

    /// 現有可用庫存（箱）
    #[serde(rename = "AvailableStock", default, skip_serializing_if = "Option::is_none")]
    pub available_stock: Option<f64>,

    /// 提前期（天），未提供時使用全域預設值
    #[serde(rename = "LeadTimeDays", default, skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<f64>,
}

impl Product {
    /// 創建新的產品記錄
    pub fn new(
        sku: impl Into<String>,
        dimensions_m: (f64, f64, f64),
        weight_per_box_kg: f64,
        cost_per_box: Decimal,
        profit_per_box: Decimal,
    ) -> Self {
        let (box_length_m, box_width_m, box_height_m) = dimensions_m;
        Self {
            sku: sku.into(),
            description: String::new(),
            box_length_m,
            box_width_m,
            box_height_m,
            weight_per_box_kg,
            cost_per_box,
            profit_per_box,
            min_ship_qty: None,
            coverage_days: None,
            sales_per_day: None,
            available_stock: None,
            lead_time_days: None,
        }
    }

    /// 建構器模式：設置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// 建構器模式：設置最小出貨量
    pub fn with_min_ship_qty(mut self, qty: f64) -> Self {
        self.min_ship_qty = Some(qty);
        self
    }

    /// 建構器模式：設置覆蓋天數
    pub fn with_coverage_days(mut self, days: f64) -> Self {
        self.coverage_days = Some(days);
        self
    }

    /// 建構器模式：設置日銷量
    pub fn with_sales_per_day(mut self, sales: f64) -> Self {
        self.sales_per_day = Some(sales);
        self
    }

    /// 建構器模式：設置可用庫存
    pub fn with_available_stock(mut self, stock: f64) -> Self {
        self.available_stock = Some(stock);
        self
    }

    /// 建構器模式：設置提前期
    pub fn with_lead_time_days(mut self, days: f64) -> Self {
        self.lead_time_days = Some(days);
        self
    }

    /// 每箱體積（立方公尺），低於 [`MIN_BOX_VOLUME_M3`] 時以下限替代
    pub fn volume_per_box_m3(&self) -> f64 {
        let volume = self.box_length_m * self.box_width_m * self.box_height_m;
        if volume < MIN_BOX_VOLUME_M3 {
            MIN_BOX_VOLUME_M3
        } else {
            volume
        }
    }
}

/// 衍生產品（特徵計算後，不可變）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedProduct {
    /// 原始產品
    pub product: Product,

    /// 實際採用的提前期（天）
    pub lead_time_days: f64,

    /// 提前期內需求
    pub demand_during_lead_time: f64,

    /// 覆蓋期內需求
    pub demand_during_coverage: f64,

    /// 總需求
    pub total_needed: f64,

    /// 建議訂購量（亦即最大可出貨箱數）
    pub order_qty: u64,

    /// 最小出貨箱數（整數）
    pub min_ship_qty: u64,

    /// 每箱體積（立方公尺）
    pub volume_per_box_m3: f64,

    /// 每立方公尺利潤
    pub profit_per_cubic_meter: f64,

    /// 正規化利潤
    pub n_profit: f64,

    /// 正規化空間效益
    pub n_density: f64,

    /// 正規化銷售速度
    pub n_velocity: f64,

    /// 綜合評分
    pub score: f64,
}

impl DerivedProduct {
    pub fn sku(&self) -> &str {
        &self.product.sku
    }

    /// 最大可出貨箱數（等於建議訂購量）
    pub fn max_shippable(&self) -> u64 {
        self.order_qty
    }

    /// 最小出貨量是否超過可出貨量（此 SKU 永遠不會被選中）
    pub fn is_unshippable(&self) -> bool {
        self.min_ship_qty > self.order_qty
    }
}
