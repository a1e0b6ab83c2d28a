//! 裝櫃方案模型（優化結果）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 求解狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// 找到並證明最優解
    Optimal,
    /// 無可行解
    Infeasible,
    /// 目標無界
    Unbounded,
    /// 結果不確定
    Undefined,
    /// 驗證或求解器錯誤
    Error,
}

impl SolveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::Undefined => "Undefined",
            SolveStatus::Error => "Error",
        }
    }

    pub fn is_optimal(&self) -> bool {
        *self == SolveStatus::Optimal
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 選中的 SKU 明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedItem {
    #[serde(rename = "SKU")]
    pub sku: String,

    #[serde(rename = "Description")]
    pub description: String,

    /// 裝載箱數
    #[serde(rename = "SelectedQty")]
    pub selected_qty: u64,

    /// 佔用體積（立方公尺）
    #[serde(rename = "VolumeUsed_m3")]
    pub volume_used_m3: f64,

    /// 佔用重量（公斤）
    #[serde(rename = "WeightUsed_kg")]
    pub weight_used_kg: f64,

    #[serde(rename = "TotalCost")]
    pub total_cost: Decimal,

    #[serde(rename = "TotalProfit")]
    pub total_profit: Decimal,

    /// 評分貢獻（箱數 × 單箱評分）
    #[serde(rename = "Score")]
    pub score: f64,

    /// 建議訂購量（原樣帶出）
    #[serde(rename = "OrderQty")]
    pub order_qty: u64,
}

/// 裝櫃方案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionRecord {
    pub status: SolveStatus,

    pub status_message: String,

    pub total_boxes: u64,

    #[serde(rename = "totalVolume_m3")]
    pub total_volume_m3: f64,

    /// 容積利用率（%）
    pub volume_utilization: f64,

    #[serde(rename = "totalWeight_kg")]
    pub total_weight_kg: f64,

    /// 載重利用率（%）
    pub weight_utilization: f64,

    pub total_cost: Decimal,

    /// 預算利用率（%）
    pub budget_utilization: f64,

    pub total_profit: Decimal,

    pub total_score: f64,

    pub selected_items: Vec<SelectedItem>,

    /// 計算耗時（毫秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solve_time_ms: Option<u64>,
}

impl SolutionRecord {
    /// 創建只有狀態與訊息的空方案（數量欄位全為零）
    pub fn empty(status: SolveStatus, status_message: impl Into<String>) -> Self {
        Self {
            status,
            status_message: status_message.into(),
            total_boxes: 0,
            total_volume_m3: 0.0,
            volume_utilization: 0.0,
            total_weight_kg: 0.0,
            weight_utilization: 0.0,
            total_cost: Decimal::ZERO,
            budget_utilization: 0.0,
            total_profit: Decimal::ZERO,
            total_score: 0.0,
            selected_items: Vec::new(),
            solve_time_ms: None,
        }
    }

    /// 創建錯誤方案
    pub fn error(message: impl Into<String>) -> Self {
        Self::empty(SolveStatus::Error, message)
    }

    /// 建構器模式：設置計算耗時
    pub fn with_solve_time_ms(mut self, millis: u64) -> Self {
        self.solve_time_ms = Some(millis);
        self
    }

    /// 查找某 SKU 的裝載箱數（未選中為 0）
    pub fn quantity_of(&self, sku: &str) -> u64 {
        self.selected_items
            .iter()
            .find(|item| item.sku == sku)
            .map(|item| item.selected_qty)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_error_record_is_zeroed() {
        let record = SolutionRecord::error("輸入驗證失敗");

        assert_eq!(record.status, SolveStatus::Error);
        assert_eq!(record.status_message, "輸入驗證失敗");
        assert_eq!(record.total_boxes, 0);
        assert_eq!(record.total_cost, Decimal::ZERO);
        assert!(record.selected_items.is_empty());
        assert_eq!(record.quantity_of("ANY"), 0);
    }

    #[test]
    fn test_serialize_wire_names() {
        let record = SolutionRecord::empty(SolveStatus::Infeasible, "Infeasible");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["status"], "Infeasible");
        assert_eq!(value["statusMessage"], "Infeasible");
        assert_eq!(value["totalBoxes"], 0);
        assert_eq!(value["totalVolume_m3"], 0.0);
        assert_eq!(value["totalWeight_kg"], 0.0);
        assert_eq!(value["budgetUtilization"], 0.0);
        assert!(value["selectedItems"].as_array().unwrap().is_empty());
        assert!(value.get("solveTimeMs").is_none());
    }

    #[test]
    fn test_serialize_selected_item() {
        let item = SelectedItem {
            sku: "A-1".to_string(),
            description: "Widget".to_string(),
            selected_qty: 4,
            volume_used_m3: 0.4,
            weight_used_kg: 32.0,
            total_cost: Decimal::from(80),
            total_profit: Decimal::from(28),
            score: 2.0,
            order_qty: 10,
        };
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["SKU"], "A-1");
        assert_eq!(value["SelectedQty"], 4);
        assert_eq!(value["TotalCost"], 80.0);
        assert_eq!(value["OrderQty"], 10);
    }

    #[rstest]
    #[case(SolveStatus::Optimal, "Optimal")]
    #[case(SolveStatus::Infeasible, "Infeasible")]
    #[case(SolveStatus::Unbounded, "Unbounded")]
    #[case(SolveStatus::Undefined, "Undefined")]
    #[case(SolveStatus::Error, "Error")]
    fn test_status_strings(#[case] status: SolveStatus, #[case] expected: &str) {
        assert_eq!(status.to_string(), expected);
        assert_eq!(serde_json::to_value(status).unwrap(), expected);
    }
}
