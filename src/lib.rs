//! # Loadplan
//!
//! 貨櫃裝載選品規劃：在容積、載重、預算與最小出貨量限制下，
//! 決定每個 SKU 的裝載箱數以最大化綜合評分。

pub use load_calc::{normalize_minmax, FeatureCalculator, ScoreNormalizer};
pub use load_core::{
    DerivedProduct, LoadError, OptimizationConfig, OptimizationRequest, Product, SelectedItem,
    SolutionRecord, SolveStatus,
};
pub use load_optimizer::{ContainerOptimizer, MipSolver, SolverAdapter};
pub use rust_decimal::Decimal;

/// 以預設求解器執行一次優化
pub fn optimize(products: &[Product], config: OptimizationConfig) -> SolutionRecord {
    ContainerOptimizer::new(config).optimize(products)
}

/// JSON 邊界：`{"products": [...], "config": {...}}` → 裝櫃方案 JSON
///
/// 永遠回傳格式完整的方案；輸入無法解析時 status 為 "Error"。
pub fn optimize_json(input: &str) -> String {
    let record = match OptimizationRequest::from_json(input) {
        Ok(request) => optimize(&request.products, request.config),
        Err(err) => {
            tracing::warn!("請求解析失敗: {}", err);
            SolutionRecord::error(err.to_string())
        }
    };

    serde_json::to_string(&record).unwrap_or_else(|err| {
        format!(
            r#"{{"status":"Error","statusMessage":{},"totalBoxes":0,"totalVolume_m3":0.0,"volumeUtilization":0.0,"totalWeight_kg":0.0,"weightUtilization":0.0,"totalCost":0.0,"budgetUtilization":0.0,"totalProfit":0.0,"totalScore":0.0,"selectedItems":[]}}"#,
            serde_json::Value::from(err.to_string())
        )
    })
}
