//! # Load Core
//!
//! 裝櫃規劃核心資料模型與類型定義

pub mod config;
pub mod product;
pub mod request;
pub mod solution;

// Re-export 主要類型
pub use config::OptimizationConfig;
pub use product::{DerivedProduct, Product};
pub use request::OptimizationRequest;
pub use solution::{SelectedItem, SolutionRecord, SolveStatus};

/// 裝櫃規劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("輸入驗證失敗: {0}")]
    Validation(String),

    #[error("產品 {sku} 缺少必要欄位: {field}")]
    MissingField { sku: String, field: String },

    #[error("重複的 SKU: {0}")]
    DuplicateSku(String),

    #[error("JSON 解析錯誤: {0}")]
    Json(#[from] serde_json::Error),

    #[error("求解器錯誤: {0}")]
    SolverFailure(String),

    #[error("求解逾時（上限 {0:?}）")]
    SolverTimeout(std::time::Duration),

    #[error("金額計算溢位: {0}")]
    AmountOverflow(String),
}

impl LoadError {
    /// 是否屬於輸入驗證類錯誤
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LoadError::Validation(_)
                | LoadError::MissingField { .. }
                | LoadError::DuplicateSku(_)
                | LoadError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
