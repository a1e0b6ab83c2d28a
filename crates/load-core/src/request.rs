//! 優化請求（邊界資料形狀）

use serde::{Deserialize, Serialize};

use crate::{OptimizationConfig, Product};

/// 一次優化請求：候選產品目錄 + 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub products: Vec<Product>,
    pub config: OptimizationConfig,
}

impl OptimizationRequest {
    pub fn new(products: Vec<Product>, config: OptimizationConfig) -> Self {
        Self { products, config }
    }

    /// 從 JSON 文字解析請求
    pub fn from_json(input: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}
