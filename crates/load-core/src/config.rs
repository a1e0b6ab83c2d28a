//! 裝櫃優化配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 優化參數配置（單次執行內不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// 貨櫃容積（立方公尺）
    #[serde(rename = "CONTAINER_VOLUME_M3")]
    pub container_volume_m3: f64,

    /// 貨櫃最大載重（公斤）
    #[serde(rename = "CONTAINER_MAX_WEIGHT_KG")]
    pub container_max_weight_kg: f64,

    /// 可用預算
    #[serde(rename = "AVAILABLE_BUDGET")]
    pub available_budget: Decimal,

    /// 全域預設提前期（天）
    #[serde(rename = "GLOBAL_LEAD_TIME_DAYS")]
    pub global_lead_time_days: f64,

    /// 利潤權重
    pub w_profit: f64,

    /// 空間效益權重
    pub w_density: f64,

    /// 銷售速度權重
    pub w_velocity: f64,

    /// 求解時間上限（秒），None 表示不限制
    #[serde(
        rename = "SOLVER_TIME_LIMIT_SECS",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub solver_time_limit_secs: Option<u64>,
}

impl OptimizationConfig {
    pub const DEFAULT_LEAD_TIME_DAYS: f64 = 30.0;
    pub const DEFAULT_WEIGHT: f64 = 1.0 / 3.0;

    /// 創建新的優化配置（權重預設平均分配）
    pub fn new(container_volume_m3: f64, container_max_weight_kg: f64, available_budget: Decimal) -> Self {
        Self {
            container_volume_m3,
            container_max_weight_kg,
            available_budget,
            global_lead_time_days: Self::DEFAULT_LEAD_TIME_DAYS,
            w_profit: Self::DEFAULT_WEIGHT,
            w_density: Self::DEFAULT_WEIGHT,
            w_velocity: Self::DEFAULT_WEIGHT,
            solver_time_limit_secs: None,
        }
    }

    /// 建構器模式：設置評分權重
    pub fn with_weights(mut self, w_profit: f64, w_density: f64, w_velocity: f64) -> Self {
        self.w_profit = w_profit;
        self.w_density = w_density;
        self.w_velocity = w_velocity;
        self
    }

    /// 建構器模式：設置全域提前期
    pub fn with_global_lead_time_days(mut self, days: f64) -> Self {
        self.global_lead_time_days = days;
        self
    }

    /// 建構器模式：設置求解時間上限
    pub fn with_solver_time_limit(mut self, secs: u64) -> Self {
        self.solver_time_limit_secs = Some(secs);
        self
    }

    /// 綜合評分
    pub fn weighted_score(&self, n_profit: f64, n_density: f64, n_velocity: f64) -> f64 {
        self.w_profit * n_profit + self.w_density * n_density + self.w_velocity * n_velocity
    }

    /// 容量利用率（百分比），容量不為正時回傳 0
    pub fn utilization(total: f64, capacity: f64) -> f64 {
        if capacity > 0.0 {
            total / capacity * 100.0
        } else {
            0.0
        }
    }
}
