//! # Load Optimizer
//!
//! 裝櫃選品最佳化（混合整數規劃）

pub mod extract;
pub mod model;
pub mod solver;

use std::sync::Arc;
use std::time::{Duration, Instant};

use load_calc::FeatureCalculator;
use load_core::{OptimizationConfig, Product, SolutionRecord};

// Re-export 主要類型
pub use extract::ResultExtractor;
pub use model::{LoadModel, MipProblem, ModelBuilder};
pub use solver::{GoodLpSolver, MipSolution, MipSolver, SolverAdapter, SolverError, SolverOutcome};

/// 裝櫃優化器
///
/// 流程：特徵計算 → 評分正規化 → 模型建構 → 求解 → 結果提取。
/// 每次呼叫建立獨立模型，不保留跨次狀態。
#[derive(Clone)]
pub struct ContainerOptimizer {
    config: OptimizationConfig,
    adapter: SolverAdapter,
}

impl ContainerOptimizer {
    /// 創建使用預設求解器的優化器
    pub fn new(config: OptimizationConfig) -> Self {
        let mut adapter = SolverAdapter::new();
        if let Some(secs) = config.solver_time_limit_secs {
            adapter = adapter.with_time_limit(Duration::from_secs(secs));
        }
        Self { config, adapter }
    }

    /// 建構器模式：替換求解器（沿用配置的時間上限）
    pub fn with_solver(mut self, solver: Arc<dyn MipSolver>) -> Self {
        let mut adapter = SolverAdapter::with_solver(solver);
        if let Some(secs) = self.config.solver_time_limit_secs {
            adapter = adapter.with_time_limit(Duration::from_secs(secs));
        }
        self.adapter = adapter;
        self
    }

    pub fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    /// 執行優化；任何錯誤都轉為 status = Error 的方案
    pub fn optimize(&self, products: &[Product]) -> SolutionRecord {
        let start_time = Instant::now();

        let record = match self.try_optimize(products) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("裝櫃優化失敗: {}", err);
                SolutionRecord::error(err.to_string())
            }
        };

        let elapsed = start_time.elapsed();
        tracing::info!(
            "裝櫃優化完成：狀態 {}，選中 {} 個 SKU，共 {} 箱，耗時 {:?}",
            record.status,
            record.selected_items.len(),
            record.total_boxes,
            elapsed
        );

        record.with_solve_time_ms(elapsed.as_millis() as u64)
    }

    /// 執行優化，驗證錯誤以 `Err` 回傳
    pub fn try_optimize(&self, products: &[Product]) -> load_core::Result<SolutionRecord> {
        tracing::info!("開始裝櫃優化：候選 SKU {} 個", products.len());

        // Step 1: 特徵計算與全域正規化評分
        tracing::debug!("Step 1: 特徵計算");
        let derived = FeatureCalculator::derive(products, &self.config)?;

        // Step 2: 模型建構
        tracing::debug!("Step 2: 模型建構");
        let model = ModelBuilder::build(&derived, &self.config);

        // Step 3: 求解
        tracing::debug!("Step 3: 求解（{}）", self.adapter.solver_name());
        let outcome = self.adapter.run(&model.problem);
        tracing::debug!("求解狀態: {}", outcome.status);

        // Step 4: 結果提取
        tracing::debug!("Step 4: 結果提取");
        ResultExtractor::extract(&derived, &model, &outcome, &self.config)
    }
}
