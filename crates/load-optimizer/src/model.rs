//! 混合整數規劃模型建構

use load_core::{DerivedProduct, OptimizationConfig};
use rust_decimal::prelude::ToPrimitive;

/// 變數索引
pub type VarId = usize;

/// 變數類型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarKind {
    /// 有界整數
    Integer { lower: f64, upper: f64 },
    /// 0-1 變數
    Binary,
}

/// 決策變數
#[derive(Debug, Clone, PartialEq)]
pub struct MipVariable {
    pub name: String,
    pub kind: VarKind,
}

/// 約束方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// Σ ≤ rhs
    LessEqual,
    /// Σ ≥ rhs
    GreaterEqual,
}

/// 線性約束
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<(VarId, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    /// 檢查給定解是否滿足此約束（容差 tolerance）
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs: f64 = self
            .terms
            .iter()
            .map(|&(var, coef)| coef * values.get(var).copied().unwrap_or(0.0))
            .sum();
        match self.sense {
            Sense::LessEqual => lhs <= self.rhs + tolerance,
            Sense::GreaterEqual => lhs >= self.rhs - tolerance,
        }
    }
}

/// 求解器無關的最大化 MIP
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MipProblem {
    pub variables: Vec<MipVariable>,
    pub constraints: Vec<LinearConstraint>,
    /// 最大化 Σ coef · var
    pub objective: Vec<(VarId, f64)>,
}

impl MipProblem {
    pub fn add_variable(&mut self, name: String, kind: VarKind) -> VarId {
        self.variables.push(MipVariable { name, kind });
        self.variables.len() - 1
    }

    pub fn add_constraint(&mut self, name: String, terms: Vec<(VarId, f64)>, sense: Sense, rhs: f64) {
        self.constraints.push(LinearConstraint {
            name,
            terms,
            sense,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }
}

/// 單一 SKU 的決策變數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipmentVars {
    /// 在衍生表中的位置
    pub index: usize,
    /// 裝載箱數 x
    pub quantity: VarId,
    /// 是否出貨 y（最小出貨量為 0 時省略）
    pub indicator: Option<VarId>,
}

/// 建構完成的裝櫃模型
#[derive(Debug, Clone)]
pub struct LoadModel {
    pub problem: MipProblem,
    pub shipments: Vec<ShipmentVars>,
}

pub const VOLUME_CONSTRAINT: &str = "volume";
pub const WEIGHT_CONSTRAINT: &str = "weight";
pub const BUDGET_CONSTRAINT: &str = "budget";

/// 模型建構器
pub struct ModelBuilder;

impl ModelBuilder {
    /// 由衍生表與配置建構 MIP
    pub fn build(derived: &[DerivedProduct], config: &OptimizationConfig) -> LoadModel {
        let mut problem = MipProblem::default();
        let mut shipments = Vec::with_capacity(derived.len());

        for (index, item) in derived.iter().enumerate() {
            let max_qty = item.max_shippable() as f64;
            let min_qty = item.min_ship_qty as f64;

            let quantity = problem.add_variable(
                format!("x_{}", item.sku()),
                VarKind::Integer {
                    lower: 0.0,
                    upper: max_qty,
                },
            );

            // 最小出貨量：y=0 → x=0；y=1 → min ≤ x ≤ max
            let indicator = if item.min_ship_qty > 0 {
                let y = problem.add_variable(format!("y_{}", item.sku()), VarKind::Binary);
                problem.add_constraint(
                    format!("min_qty_lower_{}", item.sku()),
                    vec![(quantity, 1.0), (y, -min_qty)],
                    Sense::GreaterEqual,
                    0.0,
                );
                problem.add_constraint(
                    format!("min_qty_upper_{}", item.sku()),
                    vec![(quantity, 1.0), (y, -max_qty)],
                    Sense::LessEqual,
                    0.0,
                );
                Some(y)
            } else {
                None
            };

            problem.objective.push((quantity, item.score));
            shipments.push(ShipmentVars {
                index,
                quantity,
                indicator,
            });
        }

        let volume_terms = shipments
            .iter()
            .map(|s| (s.quantity, derived[s.index].volume_per_box_m3))
            .collect();
        let weight_terms = shipments
            .iter()
            .map(|s| (s.quantity, derived[s.index].product.weight_per_box_kg))
            .collect();
        let cost_terms = shipments
            .iter()
            .map(|s| {
                let cost = derived[s.index].product.cost_per_box.to_f64().unwrap_or(0.0);
                (s.quantity, cost)
            })
            .collect();

        problem.add_constraint(
            VOLUME_CONSTRAINT.to_string(),
            volume_terms,
            Sense::LessEqual,
            config.container_volume_m3,
        );
        problem.add_constraint(
            WEIGHT_CONSTRAINT.to_string(),
            weight_terms,
            Sense::LessEqual,
            config.container_max_weight_kg,
        );
        problem.add_constraint(
            BUDGET_CONSTRAINT.to_string(),
            cost_terms,
            Sense::LessEqual,
            config.available_budget.to_f64().unwrap_or(0.0),
        );

        tracing::debug!(
            "模型建構完成：變數 {} 個，約束 {} 條",
            problem.num_variables(),
            problem.constraints.len()
        );

        LoadModel { problem, shipments }
    }
}
