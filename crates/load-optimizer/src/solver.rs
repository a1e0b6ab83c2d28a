//! 求解器適配層
//!
//! `MipSolver` 是可替換的求解器介面；`SolverAdapter` 在工作執行緒上呼叫求解器，
//! 並把各種結果（含崩潰與逾時）正規化為 `SolverOutcome`，不會向上拋出。

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use load_core::{LoadError, SolveStatus};

use crate::model::{MipProblem, Sense, VarKind};

/// 可行性檢查容差
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// 求解器回傳的變數值（依 `VarId` 排列）
#[derive(Debug, Clone, PartialEq)]
pub struct MipSolution {
    pub values: Vec<f64>,
}

/// 求解器錯誤
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    #[error("Infeasible")]
    Infeasible,

    #[error("Unbounded")]
    Unbounded,

    #[error("結果不確定: {0}")]
    Undefined(String),

    #[error("{0}")]
    Failure(String),
}

/// MIP 求解器介面
pub trait MipSolver: Send + Sync {
    /// 求解器名稱（日誌用）
    fn name(&self) -> &str;

    /// 求解最大化問題
    fn solve(&self, problem: &MipProblem) -> Result<MipSolution, SolverError>;
}

/// 預設求解器：good_lp + microlp（分支定界，純 Rust）
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl MipSolver for GoodLpSolver {
    fn name(&self) -> &str {
        "good_lp/microlp"
    }

    fn solve(&self, problem: &MipProblem) -> Result<MipSolution, SolverError> {
        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = problem
            .variables
            .iter()
            .map(|v| {
                let definition = match v.kind {
                    VarKind::Integer { lower, upper } => variable().integer().min(lower).max(upper),
                    VarKind::Binary => variable().binary(),
                };
                vars.add(definition.name(v.name.clone()))
            })
            .collect();

        let mut objective = Expression::default();
        for &(var, coef) in &problem.objective {
            objective += handles[var] * coef;
        }

        let mut model = vars.maximise(objective).using(default_solver);
        for c in &problem.constraints {
            let mut lhs = Expression::default();
            for &(var, coef) in &c.terms {
                lhs += handles[var] * coef;
            }
            let rhs = c.rhs;
            model = match c.sense {
                Sense::LessEqual => model.with(constraint!(lhs <= rhs)),
                Sense::GreaterEqual => model.with(constraint!(lhs >= rhs)),
            };
        }

        match model.solve() {
            Ok(solution) => Ok(MipSolution {
                values: handles.iter().map(|&h| solution.value(h)).collect(),
            }),
            Err(ResolutionError::Infeasible) => Err(SolverError::Infeasible),
            Err(ResolutionError::Unbounded) => Err(SolverError::Unbounded),
            Err(other) => Err(SolverError::Failure(other.to_string())),
        }
    }
}

/// 正規化後的求解結果
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub status: SolveStatus,
    pub message: String,
    /// 僅在 Optimal 時有值
    pub values: Vec<f64>,
}

impl SolverOutcome {
    fn optimal(values: Vec<f64>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            message: SolveStatus::Optimal.to_string(),
            values,
        }
    }

    fn failed(status: SolveStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            values: Vec::new(),
        }
    }
}

/// 求解器適配器
#[derive(Clone)]
pub struct SolverAdapter {
    solver: Arc<dyn MipSolver>,
    time_limit: Option<Duration>,
}

impl SolverAdapter {
    /// 創建使用預設求解器的適配器
    pub fn new() -> Self {
        Self::with_solver(Arc::new(GoodLpSolver))
    }

    pub fn with_solver(solver: Arc<dyn MipSolver>) -> Self {
        Self {
            solver,
            time_limit: None,
        }
    }

    /// 建構器模式：設置求解時間上限
    ///
    /// 逾時後 `run` 立即回傳 status = Error，但求解執行緒無法中斷：
    /// 它會被分離並持續運算到求解器自行返回為止，結果直接丟棄。
    /// 後端 `MipSolver` 若支援自身的時間上限，應一併設定以釋放 CPU。
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// 求解並正規化狀態
    pub fn run(&self, problem: &MipProblem) -> SolverOutcome {
        if problem.variables.is_empty() {
            return Self::resolve_constant(problem);
        }

        tracing::debug!(
            "呼叫求解器 {}：變數 {} 個，約束 {} 條",
            self.solver.name(),
            problem.num_variables(),
            problem.constraints.len()
        );

        let (tx, rx) = mpsc::channel();
        let solver = Arc::clone(&self.solver);
        let owned = problem.clone();
        let spawned = thread::Builder::new()
            .name("mip-solver".to_string())
            .spawn(move || {
                let _ = tx.send(solver.solve(&owned));
            });
        if let Err(e) = spawned {
            let err = LoadError::SolverFailure(format!("無法啟動求解執行緒: {}", e));
            tracing::warn!("{}", err);
            return SolverOutcome::failed(SolveStatus::Error, err.to_string());
        }

        let received = match self.time_limit {
            Some(limit) => rx.recv_timeout(limit).map_err(|e| match e {
                RecvTimeoutError::Timeout => LoadError::SolverTimeout(limit),
                RecvTimeoutError::Disconnected => {
                    LoadError::SolverFailure("求解執行緒異常終止".to_string())
                }
            }),
            None => rx
                .recv()
                .map_err(|_| LoadError::SolverFailure("求解執行緒異常終止".to_string())),
        };

        match received {
            Ok(result) => Self::normalize(result, problem.num_variables()),
            Err(err) => {
                tracing::warn!("{}", err);
                SolverOutcome::failed(SolveStatus::Error, err.to_string())
            }
        }
    }

    /// 將求解器結果映射為狀態
    fn normalize(result: Result<MipSolution, SolverError>, num_variables: usize) -> SolverOutcome {
        match result {
            Ok(solution) => {
                if solution.values.len() != num_variables {
                    return SolverOutcome::failed(
                        SolveStatus::Undefined,
                        format!(
                            "求解器回傳 {} 個變數值，預期 {} 個",
                            solution.values.len(),
                            num_variables
                        ),
                    );
                }
                if solution.values.iter().any(|v| !v.is_finite()) {
                    return SolverOutcome::failed(SolveStatus::Undefined, "求解器回傳非有限數值");
                }
                SolverOutcome::optimal(solution.values)
            }
            Err(SolverError::Infeasible) => {
                SolverOutcome::failed(SolveStatus::Infeasible, SolverError::Infeasible.to_string())
            }
            Err(SolverError::Unbounded) => {
                SolverOutcome::failed(SolveStatus::Unbounded, SolverError::Unbounded.to_string())
            }
            Err(err @ SolverError::Undefined(_)) => {
                SolverOutcome::failed(SolveStatus::Undefined, err.to_string())
            }
            Err(SolverError::Failure(message)) => {
                let err = LoadError::SolverFailure(message);
                tracing::warn!("{}", err);
                SolverOutcome::failed(SolveStatus::Error, err.to_string())
            }
        }
    }

    /// 沒有變數的問題：只需檢查常數約束
    fn resolve_constant(problem: &MipProblem) -> SolverOutcome {
        if problem
            .constraints
            .iter()
            .all(|c| c.is_satisfied(&[], FEASIBILITY_TOLERANCE))
        {
            SolverOutcome::optimal(Vec::new())
        } else {
            SolverOutcome::failed(SolveStatus::Infeasible, SolverError::Infeasible.to_string())
        }
    }
}

impl Default for SolverAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 回傳固定結果的求解器
    struct FixedSolver(Result<MipSolution, SolverError>);

    impl MipSolver for FixedSolver {
        fn name(&self) -> &str {
            "fixed"
        }

        fn solve(&self, _problem: &MipProblem) -> Result<MipSolution, SolverError> {
            self.0.clone()
        }
    }

    struct SlowSolver(Duration);

    impl MipSolver for SlowSolver {
        fn name(&self) -> &str {
            "slow"
        }

        fn solve(&self, problem: &MipProblem) -> Result<MipSolution, SolverError> {
            thread::sleep(self.0);
            Ok(MipSolution {
                values: vec![0.0; problem.num_variables()],
            })
        }
    }

    struct PanickingSolver;

    impl MipSolver for PanickingSolver {
        fn name(&self) -> &str {
            "panicking"
        }

        fn solve(&self, _problem: &MipProblem) -> Result<MipSolution, SolverError> {
            panic!("solver crashed")
        }
    }

    /// max 3a + 2b, a + b ≤ 4, a ≤ 3（整數）
    fn small_problem() -> MipProblem {
        let mut problem = MipProblem::default();
        let a = problem.add_variable(
            "a".to_string(),
            VarKind::Integer {
                lower: 0.0,
                upper: 3.0,
            },
        );
        let b = problem.add_variable(
            "b".to_string(),
            VarKind::Integer {
                lower: 0.0,
                upper: 10.0,
            },
        );
        problem.objective = vec![(a, 3.0), (b, 2.0)];
        problem.add_constraint("cap".to_string(), vec![(a, 1.0), (b, 1.0)], Sense::LessEqual, 4.0);
        problem
    }

    fn adapter(result: Result<MipSolution, SolverError>) -> SolverAdapter {
        SolverAdapter::with_solver(Arc::new(FixedSolver(result)))
    }

    #[test]
    fn test_good_lp_solves_small_problem() {
        let outcome = SolverAdapter::new().run(&small_problem());

        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!((outcome.values[0] - 3.0).abs() < 1e-6);
        assert!((outcome.values[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_good_lp_reports_infeasible() {
        let mut problem = small_problem();
        problem.add_constraint("impossible".to_string(), vec![(0, 1.0)], Sense::GreaterEqual, 5.0);

        let outcome = SolverAdapter::new().run(&problem);
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(outcome.values.is_empty());
    }

    #[test]
    fn test_status_mapping() {
        let problem = small_problem();

        let outcome = adapter(Err(SolverError::Infeasible)).run(&problem);
        assert_eq!(outcome.status, SolveStatus::Infeasible);

        let outcome = adapter(Err(SolverError::Unbounded)).run(&problem);
        assert_eq!(outcome.status, SolveStatus::Unbounded);
        assert_eq!(outcome.message, "Unbounded");

        let outcome = adapter(Err(SolverError::Undefined("gap not closed".to_string()))).run(&problem);
        assert_eq!(outcome.status, SolveStatus::Undefined);
        assert!(outcome.message.contains("gap not closed"));

        let outcome = adapter(Err(SolverError::Failure("license expired".to_string()))).run(&problem);
        assert_eq!(outcome.status, SolveStatus::Error);
        assert!(outcome.message.contains("license expired"));
    }

    #[test]
    fn test_non_finite_values_are_undefined() {
        let outcome = adapter(Ok(MipSolution {
            values: vec![f64::NAN, 1.0],
        }))
        .run(&small_problem());
        assert_eq!(outcome.status, SolveStatus::Undefined);
    }

    #[test]
    fn test_wrong_value_count_is_undefined() {
        let outcome = adapter(Ok(MipSolution { values: vec![1.0] })).run(&small_problem());
        assert_eq!(outcome.status, SolveStatus::Undefined);
    }

    #[test]
    fn test_timeout_reports_error() {
        let outcome = SolverAdapter::with_solver(Arc::new(SlowSolver(Duration::from_millis(500))))
            .with_time_limit(Duration::from_millis(20))
            .run(&small_problem());

        assert_eq!(outcome.status, SolveStatus::Error);
        assert!(outcome.values.is_empty());
        assert!(outcome.message.contains("20ms"), "{}", outcome.message);
    }

    #[test]
    fn test_timeout_message_keeps_precision() {
        assert_eq!(
            LoadError::SolverTimeout(Duration::from_millis(1500)).to_string(),
            "求解逾時（上限 1.5s）"
        );
        assert_eq!(
            LoadError::SolverTimeout(Duration::from_secs(30)).to_string(),
            "求解逾時（上限 30s）"
        );
    }

    #[test]
    fn test_time_limit_not_reached() {
        let outcome = SolverAdapter::with_solver(Arc::new(SlowSolver(Duration::from_millis(1))))
            .with_time_limit(Duration::from_secs(5))
            .run(&small_problem());
        assert_eq!(outcome.status, SolveStatus::Optimal);
    }

    #[test]
    fn test_panic_is_captured() {
        let outcome = SolverAdapter::with_solver(Arc::new(PanickingSolver)).run(&small_problem());
        assert_eq!(outcome.status, SolveStatus::Error);
    }

    #[test]
    fn test_constant_problem() {
        let mut problem = MipProblem::default();
        problem.add_constraint("budget".to_string(), Vec::new(), Sense::LessEqual, 10.0);
        assert_eq!(SolverAdapter::new().run(&problem).status, SolveStatus::Optimal);

        problem.add_constraint("negative".to_string(), Vec::new(), Sense::LessEqual, -1.0);
        assert_eq!(SolverAdapter::new().run(&problem).status, SolveStatus::Infeasible);
    }
}
