//! 評分正規化
//!
//! min-max 正規化必須在整份候選目錄上一次完成：新增或移除一個 SKU
//! 可能改變其他所有 SKU 的正規化值與評分。

use load_core::{DerivedProduct, OptimizationConfig};

/// 欄位值全部相同時的正規化值
pub const UNIFORM_NORMALIZED_VALUE: f64 = 0.5;

const REL_TOLERANCE: f64 = 1e-5;
const ABS_TOLERANCE: f64 = 1e-8;

fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= ABS_TOLERANCE + REL_TOLERANCE * b.abs()
}

/// min-max 正規化到 [0, 1]
///
/// 最大值與最小值（在容差內）相等時，所有值固定為 0.5。
/// 非有限值不參與 min/max：+inf → 1.0、-inf → 0.0、NaN → 0.5。
pub fn normalize_minmax(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let finite = values.iter().copied().filter(|v| v.is_finite());
    let min = finite.clone().fold(f64::INFINITY, f64::min);
    let max = finite.fold(f64::NEG_INFINITY, f64::max);

    if min > max || is_close(max, min) {
        return values.iter().map(|&v| non_finite_or(v, UNIFORM_NORMALIZED_VALUE)).collect();
    }

    // 範圍超出 f64 時先減半再相除
    let range = max - min;
    values
        .iter()
        .map(|&v| {
            let scaled = if range.is_finite() {
                (v - min) / range
            } else {
                (v / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)
            };
            non_finite_or(v, scaled.clamp(0.0, 1.0))
        })
        .collect()
}

fn non_finite_or(value: f64, finite: f64) -> f64 {
    if value.is_nan() {
        UNIFORM_NORMALIZED_VALUE
    } else if value == f64::INFINITY {
        1.0
    } else if value == f64::NEG_INFINITY {
        0.0
    } else {
        finite
    }
}

/// 評分正規化器
pub struct ScoreNormalizer;

impl ScoreNormalizer {
    /// 對整份衍生表做一次全域正規化並寫入評分
    pub fn apply(derived: &mut [DerivedProduct], config: &OptimizationConfig) {
        let profits: Vec<f64> = derived
            .iter()
            .map(|d| decimal_to_f64(d.product.profit_per_box))
            .collect();
        let densities: Vec<f64> = derived.iter().map(|d| d.profit_per_cubic_meter).collect();
        let velocities: Vec<f64> = derived
            .iter()
            .map(|d| d.product.sales_per_day.unwrap_or(0.0))
            .collect();

        let n_profit = normalize_minmax(&profits);
        let n_density = normalize_minmax(&densities);
        let n_velocity = normalize_minmax(&velocities);

        for (i, item) in derived.iter_mut().enumerate() {
            item.n_profit = n_profit[i];
            item.n_density = n_density[i];
            item.n_velocity = n_velocity[i];
            item.score = config.weighted_score(item.n_profit, item.n_density, item.n_velocity);
        }

        tracing::debug!("完成 {} 個 SKU 的評分正規化", derived.len());
    }
}

pub(crate) fn decimal_to_f64(value: rust_decimal::Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or(0.0)
}
