//! 結果提取

use load_core::{DerivedProduct, LoadError, OptimizationConfig, Result, SelectedItem, SolutionRecord};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::model::LoadModel;
use crate::solver::SolverOutcome;

/// 結果提取器
pub struct ResultExtractor;

impl ResultExtractor {
    /// 由求解結果組裝裝櫃方案
    ///
    /// 非 Optimal 時只帶狀態與訊息，數量欄位全為零。
    /// 金額超出 `Decimal` 範圍時回傳 [`LoadError::AmountOverflow`]。
    pub fn extract(
        derived: &[DerivedProduct],
        model: &LoadModel,
        outcome: &SolverOutcome,
        config: &OptimizationConfig,
    ) -> Result<SolutionRecord> {
        if !outcome.status.is_optimal() {
            return Ok(SolutionRecord::empty(outcome.status, outcome.message.clone()));
        }

        let mut record = SolutionRecord::empty(outcome.status, outcome.message.clone());

        for shipment in &model.shipments {
            let qty = Self::selected_quantity(outcome.values.get(shipment.quantity).copied());
            if qty == 0 {
                continue;
            }

            let item = Self::selected_item(&derived[shipment.index], qty)?;

            record.total_boxes += qty;
            record.total_volume_m3 += item.volume_used_m3;
            record.total_weight_kg += item.weight_used_kg;
            record.total_cost = record
                .total_cost
                .checked_add(item.total_cost)
                .ok_or_else(|| LoadError::AmountOverflow("總成本".to_string()))?;
            record.total_profit = record
                .total_profit
                .checked_add(item.total_profit)
                .ok_or_else(|| LoadError::AmountOverflow("總利潤".to_string()))?;
            record.total_score += item.score;
            record.selected_items.push(item);
        }

        record.volume_utilization =
            OptimizationConfig::utilization(record.total_volume_m3, config.container_volume_m3);
        record.weight_utilization =
            OptimizationConfig::utilization(record.total_weight_kg, config.container_max_weight_kg);
        record.budget_utilization = Self::budget_utilization(record.total_cost, config.available_budget);

        Ok(record)
    }

    /// 求解值取整；缺值視為 0，不會為負
    pub fn selected_quantity(value: Option<f64>) -> u64 {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
            _ => 0,
        }
    }

    fn selected_item(derived: &DerivedProduct, qty: u64) -> Result<SelectedItem> {
        let product = &derived.product;
        let boxes = qty as f64;
        let boxes_decimal = Decimal::from(qty);

        let total_cost = boxes_decimal
            .checked_mul(product.cost_per_box)
            .ok_or_else(|| LoadError::AmountOverflow(format!("SKU {} 成本 {} 箱", product.sku, qty)))?;
        let total_profit = boxes_decimal
            .checked_mul(product.profit_per_box)
            .ok_or_else(|| LoadError::AmountOverflow(format!("SKU {} 利潤 {} 箱", product.sku, qty)))?;

        Ok(SelectedItem {
            sku: product.sku.clone(),
            description: product.description.clone(),
            selected_qty: qty,
            volume_used_m3: boxes * derived.volume_per_box_m3,
            weight_used_kg: boxes * product.weight_per_box_kg,
            total_cost,
            total_profit,
            score: boxes * derived.score,
            order_qty: derived.order_qty,
        })
    }

    /// 預算使用率（%）；Decimal 運算溢位時改以浮點計算
    fn budget_utilization(total_cost: Decimal, budget: Decimal) -> f64 {
        if budget <= Decimal::ZERO {
            return 0.0;
        }
        total_cost
            .checked_div(budget)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(|pct| pct.to_f64())
            .unwrap_or_else(|| {
                let cost = total_cost.to_f64().unwrap_or(0.0);
                let budget = budget.to_f64().unwrap_or(0.0);
                OptimizationConfig::utilization(cost, budget)
            })
    }
}
