//! 需求與訂購量計算

/// 需求計算器
pub struct DemandCalculator;

impl DemandCalculator {
    /// 某段天數內的需求（日銷量 × 天數）
    pub fn demand_during(sales_per_day: f64, days: f64) -> f64 {
        sales_per_day * days
    }

    /// 建議訂購量：扣除現有庫存後向下取整，不為負
    pub fn order_quantity(total_needed: f64, available_stock: f64) -> u64 {
        let shortage = total_needed - available_stock;
        if shortage > 0.0 {
            shortage.floor() as u64
        } else {
            0
        }
    }

    /// 最小出貨量轉為整數箱數（截去小數，負值視為 0）
    pub fn min_ship_boxes(min_ship_qty: f64) -> u64 {
        if min_ship_qty > 0.0 {
            min_ship_qty.trunc() as u64
        } else {
            0
        }
    }
}
