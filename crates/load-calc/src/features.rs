//! 產品特徵計算

use load_core::{DerivedProduct, OptimizationConfig, Product};

use crate::demand::DemandCalculator;
use crate::normalize::{decimal_to_f64, ScoreNormalizer};

/// 特徵計算器
pub struct FeatureCalculator;

impl FeatureCalculator {
    /// 計算整份目錄的衍生特徵與評分
    ///
    /// 兩階段：先逐筆推導需求與體積，再對整份表做全域正規化後評分。
    pub fn derive(
        products: &[Product],
        config: &OptimizationConfig,
    ) -> load_core::Result<Vec<DerivedProduct>> {
        crate::validation::validate_config(config)?;
        crate::validation::validate_products(products)?;

        tracing::debug!("推導 {} 個 SKU 的特徵", products.len());

        let mut derived: Vec<DerivedProduct> = products
            .iter()
            .map(|product| Self::derive_one(product, config))
            .collect();

        ScoreNormalizer::apply(&mut derived, config);

        for item in derived.iter().filter(|d| d.is_unshippable()) {
            tracing::warn!(
                "SKU {} 最小出貨量 {} 超過可出貨量 {}，不會被選中",
                item.sku(),
                item.min_ship_qty,
                item.order_qty
            );
        }

        Ok(derived)
    }

    /// 單筆產品的需求、訂購量與體積特徵（評分欄位待正規化後填入）
    pub fn derive_one(product: &Product, config: &OptimizationConfig) -> DerivedProduct {
        let sales_per_day = product.sales_per_day.unwrap_or(0.0);
        let lead_time_days = product
            .lead_time_days
            .unwrap_or(config.global_lead_time_days);

        let demand_during_lead_time = DemandCalculator::demand_during(sales_per_day, lead_time_days);
        let demand_during_coverage =
            DemandCalculator::demand_during(sales_per_day, product.coverage_days.unwrap_or(0.0));
        let total_needed = demand_during_lead_time + demand_during_coverage;
        let order_qty =
            DemandCalculator::order_quantity(total_needed, product.available_stock.unwrap_or(0.0));

        let volume_per_box_m3 = product.volume_per_box_m3();
        let profit_per_cubic_meter = decimal_to_f64(product.profit_per_box) / volume_per_box_m3;

        DerivedProduct {
            product: product.clone(),
            lead_time_days,
            demand_during_lead_time,
            demand_during_coverage,
            total_needed,
            order_qty,
            min_ship_qty: DemandCalculator::min_ship_boxes(product.min_ship_qty.unwrap_or(0.0)),
            volume_per_box_m3,
            profit_per_cubic_meter,
            n_profit: 0.0,
            n_density: 0.0,
            n_velocity: 0.0,
            score: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use load_core::product::MIN_BOX_VOLUME_M3;
    use rust_decimal::Decimal;

    fn config() -> OptimizationConfig {
        OptimizationConfig::new(67.7, 26_000.0, Decimal::from(50_000))
            .with_global_lead_time_days(30.0)
            .with_weights(0.5, 0.3, 0.2)
    }

    #[test]
    fn test_derive_demand_and_order_qty() {
        let product = Product::new("A", (0.5, 0.4, 0.5), 10.0, Decimal::from(20), Decimal::from(8))
            .with_sales_per_day(2.0)
            .with_coverage_days(15.0)
            .with_available_stock(25.5);

        let derived = FeatureCalculator::derive_one(&product, &config());

        assert_eq!(derived.lead_time_days, 30.0);
        assert_eq!(derived.demand_during_lead_time, 60.0);
        assert_eq!(derived.demand_during_coverage, 30.0);
        assert_eq!(derived.total_needed, 90.0);
        // 90 - 25.5 = 64.5 → 64
        assert_eq!(derived.order_qty, 64);
        assert_eq!(derived.max_shippable(), 64);
        assert!((derived.volume_per_box_m3 - 0.1).abs() < 1e-12);
        assert!((derived.profit_per_cubic_meter - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_product_lead_time_overrides_global() {
        let product = Product::new("A", (1.0, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::ONE)
            .with_sales_per_day(1.0)
            .with_lead_time_days(7.0);

        let derived = FeatureCalculator::derive_one(&product, &config());
        assert_eq!(derived.lead_time_days, 7.0);
        assert_eq!(derived.order_qty, 7);
    }

    #[test]
    fn test_missing_optionals_default_to_zero() {
        let product = Product::new("A", (1.0, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::ONE);
        let derived = FeatureCalculator::derive_one(&product, &config());

        assert_eq!(derived.total_needed, 0.0);
        assert_eq!(derived.order_qty, 0);
        assert_eq!(derived.min_ship_qty, 0);
    }

    #[test]
    fn test_stock_exceeding_demand_gives_zero_order() {
        let product = Product::new("A", (1.0, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::ONE)
            .with_sales_per_day(1.0)
            .with_available_stock(500.0);
        assert_eq!(FeatureCalculator::derive_one(&product, &config()).order_qty, 0);
    }

    #[test]
    fn test_zero_volume_floored() {
        let product = Product::new("A", (0.0, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::from(2));
        let derived = FeatureCalculator::derive_one(&product, &config());

        assert_eq!(derived.volume_per_box_m3, MIN_BOX_VOLUME_M3);
        assert!(derived.profit_per_cubic_meter.is_finite());
    }

    #[test]
    fn test_identical_profit_gives_half() {
        let products = vec![
            Product::new("A", (1.0, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::from(5)).with_sales_per_day(1.0),
            Product::new("B", (0.5, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::from(5)).with_sales_per_day(3.0),
            Product::new("C", (0.2, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::from(5)).with_sales_per_day(2.0),
        ];

        let derived = FeatureCalculator::derive(&products, &config()).unwrap();
        assert!(derived.iter().all(|d| d.n_profit == 0.5));
        assert_eq!(derived[0].n_velocity, 0.0);
        assert_eq!(derived[1].n_velocity, 1.0);
        assert_eq!(derived[2].n_density, 1.0);
    }

    #[test]
    fn test_scores_depend_on_whole_catalog() {
        let a = Product::new("A", (1.0, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::from(10)).with_sales_per_day(1.0);
        let b = Product::new("B", (1.0, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::from(20)).with_sales_per_day(2.0);
        let c = Product::new("C", (1.0, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::from(40)).with_sales_per_day(4.0);

        let pair = FeatureCalculator::derive(&[a.clone(), b.clone()], &config()).unwrap();
        let triple = FeatureCalculator::derive(&[a, b, c], &config()).unwrap();

        // B 在兩個 SKU 時為最大值，加入 C 後變成中間值
        assert_eq!(pair[1].n_profit, 1.0);
        assert!(triple[1].n_profit < 1.0);
        assert!(pair[1].score > triple[1].score);
    }

    #[test]
    fn test_scores_are_finite() {
        let products = vec![
            Product::new("A", (0.0, 0.0, 0.0), 1.0, Decimal::ONE, Decimal::from(100)),
            Product::new("B", (1.0, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::from(-3)),
        ];
        let derived = FeatureCalculator::derive(&products, &config()).unwrap();
        assert!(derived.iter().all(|d| d.score.is_finite()));
    }

    #[test]
    fn test_subnormal_volume_scores_are_finite() {
        let products = vec![
            Product::new("DUST", (1e-105, 1e-105, 1e-105), 1.0, Decimal::ONE, Decimal::from(10)),
            Product::new("NORMAL", (0.5, 0.5, 0.4), 10.0, Decimal::from(5), Decimal::from(3)),
        ];
        let derived = FeatureCalculator::derive(&products, &config()).unwrap();

        assert_eq!(derived[0].volume_per_box_m3, MIN_BOX_VOLUME_M3);
        assert!(derived[0].profit_per_cubic_meter.is_finite());
        assert!(derived.iter().all(|d| d.score.is_finite()));
        assert!(derived.iter().all(|d| (0.0..=1.0).contains(&d.n_density)));
    }

    #[test]
    fn test_validation_error_propagates() {
        let products = vec![
            Product::new("A", (1.0, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::ONE),
            Product::new("A", (1.0, 1.0, 1.0), 1.0, Decimal::ONE, Decimal::ONE),
        ];
        assert!(FeatureCalculator::derive(&products, &config()).is_err());
    }
}
