//! 輸入驗證

use std::collections::HashSet;

use load_core::{LoadError, OptimizationConfig, Product};

/// 驗證產品目錄：SKU 非空且唯一、數值有限、箱體尺寸不為負
pub fn validate_products(products: &[Product]) -> load_core::Result<()> {
    let mut seen = HashSet::with_capacity(products.len());

    for product in products {
        if product.sku.trim().is_empty() {
            return Err(LoadError::MissingField {
                sku: String::new(),
                field: "SKU".to_string(),
            });
        }

        if !seen.insert(product.sku.as_str()) {
            return Err(LoadError::DuplicateSku(product.sku.clone()));
        }

        let required = [
            ("BoxLength_m", product.box_length_m),
            ("BoxWidth_m", product.box_width_m),
            ("BoxHeight_m", product.box_height_m),
            ("WeightPerBox_kg", product.weight_per_box_kg),
        ];
        for (field, value) in required {
            if !value.is_finite() {
                return Err(LoadError::Validation(format!(
                    "產品 {} 的 {} 不是有效數值",
                    product.sku, field
                )));
            }
        }

        for (field, value) in &required[..3] {
            if *value < 0.0 {
                return Err(LoadError::Validation(format!(
                    "產品 {} 的 {} 不可為負: {}",
                    product.sku, field, value
                )));
            }
        }

        let optional = [
            ("MinShipQty", product.min_ship_qty),
            ("CoverageDays", product.coverage_days),
            ("SalesPerDay", product.sales_per_day),
            ("AvailableStock", product.available_stock),
            ("LeadTimeDays", product.lead_time_days),
        ];
        for (field, value) in optional {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(LoadError::Validation(format!(
                        "產品 {} 的 {} 不是有效數值",
                        product.sku, field
                    )));
                }
            }
        }
    }

    Ok(())
}

/// 驗證配置：所有數值有限、權重不為負
///
/// 容量與預算允許為負，交由求解器判定為不可行。
pub fn validate_config(config: &OptimizationConfig) -> load_core::Result<()> {
    let values = [
        ("CONTAINER_VOLUME_M3", config.container_volume_m3),
        ("CONTAINER_MAX_WEIGHT_KG", config.container_max_weight_kg),
        ("GLOBAL_LEAD_TIME_DAYS", config.global_lead_time_days),
        ("w_profit", config.w_profit),
        ("w_density", config.w_density),
        ("w_velocity", config.w_velocity),
    ];
    for (field, value) in values {
        if !value.is_finite() {
            return Err(LoadError::Validation(format!("配置 {} 不是有效數值", field)));
        }
    }

    for (field, weight) in &values[3..] {
        if *weight < 0.0 {
            return Err(LoadError::Validation(format!(
                "配置 {} 不可為負: {}",
                field, weight
            )));
        }
    }

    Ok(())
}
