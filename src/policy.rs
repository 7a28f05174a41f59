use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::collections::HashMap;

use crate::error::{AnalyzerError, Result};
use crate::model::{PolicyParameters, ProductSeries, ReorderPolicy, SalesRecord};

/// Partition records into per-product series in a single pass.
///
/// Output order is the order each product first appears in the input; the
/// same order is published by `compute_policies`, so reports stay stable
/// across runs.
pub fn group_by_product(records: &[SalesRecord]) -> Vec<ProductSeries> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<ProductSeries> = Vec::new();

    for record in records {
        match index.get(record.product.as_str()) {
            Some(&i) => groups[i].quantities.push(record.quantity),
            None => {
                index.insert(record.product.as_str(), groups.len());
                groups.push(ProductSeries {
                    product: record.product.clone(),
                    quantities: vec![record.quantity],
                });
            }
        }
    }

    groups
}

/// Compute one `ReorderPolicy` per distinct product in `records`.
///
/// Pure function of its inputs: same records and parameters always produce
/// the same policies, in first-seen product order.
pub fn compute_policies(
    records: &[SalesRecord],
    params: &PolicyParameters,
) -> Result<Vec<ReorderPolicy>> {
    params.validate()?;
    if records.is_empty() {
        return Err(AnalyzerError::InsufficientData(
            "sales history contains no records".into(),
        ));
    }

    let groups = group_by_product(records);
    let policies: Vec<ReorderPolicy> = groups
        .par_iter()
        .map(|series| policy_for_series(series, params))
        .collect();

    tracing::info!(
        products = policies.len(),
        lead_time_days = params.lead_time_days,
        service_level_z = params.service_level_z,
        "computed reorder policies"
    );
    Ok(policies)
}

fn policy_for_series(series: &ProductSeries, params: &PolicyParameters) -> ReorderPolicy {
    let avg_daily_demand = series.quantities.iter().mean();

    // Sample std dev is undefined for a single observation (the library
    // yields NaN); one data point means no observed variability, so 0.
    let demand_std_dev = if series.quantities.len() < 2 {
        0.0
    } else {
        series.quantities.iter().std_dev()
    };

    let lead_time = f64::from(params.lead_time_days);
    let safety_stock_real = params.service_level_z * demand_std_dev * lead_time.sqrt();
    // The reorder point uses the continuous safety stock, not the ceiled
    // one; both figures then round up on their own.
    let reorder_point_real = avg_daily_demand * lead_time + safety_stock_real;

    ReorderPolicy {
        product: series.product.clone(),
        avg_daily_demand,
        demand_std_dev,
        safety_stock: safety_stock_real.ceil() as u32,
        reorder_point: reorder_point_real.ceil() as u32,
    }
}
