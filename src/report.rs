//! Results-table export.

use std::path::Path;

use crate::error::Result;
use crate::model::ReorderPolicy;

/// Writes the computed policies to a CSV file, one row per product, using
/// the report's column labels.
pub fn write_policy_report(file_path: &str, policies: &[ReorderPolicy]) -> Result<()> {
    let mut writer = csv::Writer::from_path(Path::new(file_path))?;

    for policy in policies {
        writer.serialize(policy)?;
    }
    writer.flush()?;

    tracing::info!(
        rows = policies.len(),
        path = file_path,
        "exported policy report"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_policy(product: &str) -> ReorderPolicy {
        ReorderPolicy {
            product: product.to_string(),
            avg_daily_demand: 10.0,
            demand_std_dev: 2.0,
            safety_stock: 8,
            reorder_point: 58,
        }
    }

    #[test]
    fn report_carries_labels_and_rows() {
        let path = std::env::temp_dir().join(format!(
            "reorder_policy_report_test_{}.csv",
            std::process::id()
        ));
        let path_str = path.to_str().unwrap().to_string();

        let policies = vec![sample_policy("Widget A"), sample_policy("Widget B")];
        write_policy_report(&path_str, &policies).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Product,Avg Daily Sales,Std Dev of Sales,Safety Stock,Reorder Point"
        );
        assert_eq!(lines.next().unwrap(), "Widget A,10.0,2.0,8,58");
        assert_eq!(lines.next().unwrap(), "Widget B,10.0,2.0,8,58");
        assert!(lines.next().is_none());
    }
}
