//! Sample rows for the `predictive_insights` table.

use crate::model::{InsightCreate, InsightStatus};

type Row = (&'static str, f64, InsightStatus, f64, &'static str, i64, f64, bool, &'static str);

const SAMPLE_ROWS: [Row; 10] = [
    ("Summer Sale 2024", 15000.00, InsightStatus::Active, 2.45, "Target CPA", 234, 45000.00, true, "Increase budget by 20%"),
    ("Black Friday Campaign", 25000.00, InsightStatus::Paused, 3.12, "Maximize Conversions", 189, 32000.00, false, "Optimize ad copy and targeting"),
    ("Brand Awareness Q4", 12000.00, InsightStatus::Active, 1.89, "Target ROAS", 156, 28000.00, true, "Expand to similar audiences"),
    ("Retargeting Campaign", 8500.00, InsightStatus::Active, 1.45, "Target CPA", 298, 38000.00, true, "Scale up successful ad groups"),
    ("Holiday Shopping", 30000.00, InsightStatus::Active, 4.25, "Maximize Conversions", 145, 25000.00, false, "Reduce CPC and improve quality score"),
    ("Mobile App Install", 18000.00, InsightStatus::Active, 2.15, "Target CPA", 267, 42000.00, true, "Test new creative variations"),
    ("Product Launch 2024", 22000.00, InsightStatus::Active, 2.85, "Target ROAS", 198, 35000.00, true, "Increase bid adjustments for high-performing keywords"),
    ("Seasonal Promotion", 16000.00, InsightStatus::Paused, 3.45, "Maximize Conversions", 123, 22000.00, false, "Review and update negative keywords"),
    ("Lead Generation", 9500.00, InsightStatus::Active, 1.95, "Target CPA", 312, 28000.00, true, "Expand to new geographic locations"),
    ("Brand Safety Campaign", 13000.00, InsightStatus::Active, 2.25, "Target ROAS", 178, 26000.00, true, "Test different ad formats"),
];

/// The fixed recommendation rows loaded by `seed-insights`.
pub fn sample_insights() -> Vec<InsightCreate> {
    SAMPLE_ROWS
        .iter()
        .map(
            |&(name, spend, status, cpc, strategy, conversions, revenue, profitable, recommendation)| InsightCreate {
                campaign_name: name.to_string(),
                spend,
                status,
                cpc,
                bidding_strategy: strategy.to_string(),
                conversions,
                revenue,
                profitable,
                recommendation: recommendation.to_string(),
            },
        )
        .collect()
}
