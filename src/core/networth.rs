use serde::Serialize;

use super::types::{Asset, AssetCategory};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetValuation {
    pub id: String,
    pub name: String,
    pub category: AssetCategory,
    #[serde(rename = "valueSoY")]
    pub value_soy: f64,
    pub growth: f64,
    #[serde(rename = "valueEoY")]
    pub value_eoy: f64,
}

/// One step of the start-to-end waterfall; `start` and `total` carry the
/// running position so the steps render as a stacked chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeStep {
    pub label: &'static str,
    pub start: f64,
    pub change: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySlice {
    pub category: AssetCategory,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthSummary {
    pub assets: Vec<AssetValuation>,
    #[serde(rename = "totalSoY")]
    pub total_soy: f64,
    pub total_growth: f64,
    #[serde(rename = "totalEoY")]
    pub total_eoy: f64,
    pub bridge: Vec<BridgeStep>,
    pub allocation: Vec<CategorySlice>,
}

/// Builds the start-of-year to end-of-year wealth bridge. Each asset grows
/// independently by its expected percentage; `cash_savings` is the cash-flow
/// engine's cumulative year-end cash and lands as its own bridge step.
pub fn bridge(assets: &[Asset], cash_savings: f64) -> NetWorthSummary {
    let valued: Vec<AssetValuation> = assets
        .iter()
        .map(|asset| {
            let growth = asset.value_soy * (asset.expected_growth_pct / 100.0);
            AssetValuation {
                id: asset.id.clone(),
                name: asset.name.clone(),
                category: asset.category,
                value_soy: asset.value_soy,
                growth,
                value_eoy: asset.value_soy + growth,
            }
        })
        .collect();

    let total_soy: f64 = valued.iter().map(|a| a.value_soy).sum();
    let total_growth: f64 = valued.iter().map(|a| a.growth).sum();
    let total_eoy = total_soy + total_growth + cash_savings;

    let bridge = vec![
        BridgeStep {
            label: "Jan 1 (SoY)",
            start: 0.0,
            change: total_soy,
            total: total_soy,
        },
        BridgeStep {
            label: "Market Growth",
            start: total_soy,
            change: total_growth,
            total: total_soy + total_growth,
        },
        BridgeStep {
            label: "Cash Savings",
            start: total_soy + total_growth,
            change: cash_savings,
            total: total_eoy,
        },
        BridgeStep {
            label: "Dec 31 (EoY)",
            start: 0.0,
            change: total_eoy,
            total: total_eoy,
        },
    ];

    let mut allocation: Vec<CategorySlice> = Vec::new();
    for asset in &valued {
        match allocation.iter_mut().find(|s| s.category == asset.category) {
            Some(slice) => slice.value += asset.value_soy,
            None => allocation.push(CategorySlice {
                category: asset.category,
                value: asset.value_soy,
            }),
        }
    }
    // Positive savings join the liquidity bucket; a deficit stays out of the
    // allocation view.
    if cash_savings > 0.0 {
        match allocation
            .iter_mut()
            .find(|s| s.category == AssetCategory::CashLiquidity)
        {
            Some(slice) => slice.value += cash_savings,
            None => allocation.push(CategorySlice {
                category: AssetCategory::CashLiquidity,
                value: cash_savings,
            }),
        }
    }

    NetWorthSummary {
        assets: valued,
        total_soy,
        total_growth,
        total_eoy,
        bridge,
        allocation,
    }
}
