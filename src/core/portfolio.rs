use serde::Serialize;

use super::types::{Holding, HoldingKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub id: String,
    pub ticker: String,
    #[serde(rename = "type")]
    pub kind: HoldingKind,
    pub invested: f64,
    #[serde(rename = "valueSoY")]
    pub value_soy: f64,
    #[serde(rename = "valueEoY")]
    pub value_eoy: f64,
    pub pl_total: f64,
    pub pl_total_pct: f64,
    pub pl_ytd: f64,
    pub pl_ytd_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindSlice {
    #[serde(rename = "type")]
    pub kind: HoldingKind,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePoint {
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub holdings: Vec<HoldingValuation>,
    pub total_invested: f64,
    #[serde(rename = "totalValueSoY")]
    pub total_value_soy: f64,
    #[serde(rename = "totalValueEoY")]
    pub total_value_eoy: f64,
    /// End-of-year value grouped by holding type.
    pub allocation: Vec<KindSlice>,
    /// Invested / SoY / EoY as a three-point comparison series.
    pub performance: Vec<PerformancePoint>,
}

/// Percentage change with the explicit fallback-to-zero policy for an empty
/// denominator: the UI always renders a number, never a fault.
fn pct_gain(delta: f64, base: f64) -> f64 {
    if base > 0.0 { delta / base * 100.0 } else { 0.0 }
}

pub fn evaluate(holdings: &[Holding]) -> PortfolioSummary {
    let valued: Vec<HoldingValuation> = holdings
        .iter()
        .map(|holding| {
            let invested = holding.quantity * holding.avg_price;
            let value_soy = holding.quantity * holding.price_soy;
            let value_eoy = holding.quantity * holding.price_eoy;
            HoldingValuation {
                id: holding.id.clone(),
                ticker: holding.ticker.clone(),
                kind: holding.kind,
                invested,
                value_soy,
                value_eoy,
                pl_total: value_eoy - invested,
                pl_total_pct: pct_gain(value_eoy - invested, invested),
                pl_ytd: value_eoy - value_soy,
                pl_ytd_pct: pct_gain(value_eoy - value_soy, value_soy),
            }
        })
        .collect();

    let total_invested: f64 = valued.iter().map(|h| h.invested).sum();
    let total_value_soy: f64 = valued.iter().map(|h| h.value_soy).sum();
    let total_value_eoy: f64 = valued.iter().map(|h| h.value_eoy).sum();

    let mut allocation: Vec<KindSlice> = Vec::new();
    for holding in &valued {
        match allocation.iter_mut().find(|s| s.kind == holding.kind) {
            Some(slice) => slice.value += holding.value_eoy,
            None => allocation.push(KindSlice {
                kind: holding.kind,
                value: holding.value_eoy,
            }),
        }
    }

    let performance = vec![
        PerformancePoint {
            label: "Invested",
            value: total_invested,
        },
        PerformancePoint {
            label: "Jan 1 Value",
            value: total_value_soy,
        },
        PerformancePoint {
            label: "Dec 31 Value",
            value: total_value_eoy,
        },
    ];

    PortfolioSummary {
        holdings: valued,
        total_invested,
        total_value_soy,
        total_value_eoy,
        allocation,
        performance,
    }
}
