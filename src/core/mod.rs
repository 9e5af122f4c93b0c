//! Pure projection engines: tax, cash flow, net worth, portfolio. Every
//! engine is a total function of an immutable snapshot; outputs are freshly
//! allocated and safe to memoize by input equality.

mod cashflow;
mod networth;
mod portfolio;
mod tax;
mod types;

use serde::Serialize;

pub use cashflow::{
    CashFlowProjection, CashFlowTotals, ExpenseSlice, MonthFlow, VESTING_WEIGHTS, project,
    summarize,
};
pub use networth::{AssetValuation, BridgeStep, CategorySlice, NetWorthSummary, bridge};
pub use portfolio::{HoldingValuation, KindSlice, PerformancePoint, PortfolioSummary, evaluate};
pub use tax::net_annual;
pub use types::{
    Adjustments, Asset, AssetCategory, ConfigError, ConsultancyConfig, EquityConfig,
    ExpenseConfig, Holding, HoldingKind, IncomeConfig, MONTH_NAMES, PlanState,
};

/// Combined output of all four engines for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub cash_flow: CashFlowProjection,
    pub totals: CashFlowTotals,
    pub net_worth: NetWorthSummary,
    pub portfolio: PortfolioSummary,
}

/// Validates a snapshot and runs every engine over it. The cash-flow
/// engine's year-end liquidity feeds the net-worth bridge; the other engines
/// are independent.
pub fn evaluate_plan(state: &PlanState) -> Result<PlanReport, ConfigError> {
    state.validate()?;
    let cash_flow = project(state);
    let totals = summarize(&cash_flow, state);
    let net_worth = bridge(&state.assets, totals.net_liquidity);
    let portfolio = evaluate(&state.portfolio);
    Ok(PlanReport {
        cash_flow,
        totals,
        net_worth,
        portfolio,
    })
}
