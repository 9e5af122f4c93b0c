use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed calendar labels for the twelve projection months.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomeConfig {
    pub base_salary_gross: f64,
    pub variable_bonus_gross: f64,
    /// Already net of tax; never passed through the tax engine.
    pub spot_bonus_net: f64,
    pub salary_increase_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsultancyConfig {
    pub is_active: bool,
    pub gross_monthly: f64,
    pub skip_august: bool,
}

impl Default for ConsultancyConfig {
    fn default() -> Self {
        Self {
            is_active: true,
            gross_monthly: 0.0,
            skip_august: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EquityConfig {
    #[serde(rename = "stockPriceUSD")]
    pub stock_price_usd: f64,
    pub annual_units: f64,
    /// Must be positive; rejected by [`PlanState::validate`] otherwise.
    pub eur_usd_rate: f64,
    pub sell_on_vest: bool,
    pub include_in_savings_rate: bool,
}

impl Default for EquityConfig {
    fn default() -> Self {
        Self {
            stock_price_usd: 0.0,
            annual_units: 0.0,
            eur_usd_rate: 1.08,
            sell_on_vest: false,
            include_in_savings_rate: false,
        }
    }
}

/// Monthly recurring amounts, except the three vacation fields which are
/// annual lump sums charged in specific months by the cash-flow engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpenseConfig {
    pub mortgage: f64,
    pub house_maintenance: f64,
    pub utilities: f64,
    pub groceries: f64,
    pub transport: f64,
    pub house_help: f64,
    pub healthcare: f64,
    pub various: f64,
    pub dining: f64,
    pub education: f64,
    pub shopping: f64,
    pub sport: f64,
    pub activities: f64,
    pub vacation_easter: f64,
    pub vacation_summer: f64,
    pub vacation_xmas: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetCategory {
    #[serde(rename = "Real Estate")]
    RealEstate,
    #[serde(rename = "ETF/Stocks")]
    EtfStocks,
    Crypto,
    #[serde(rename = "Private Equity")]
    PrivateEquity,
    #[serde(rename = "Cash/Liquidity")]
    CashLiquidity,
    Pension,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub category: AssetCategory,
    #[serde(rename = "valueSoY")]
    pub value_soy: f64,
    pub expected_growth_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldingKind {
    Stock,
    #[serde(rename = "ETF")]
    Etf,
    Crypto,
    Fund,
    Bond,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub ticker: String,
    #[serde(rename = "type")]
    pub kind: HoldingKind,
    pub quantity: f64,
    /// Cost basis per unit.
    pub avg_price: f64,
    #[serde(rename = "priceSoY")]
    pub price_soy: f64,
    #[serde(rename = "priceEoY")]
    pub price_eoy: f64,
}

/// User-entered actuals, one slot per calendar month. A value greater than
/// zero replaces that month's forecast for its side of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub income: [f64; 12],
    pub expenses: [f64; 12],
}

/// The complete input snapshot: sole unit of persistence and sole input to
/// every engine. Absent fields deserialize to their defaults, so snapshots
/// saved by an older shape merge cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanState {
    pub income: IncomeConfig,
    pub consultancy: ConsultancyConfig,
    pub equity: EquityConfig,
    pub expenses: ExpenseConfig,
    pub assets: Vec<Asset>,
    pub portfolio: Vec<Holding>,
    pub adjustments: Adjustments,
}

impl Default for PlanState {
    fn default() -> Self {
        Self {
            income: IncomeConfig::default(),
            consultancy: ConsultancyConfig::default(),
            equity: EquityConfig::default(),
            expenses: ExpenseConfig::default(),
            assets: vec![
                Asset {
                    id: "1".to_string(),
                    name: "Main House".to_string(),
                    category: AssetCategory::RealEstate,
                    value_soy: 0.0,
                    expected_growth_pct: 2.0,
                },
                Asset {
                    id: "2".to_string(),
                    name: "Angel Investments".to_string(),
                    category: AssetCategory::PrivateEquity,
                    value_soy: 0.0,
                    expected_growth_pct: 0.0,
                },
            ],
            portfolio: vec![
                Holding {
                    id: "1".to_string(),
                    ticker: "VWCE".to_string(),
                    kind: HoldingKind::Etf,
                    quantity: 0.0,
                    avg_price: 0.0,
                    price_soy: 0.0,
                    price_eoy: 0.0,
                },
                Holding {
                    id: "2".to_string(),
                    ticker: "BTC".to_string(),
                    kind: HoldingKind::Crypto,
                    quantity: 0.0,
                    avg_price: 0.0,
                    price_soy: 0.0,
                    price_eoy: 0.0,
                },
            ],
            adjustments: Adjustments::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: eurUsdRate must be a positive number, got {rate}")]
    NonPositiveFxRate { rate: f64 },
}

impl PlanState {
    /// Boundary check for the one genuine fault condition: the equity
    /// conversion divides by this rate, so it must be a positive finite
    /// number before any engine runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.equity.eur_usd_rate;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConfigError::NonPositiveFxRate { rate });
        }
        Ok(())
    }
}
