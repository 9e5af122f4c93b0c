use serde::Serialize;

use super::tax::net_annual;
use super::types::{ExpenseConfig, MONTH_NAMES, PlanState};

/// The base salary is paid out in fourteen installments: one per calendar
/// month plus doubled payments in the months below.
const SALARY_PAYMENTS_PER_YEAR: f64 = 14.0;
const EXTRA_SALARY_MONTHS: [usize; 2] = [5, 11];

const VARIABLE_BONUS_MONTH: usize = 2;
const SPOT_BONUS_MONTH: usize = 11;
const AUGUST: usize = 7;

/// Share of the consultancy gross that lands as net cash in a working month,
/// and the share accrued as a future tax reconciliation. The accrual is
/// informational only; it is never netted against cash.
const CONSULTANCY_NET_SHARE: f64 = 0.65;
const CONSULTANCY_TAX_ACCRUAL_SHARE: f64 = 0.15;

/// Per-month vesting weights; the annual grant vests proportionally to
/// `weight / total` each month.
pub const VESTING_WEIGHTS: [f64; 12] = [
    15.0, 15.0, 30.0, 20.0, 21.0, 42.0, 20.0, 20.0, 31.0, 20.0, 20.0, 42.0,
];

#[derive(Debug, Clone, Copy)]
enum VacationLump {
    Easter,
    Summer,
    Xmas,
}

/// Month placement of the annual vacation lump sums. `share` is the portion
/// of the annual amount charged in that month.
const SEASONAL_EXPENSE_SCHEDULE: [(usize, VacationLump, f64); 4] = [
    (3, VacationLump::Easter, 1.0),
    (6, VacationLump::Summer, 0.5),
    (7, VacationLump::Summer, 0.5),
    (11, VacationLump::Xmas, 1.0),
];

fn lump_amount(expenses: &ExpenseConfig, lump: VacationLump) -> f64 {
    match lump {
        VacationLump::Easter => expenses.vacation_easter,
        VacationLump::Summer => expenses.vacation_summer,
        VacationLump::Xmas => expenses.vacation_xmas,
    }
}

fn seasonal_expenses(expenses: &ExpenseConfig, month: usize) -> f64 {
    SEASONAL_EXPENSE_SCHEDULE
        .iter()
        .filter(|(m, _, _)| *m == month)
        .map(|(_, lump, share)| lump_amount(expenses, *lump) * share)
        .sum()
}

fn recurring_expenses(expenses: &ExpenseConfig) -> f64 {
    expenses.mortgage
        + expenses.house_maintenance
        + expenses.utilities
        + expenses.groceries
        + expenses.transport
        + expenses.house_help
        + expenses.healthcare
        + expenses.various
        + expenses.dining
        + expenses.education
        + expenses.shopping
        + expenses.sport
        + expenses.activities
}

/// Outcome of merging a forecast figure with a user-entered actual.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Resolved {
    Forecast(f64),
    Actual(f64),
}

/// An actual strictly greater than zero replaces the forecast wholesale;
/// zero, unset, or negative leaves the forecast standing. The override is
/// all-or-nothing, never additive.
fn resolve(forecast: f64, actual: f64) -> Resolved {
    if actual > 0.0 {
        Resolved::Actual(actual)
    } else {
        Resolved::Forecast(forecast)
    }
}

impl Resolved {
    fn effective(self) -> f64 {
        match self {
            Resolved::Forecast(v) | Resolved::Actual(v) => v,
        }
    }
}

/// Running totals carried across the month fold. Never reset within a cycle.
#[derive(Debug, Clone, Copy, Default)]
struct RunningTotals {
    cash: f64,
    wealth: f64,
    tax_accrual: f64,
    equity_value: f64,
}

impl RunningTotals {
    fn roll(
        self,
        net_flow: f64,
        deferred_equity: f64,
        tax_accrual: f64,
        vested_value: f64,
    ) -> Self {
        Self {
            cash: self.cash + net_flow,
            wealth: self.wealth + net_flow + deferred_equity,
            tax_accrual: self.tax_accrual + tax_accrual,
            equity_value: self.equity_value + vested_value,
        }
    }
}

/// One projected month: gross components, the forecast figures (always
/// computed, kept for display even when overridden), the effective figures,
/// and every cumulative total after the month closes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthFlow {
    pub month: &'static str,
    /// Net salary paid this month, bonuses included.
    pub salary: f64,
    pub consultancy: f64,
    /// Vested equity realized as cash; zero unless selling on vest.
    pub equity_cash: f64,
    pub forecast_income: f64,
    pub actual_income: f64,
    pub income: f64,
    pub forecast_expenses: f64,
    pub actual_expenses: f64,
    pub expenses: f64,
    pub net_flow: f64,
    pub tax_accrual: f64,
    /// Value vested this month regardless of realization.
    pub vested_value: f64,
    /// Vested value kept as unrealized portfolio growth.
    pub deferred_equity: f64,
    pub cumulative_cash: f64,
    pub cumulative_tax_accrual: f64,
    pub cumulative_wealth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowProjection {
    pub months: Vec<MonthFlow>,
    /// Gross equity value vested across the year, sold or not.
    pub total_equity_value: f64,
}

/// Builds the twelve-month projection. Assumes a validated snapshot
/// ([`PlanState::validate`]); in particular the EUR/USD rate must be
/// positive.
pub fn project(state: &PlanState) -> CashFlowProjection {
    let income = &state.income;
    let adjusted_gross_base =
        income.base_salary_gross * (1.0 + income.salary_increase_pct / 100.0);
    let annual_base_net = net_annual(adjusted_gross_base);
    let monthly_base_net = annual_base_net / SALARY_PAYMENTS_PER_YEAR;

    // The bonus nets out at the household's marginal rate, not in isolation.
    let variable_bonus_net =
        net_annual(adjusted_gross_base + income.variable_bonus_gross) - annual_base_net;

    let vesting_weight_total: f64 = VESTING_WEIGHTS.iter().sum();

    let mut months = Vec::with_capacity(MONTH_NAMES.len());
    let mut running = RunningTotals::default();
    for (index, name) in MONTH_NAMES.into_iter().enumerate() {
        let mut salary = monthly_base_net;
        if EXTRA_SALARY_MONTHS.contains(&index) {
            salary += monthly_base_net;
        }
        if index == VARIABLE_BONUS_MONTH {
            salary += variable_bonus_net;
        }
        if index == SPOT_BONUS_MONTH {
            salary += income.spot_bonus_net;
        }

        let working_month = !(state.consultancy.skip_august && index == AUGUST);
        let (consultancy_net, tax_accrual) = if state.consultancy.is_active && working_month {
            (
                state.consultancy.gross_monthly * CONSULTANCY_NET_SHARE,
                state.consultancy.gross_monthly * CONSULTANCY_TAX_ACCRUAL_SHARE,
            )
        } else {
            (0.0, 0.0)
        };

        let vested_units =
            state.equity.annual_units * (VESTING_WEIGHTS[index] / vesting_weight_total);
        let vested_value = vested_units * state.equity.stock_price_usd / state.equity.eur_usd_rate;
        let (equity_cash, deferred_equity) = if state.equity.sell_on_vest {
            (vested_value, 0.0)
        } else {
            (0.0, vested_value)
        };

        let forecast_income = salary + consultancy_net + equity_cash;
        let forecast_expenses =
            recurring_expenses(&state.expenses) + seasonal_expenses(&state.expenses, index);

        let actual_income = state.adjustments.income[index];
        let actual_expenses = state.adjustments.expenses[index];
        let effective_income = resolve(forecast_income, actual_income).effective();
        let effective_expenses = resolve(forecast_expenses, actual_expenses).effective();

        let net_flow = effective_income - effective_expenses;
        running = running.roll(net_flow, deferred_equity, tax_accrual, vested_value);

        months.push(MonthFlow {
            month: name,
            salary,
            consultancy: consultancy_net,
            equity_cash,
            forecast_income,
            actual_income,
            income: effective_income,
            forecast_expenses,
            actual_expenses,
            expenses: effective_expenses,
            net_flow,
            tax_accrual,
            vested_value,
            deferred_equity,
            cumulative_cash: running.cash,
            cumulative_tax_accrual: running.tax_accrual,
            cumulative_wealth: running.wealth,
        });
    }

    CashFlowProjection {
        months,
        total_equity_value: running.equity_value,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSlice {
    pub label: &'static str,
    pub value: f64,
}

/// Yearly aggregates derived from the projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowTotals {
    pub total_cash_in: f64,
    pub total_expenses: f64,
    /// Cumulative cash balance at year end; feeds the net-worth bridge.
    pub net_liquidity: f64,
    /// Cumulative consultancy tax liability to set aside.
    pub tax_reserve: f64,
    pub savings_rate_pct: f64,
    /// Annualized expense groups for the allocation chart.
    pub expense_breakdown: Vec<ExpenseSlice>,
}

pub fn summarize(projection: &CashFlowProjection, state: &PlanState) -> CashFlowTotals {
    let total_cash_in: f64 = projection.months.iter().map(|m| m.income).sum();
    let total_expenses: f64 = projection.months.iter().map(|m| m.expenses).sum();
    let (net_liquidity, tax_reserve) = projection
        .months
        .last()
        .map(|m| (m.cumulative_cash, m.cumulative_tax_accrual))
        .unwrap_or((0.0, 0.0));

    let cash_income: f64 = projection
        .months
        .iter()
        .map(|m| m.salary + m.consultancy)
        .sum();
    let equity_income = if state.equity.include_in_savings_rate {
        projection.total_equity_value
    } else {
        0.0
    };
    let effective_income = cash_income + equity_income;
    let savings_rate_pct = if effective_income > 0.0 {
        (effective_income - total_expenses) / effective_income * 100.0
    } else {
        0.0
    };

    let e = &state.expenses;
    let expense_breakdown = vec![
        ExpenseSlice {
            label: "Housing & Utilities",
            value: (e.mortgage + e.utilities + e.house_maintenance) * 12.0,
        },
        ExpenseSlice {
            label: "Daily Living",
            value: (e.groceries + e.transport + e.house_help + e.healthcare + e.various) * 12.0,
        },
        ExpenseSlice {
            label: "Lifestyle & Sport",
            value: (e.dining + e.shopping + e.sport) * 12.0,
        },
        ExpenseSlice {
            label: "Education",
            value: (e.education + e.activities) * 12.0,
        },
        ExpenseSlice {
            label: "Travel",
            value: e.vacation_easter + e.vacation_summer + e.vacation_xmas,
        },
    ];

    CashFlowTotals {
        total_cash_in,
        total_expenses,
        net_liquidity,
        tax_reserve,
        savings_rate_pct,
        expense_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    /// The hand-calculated reference scenario: 160k base, 57k bonus, 3k spot
    /// bonus, consultancy 3 161/month skipping August, 296 units at $180 and
    /// 1.08 EUR/USD, held on vest, zero expenses.
    fn golden_state() -> PlanState {
        let mut state = PlanState::default();
        state.income.base_salary_gross = 160_000.0;
        state.income.variable_bonus_gross = 57_000.0;
        state.income.spot_bonus_net = 3_000.0;
        state.income.salary_increase_pct = 0.0;
        state.consultancy.is_active = true;
        state.consultancy.gross_monthly = 3_161.0;
        state.consultancy.skip_august = true;
        state.equity.stock_price_usd = 180.0;
        state.equity.annual_units = 296.0;
        state.equity.eur_usd_rate = 1.08;
        state.equity.sell_on_vest = false;
        state
    }

    const GOLDEN_ANNUAL_BASE_NET: f64 = 88_567.269925;
    const GOLDEN_MONTHLY_BASE_NET: f64 = GOLDEN_ANNUAL_BASE_NET / 14.0;
    const GOLDEN_BONUS_NET: f64 = 31_065.0;
    const GOLDEN_EQUITY_VALUE: f64 = 296.0 * 180.0 / 1.08;

    #[test]
    fn golden_scenario_matches_hand_calculation() {
        let state = golden_state();
        let projection = project(&state);
        let totals = summarize(&projection, &state);

        // 88 567.269925 salary + 31 065 bonus + 3 000 spot
        // + 11 * 3 161 * 0.65 consultancy.
        assert_approx(totals.total_cash_in, 145_233.419925);
        assert_approx(totals.total_expenses, 0.0);
        assert_approx(totals.net_liquidity, 145_233.419925);
        assert_approx(totals.tax_reserve, 5_215.65);
        assert_approx_tol(projection.total_equity_value, GOLDEN_EQUITY_VALUE, 1e-9);

        // Equity held on vest never joins cash, only wealth.
        let december = projection.months.last().expect("twelve months");
        assert_approx_tol(
            december.cumulative_wealth,
            145_233.419925 + GOLDEN_EQUITY_VALUE,
            1e-6,
        );
    }

    #[test]
    fn salary_follows_the_fourteen_payment_convention() {
        let projection = project(&golden_state());
        let m = &projection.months;

        assert_approx(m[0].salary, GOLDEN_MONTHLY_BASE_NET);
        assert_approx(m[5].salary, GOLDEN_MONTHLY_BASE_NET * 2.0);
        assert_approx(m[2].salary, GOLDEN_MONTHLY_BASE_NET + GOLDEN_BONUS_NET);
        assert_approx(m[11].salary, GOLDEN_MONTHLY_BASE_NET * 2.0 + 3_000.0);

        let annual: f64 = m.iter().map(|row| row.salary).sum();
        assert_approx(annual, GOLDEN_ANNUAL_BASE_NET + GOLDEN_BONUS_NET + 3_000.0);
    }

    #[test]
    fn salary_increase_applies_before_taxation() {
        let mut state = golden_state();
        state.income.salary_increase_pct = 10.0;
        let projection = project(&state);
        assert_approx(
            projection.months[0].salary,
            net_annual(176_000.0) / 14.0,
        );
    }

    #[test]
    fn consultancy_skips_august_and_accrues_liability() {
        let projection = project(&golden_state());
        let m = &projection.months;

        assert_approx(m[7].consultancy, 0.0);
        assert_approx(m[7].tax_accrual, 0.0);
        assert_approx(m[6].consultancy, 3_161.0 * 0.65);
        assert_approx(m[6].tax_accrual, 3_161.0 * 0.15);
        assert_approx(m[11].cumulative_tax_accrual, 5_215.65);
    }

    #[test]
    fn consultancy_runs_all_year_when_august_is_kept() {
        let mut state = golden_state();
        state.consultancy.skip_august = false;
        let projection = project(&state);

        assert_approx(projection.months[7].consultancy, 3_161.0 * 0.65);
        let reserve = projection.months[11].cumulative_tax_accrual;
        assert_approx(reserve, 12.0 * 3_161.0 * 0.15);
    }

    #[test]
    fn inactive_consultancy_contributes_nothing() {
        let mut state = golden_state();
        state.consultancy.is_active = false;
        let projection = project(&state);

        for row in &projection.months {
            assert_approx(row.consultancy, 0.0);
            assert_approx(row.tax_accrual, 0.0);
        }
    }

    #[test]
    fn selling_on_vest_routes_equity_into_cash() {
        let mut state = golden_state();
        state.equity.sell_on_vest = true;
        let projection = project(&state);

        for row in &projection.months {
            assert_approx(row.equity_cash, row.vested_value);
            assert_approx(row.deferred_equity, 0.0);
        }
        let december = projection.months.last().expect("twelve months");
        assert_approx_tol(
            december.cumulative_cash,
            145_233.419925 + GOLDEN_EQUITY_VALUE,
            1e-6,
        );
        // Wealth and cash coincide once everything is realized.
        assert_approx_tol(december.cumulative_wealth, december.cumulative_cash, 1e-9);
    }

    #[test]
    fn holding_on_vest_keeps_equity_out_of_cash() {
        let projection = project(&golden_state());
        for row in &projection.months {
            assert_approx(row.equity_cash, 0.0);
            assert_approx(row.deferred_equity, row.vested_value);
        }
    }

    #[test]
    fn zero_units_or_price_vest_nothing() {
        for (units, price) in [(0.0, 180.0), (296.0, 0.0)] {
            let mut state = golden_state();
            state.equity.annual_units = units;
            state.equity.stock_price_usd = price;
            let projection = project(&state);
            assert_approx(projection.total_equity_value, 0.0);
        }
    }

    #[test]
    fn vesting_follows_the_weight_table() {
        // 296 units against a weight total of 296 vests one unit per weight
        // point.
        let projection = project(&golden_state());
        for (index, row) in projection.months.iter().enumerate() {
            let expected_units = VESTING_WEIGHTS[index];
            assert_approx_tol(row.vested_value, expected_units * 180.0 / 1.08, 1e-9);
        }
    }

    #[test]
    fn seasonal_lumps_land_in_their_months() {
        let mut state = PlanState::default();
        state.expenses.vacation_easter = 1_200.0;
        state.expenses.vacation_summer = 4_000.0;
        state.expenses.vacation_xmas = 900.0;
        let projection = project(&state);
        let m = &projection.months;

        assert_approx(m[3].expenses, 1_200.0);
        assert_approx(m[6].expenses, 2_000.0);
        assert_approx(m[7].expenses, 2_000.0);
        assert_approx(m[11].expenses, 900.0);
        assert_approx(m[0].expenses, 0.0);

        let annual: f64 = m.iter().map(|row| row.expenses).sum();
        assert_approx(annual, 6_100.0);
    }

    #[test]
    fn recurring_expenses_hit_every_month() {
        let mut state = PlanState::default();
        state.expenses.mortgage = 2_000.0;
        state.expenses.groceries = 800.0;
        state.expenses.dining = 300.0;
        let projection = project(&state);

        for row in &projection.months {
            assert_approx(row.expenses, 3_100.0);
        }
    }

    #[test]
    fn actual_income_replaces_the_forecast_wholesale() {
        let mut state = golden_state();
        state.adjustments.income[4] = 4_321.0;
        let projection = project(&state);
        let may = &projection.months[4];

        assert_approx(may.income, 4_321.0);
        // The forecast stays computed for display.
        assert_approx(may.forecast_income, GOLDEN_MONTHLY_BASE_NET + 3_161.0 * 0.65);

        state.adjustments.income[4] = 0.0;
        let restored = project(&state);
        assert_approx(
            restored.months[4].income,
            restored.months[4].forecast_income,
        );
    }

    #[test]
    fn override_sides_are_independent() {
        let mut state = golden_state();
        state.expenses.groceries = 500.0;
        state.adjustments.expenses[1] = 9_999.0;
        let projection = project(&state);
        let february = &projection.months[1];

        assert_approx(february.expenses, 9_999.0);
        assert_approx(february.income, february.forecast_income);
    }

    #[test]
    fn negative_adjustments_leave_the_forecast_standing() {
        let mut state = golden_state();
        state.adjustments.income[0] = -500.0;
        let projection = project(&state);
        assert_approx(
            projection.months[0].income,
            projection.months[0].forecast_income,
        );
    }

    #[test]
    fn resolve_is_an_all_or_nothing_choice() {
        assert_eq!(resolve(10.0, 0.0), Resolved::Forecast(10.0));
        assert_eq!(resolve(10.0, -3.0), Resolved::Forecast(10.0));
        assert_eq!(resolve(10.0, 5.0), Resolved::Actual(5.0));
        assert_eq!(resolve(0.0, 7.5), Resolved::Actual(7.5));
    }

    #[test]
    fn cumulative_cash_is_the_prefix_sum_of_net_flows() {
        let mut state = golden_state();
        state.expenses.groceries = 1_000.0;
        state.adjustments.income[3] = 2_500.0;
        let projection = project(&state);

        let mut expected = 0.0;
        for row in &projection.months {
            expected += row.net_flow;
            assert_approx_tol(row.cumulative_cash, expected, 1e-9);
        }
    }

    #[test]
    fn savings_rate_gates_equity_on_the_toggle() {
        let mut state = golden_state();
        state.expenses.groceries = 2_000.0;

        let projection = project(&state);
        let without = summarize(&projection, &state);

        state.equity.include_in_savings_rate = true;
        let projection = project(&state);
        let with = summarize(&projection, &state);

        assert!(with.savings_rate_pct > without.savings_rate_pct);

        let cash_income = 145_233.419925;
        let expenses = 24_000.0;
        assert_approx_tol(
            without.savings_rate_pct,
            (cash_income - expenses) / cash_income * 100.0,
            1e-9,
        );
        let effective = cash_income + GOLDEN_EQUITY_VALUE;
        assert_approx_tol(
            with.savings_rate_pct,
            (effective - expenses) / effective * 100.0,
            1e-9,
        );
    }

    #[test]
    fn savings_rate_falls_back_to_zero_without_income() {
        let state = PlanState::default();
        let projection = project(&state);
        let totals = summarize(&projection, &state);
        assert_approx(totals.savings_rate_pct, 0.0);
    }

    #[test]
    fn expense_breakdown_annualizes_recurring_groups() {
        let mut state = PlanState::default();
        state.expenses.mortgage = 1_000.0;
        state.expenses.utilities = 200.0;
        state.expenses.groceries = 600.0;
        state.expenses.dining = 150.0;
        state.expenses.education = 400.0;
        state.expenses.vacation_summer = 5_000.0;
        let projection = project(&state);
        let totals = summarize(&projection, &state);

        let by_label = |label: &str| {
            totals
                .expense_breakdown
                .iter()
                .find(|slice| slice.label == label)
                .map(|slice| slice.value)
                .expect("group present")
        };
        assert_approx(by_label("Housing & Utilities"), 14_400.0);
        assert_approx(by_label("Daily Living"), 7_200.0);
        assert_approx(by_label("Lifestyle & Sport"), 1_800.0);
        assert_approx(by_label("Education"), 4_800.0);
        assert_approx(by_label("Travel"), 5_000.0);
    }

    #[test]
    fn projection_is_deterministic() {
        let state = golden_state();
        assert_eq!(project(&state), project(&state));
    }

    proptest! {
        #[test]
        fn prop_vested_units_sum_to_the_annual_grant(units in 0.0..100_000.0f64) {
            let mut state = PlanState::default();
            state.equity.annual_units = units;
            state.equity.stock_price_usd = 1.0;
            state.equity.eur_usd_rate = 1.0;
            let projection = project(&state);
            let vested: f64 = projection.months.iter().map(|m| m.vested_value).sum();
            prop_assert!((vested - units).abs() <= units.abs() * 1e-12 + 1e-9);
        }

        #[test]
        fn prop_actual_income_wins_for_any_month(
            month in 0usize..12,
            actual in 0.01..1_000_000.0f64,
        ) {
            let mut state = golden_state();
            state.adjustments.income[month] = actual;
            let projection = project(&state);
            prop_assert!((projection.months[month].income - actual).abs() <= EPS);
        }

        #[test]
        fn prop_monthly_net_flow_is_income_minus_expenses(
            groceries in 0.0..10_000.0f64,
            override_expense in 0.0..10_000.0f64,
        ) {
            let mut state = golden_state();
            state.expenses.groceries = groceries;
            state.adjustments.expenses[9] = override_expense;
            let projection = project(&state);
            for row in &projection.months {
                prop_assert!((row.net_flow - (row.income - row.expenses)).abs() <= 1e-9);
            }
        }
    }
}
