/// Annual gross income subject to the social-security contribution is capped
/// here; anything above it escapes the contribution entirely.
pub const SOCIAL_SECURITY_CAP: f64 = 119_650.0;
pub const SOCIAL_SECURITY_RATE: f64 = 0.0919;

/// Upper bounds of the first two progressive brackets, applied to taxable
/// income (gross minus the social-security contribution).
pub const FIRST_BRACKET_LIMIT: f64 = 28_000.0;
pub const SECOND_BRACKET_LIMIT: f64 = 50_000.0;

const FIRST_BRACKET_RATE: f64 = 0.23;
const SECOND_BRACKET_RATE: f64 = 0.35;
const TOP_BRACKET_RATE: f64 = 0.43;

/// Flat local surtax on the full taxable amount.
const LOCAL_SURTAX_RATE: f64 = 0.025;

/// Annual net income under the progressive withholding model. Total over all
/// real inputs; negative gross is treated as a reduction, not an error.
///
/// Callers needing the net value of a bonus must take the marginal
/// difference `net_annual(base + bonus) - net_annual(base)` rather than
/// taxing the bonus in isolation: the bonus bears the household's marginal
/// rate, not its own blended one.
pub fn net_annual(gross_annual: f64) -> f64 {
    let contribution = gross_annual.min(SOCIAL_SECURITY_CAP) * SOCIAL_SECURITY_RATE;
    let taxable = gross_annual - contribution;

    let income_tax = if taxable <= FIRST_BRACKET_LIMIT {
        taxable * FIRST_BRACKET_RATE
    } else if taxable <= SECOND_BRACKET_LIMIT {
        FIRST_BRACKET_LIMIT * FIRST_BRACKET_RATE
            + (taxable - FIRST_BRACKET_LIMIT) * SECOND_BRACKET_RATE
    } else {
        FIRST_BRACKET_LIMIT * FIRST_BRACKET_RATE
            + (SECOND_BRACKET_LIMIT - FIRST_BRACKET_LIMIT) * SECOND_BRACKET_RATE
            + (taxable - SECOND_BRACKET_LIMIT) * TOP_BRACKET_RATE
    };

    let local_tax = taxable * LOCAL_SURTAX_RATE;
    gross_annual - contribution - income_tax - local_tax
}
