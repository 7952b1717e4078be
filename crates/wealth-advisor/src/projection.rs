//! Growth Projection
//!
//! Monthly compounding of starting capital plus a fixed contribution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Portfolio value at the end of one month
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub month: u32,
    /// Fractional years, 2 decimal places
    pub year: Decimal,
    /// Rounded to cents
    pub value: Decimal,
}

/// Longest horizon a projection covers
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Project growth month by month
///
/// Month 0 holds `initial`. Each later month adds `monthly`, then compounds
/// by `annual_return / 12`. Rounding is applied to the reported values only.
/// `years` is capped at [`MAX_PROJECTION_YEARS`]; the series stops early if
/// the value leaves `Decimal`'s range.
pub fn portfolio_growth_projection(
    initial: Decimal,
    monthly: Decimal,
    years: u32,
    annual_return: Decimal,
) -> Vec<ProjectionPoint> {
    let months = years.min(MAX_PROJECTION_YEARS) * 12;
    let growth = (annual_return / Decimal::from(12)).checked_add(Decimal::ONE);
    let mut points = Vec::with_capacity(months as usize + 1);
    let mut value = Some(initial);

    for month in 0..=months {
        if month > 0 {
            value = value
                .and_then(|v| v.checked_add(monthly))
                .zip(growth)
                .and_then(|(v, g)| v.checked_mul(g));
        }
        let Some(current) = value else {
            tracing::debug!(month, "Projection left the representable range, truncating");
            break;
        };
        points.push(ProjectionPoint {
            month,
            year: (Decimal::from(month) / Decimal::from(12)).round_dp(2),
            value: current.round_dp(2),
        });
    }

    points
}

/// Value after `years`, or `None` when the horizon exceeds
/// [`MAX_PROJECTION_YEARS`] or the value overflows
pub fn projected_value(initial: Decimal, monthly: Decimal, years: u32, annual_return: Decimal) -> Option<Decimal> {
    if years > MAX_PROJECTION_YEARS {
        return None;
    }
    let points = portfolio_growth_projection(initial, monthly, years, annual_return);
    let complete = points.len() == years as usize * 12 + 1;
    points.last().filter(|_| complete).map(|p| p.value)
}
