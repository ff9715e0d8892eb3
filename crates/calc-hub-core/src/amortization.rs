//! Level-payment amortization engine.
//!
//! Stateless functions shared by every loan-style calculator: the annuity
//! payment, the month-by-month schedule and the full-term totals. All math in
//! `rust_decimal::Decimal`; every operation that could overflow or divide by
//! zero is checked and reported as an error.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CalcHubError;
use crate::types::{Money, Rate};
use crate::CalcHubResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of schedule rows produced for display.
pub const SCHEDULE_ROW_CAP: u32 = 360;

/// Annual mortgage-insurance rate applied to the financed principal.
pub const PMI_ANNUAL_RATE: Rate = dec!(0.005);

/// Down payment share of the loan amount below which PMI is charged.
pub const PMI_DOWN_PAYMENT_THRESHOLD: Rate = dec!(0.20);

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Monthly non-amortizing costs added on top of principal and interest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EscrowComponents {
    #[serde(default)]
    pub property_tax: Money,
    #[serde(default)]
    pub insurance: Money,
    #[serde(default)]
    pub mortgage_insurance: Money,
}

impl EscrowComponents {
    pub fn monthly_total(&self) -> CalcHubResult<Money> {
        self.property_tax
            .checked_add(self.insurance)
            .and_then(|v| v.checked_add(self.mortgage_insurance))
            .ok_or_else(|| CalcHubError::Overflow {
                context: "monthly escrow".into(),
            })
    }
}

/// Parameters of a single amortization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Financed amount (loan amount minus any down payment).
    pub principal: Money,
    /// Annual rate as a percentage (6.5 = 6.5% per year).
    pub annual_interest_rate_percent: Rate,
    /// Number of monthly payments.
    pub term_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escrow: Option<EscrowComponents>,
}

/// One row of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub payment_number: u32,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

/// Full-term figures. Always computed over the uncapped term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationTotals {
    pub monthly_principal_and_interest: Money,
    pub monthly_escrow: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_escrow: Money,
    pub total_cost: Money,
}

/// Payment, totals and the (capped) display schedule for one loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub monthly_principal_and_interest: Money,
    pub monthly_rate: Rate,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_escrow: Money,
    pub total_cost: Money,
    pub schedule: Vec<Installment>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Convert an annual percentage (6 = 6%) into a monthly decimal rate (0.005).
pub fn monthly_rate(annual_interest_rate_percent: Rate) -> Rate {
    annual_interest_rate_percent / dec!(100) / MONTHS_PER_YEAR
}

/// Level monthly payment covering principal and interest.
///
/// Uses the annuity formula `P·r·(1+r)^n / ((1+r)^n − 1)`; an exactly zero
/// rate falls back to straight-line `P / n`.
pub fn compute_monthly_payment(
    principal: Money,
    annual_interest_rate_percent: Rate,
    term_months: u32,
) -> CalcHubResult<Money> {
    validate_terms(principal, annual_interest_rate_percent, term_months)?;

    let r = monthly_rate(annual_interest_rate_percent);
    let n = Decimal::from(term_months);

    if r.is_zero() {
        return Ok(principal / n);
    }

    let growth = (Decimal::ONE + r)
        .checked_powu(term_months as u64)
        .ok_or_else(|| CalcHubError::Overflow {
            context: "compound growth factor (1 + r)^n".into(),
        })?;
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return Err(CalcHubError::DivisionByZero {
            context: "annuity factor (rate too small to compound)".into(),
        });
    }

    let numerator = principal
        .checked_mul(r)
        .and_then(|v| v.checked_mul(growth))
        .ok_or_else(|| CalcHubError::Overflow {
            context: "annuity numerator".into(),
        })?;
    let payment = numerator
        .checked_div(denominator)
        .ok_or_else(|| CalcHubError::Overflow {
            context: "monthly payment".into(),
        })?;

    debug!(%principal, %annual_interest_rate_percent, term_months, %payment, "computed monthly payment");
    Ok(payment)
}

/// Month-by-month schedule, at most [`SCHEDULE_ROW_CAP`] rows.
///
/// Stops early once the balance reaches exactly zero. A payment smaller than
/// the interest due is not rejected: the principal portion goes negative and
/// the balance grows.
pub fn build_schedule(
    principal: Money,
    monthly_rate: Rate,
    term_months: u32,
    monthly_payment: Money,
) -> CalcHubResult<Vec<Installment>> {
    if principal <= Decimal::ZERO {
        return Err(CalcHubError::invalid("principal", "Principal must be positive"));
    }
    if monthly_rate < Decimal::ZERO {
        return Err(CalcHubError::invalid(
            "monthly_rate",
            "Monthly rate cannot be negative",
        ));
    }
    if term_months == 0 {
        return Err(CalcHubError::invalid(
            "term_months",
            "Term must be at least one month",
        ));
    }
    if monthly_payment <= Decimal::ZERO {
        return Err(CalcHubError::invalid(
            "monthly_payment",
            "Monthly payment must be positive",
        ));
    }

    let rows = term_months.min(SCHEDULE_ROW_CAP);
    let mut schedule = Vec::with_capacity(rows as usize);
    let mut balance = principal;
    let mut negative_amortization = false;

    for payment_number in 1..=rows {
        let interest_portion =
            balance
                .checked_mul(monthly_rate)
                .ok_or_else(|| CalcHubError::Overflow {
                    context: format!("interest at payment {payment_number}"),
                })?;
        let principal_portion = monthly_payment - interest_portion;
        if principal_portion < Decimal::ZERO && !negative_amortization {
            warn!(
                payment_number,
                %monthly_payment,
                %interest_portion,
                "payment does not cover interest; balance will grow"
            );
            negative_amortization = true;
        }

        balance = balance
            .checked_sub(principal_portion)
            .ok_or_else(|| CalcHubError::Overflow {
                context: format!("balance at payment {payment_number}"),
            })?
            .max(Decimal::ZERO);

        schedule.push(Installment {
            payment_number,
            interest_portion,
            principal_portion,
            remaining_balance: balance,
        });

        if balance.is_zero() {
            break;
        }
    }

    Ok(schedule)
}

/// Full-term totals for a level payment plus optional monthly escrow.
pub fn compute_totals(
    principal: Money,
    monthly_payment: Money,
    term_months: u32,
    escrow: Option<&EscrowComponents>,
) -> CalcHubResult<AmortizationTotals> {
    if term_months == 0 {
        return Err(CalcHubError::invalid(
            "term_months",
            "Term must be at least one month",
        ));
    }
    let n = Decimal::from(term_months);
    let overflow = |context: &str| CalcHubError::Overflow {
        context: context.into(),
    };

    let total_payment = monthly_payment
        .checked_mul(n)
        .ok_or_else(|| overflow("total payment"))?;
    let total_interest = total_payment - principal;

    let monthly_escrow = match escrow {
        Some(e) => e.monthly_total()?,
        None => Decimal::ZERO,
    };
    let total_escrow = monthly_escrow
        .checked_mul(n)
        .ok_or_else(|| overflow("total escrow"))?;
    let total_cost = principal
        .checked_add(total_interest)
        .and_then(|v| v.checked_add(total_escrow))
        .ok_or_else(|| overflow("total cost"))?;

    Ok(AmortizationTotals {
        monthly_principal_and_interest: monthly_payment,
        monthly_escrow,
        total_principal: principal,
        total_interest,
        total_escrow,
        total_cost,
    })
}

/// Whether the down payment is small enough to require mortgage insurance.
pub fn pmi_required(loan_amount: Money, down_payment: Money) -> bool {
    down_payment < loan_amount * PMI_DOWN_PAYMENT_THRESHOLD
}

/// Monthly mortgage insurance on the financed principal (0.5% per year).
pub fn monthly_mortgage_insurance(principal: Money) -> Money {
    principal * PMI_ANNUAL_RATE / MONTHS_PER_YEAR
}

/// Payment, full-term totals and capped schedule in one pass.
pub fn amortize(params: &LoanParameters) -> CalcHubResult<AmortizationResult> {
    let payment = compute_monthly_payment(
        params.principal,
        params.annual_interest_rate_percent,
        params.term_months,
    )?;
    let rate = monthly_rate(params.annual_interest_rate_percent);
    let schedule = build_schedule(params.principal, rate, params.term_months, payment)?;
    let totals = compute_totals(
        params.principal,
        payment,
        params.term_months,
        params.escrow.as_ref(),
    )?;

    Ok(AmortizationResult {
        monthly_principal_and_interest: payment,
        monthly_rate: rate,
        total_principal: totals.total_principal,
        total_interest: totals.total_interest,
        total_escrow: totals.total_escrow,
        total_cost: totals.total_cost,
        schedule,
    })
}

fn validate_terms(principal: Money, annual_rate_percent: Rate, term_months: u32) -> CalcHubResult<()> {
    if principal <= Decimal::ZERO {
        return Err(CalcHubError::invalid("principal", "Principal must be positive"));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(CalcHubError::invalid(
            "annual_interest_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    if term_months == 0 {
        return Err(CalcHubError::invalid(
            "term_months",
            "Term must be at least one month",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.000001);

    #[test]
    fn test_payment_known_answer() {
        // 10,000 at 6% over 12 months ≈ 860.66
        let pmt = compute_monthly_payment(dec!(10000), dec!(6), 12).unwrap();
        assert!((pmt - dec!(860.66)).abs() < dec!(0.01), "got {pmt}");
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let pmt = compute_monthly_payment(dec!(1200), dec!(0), 12).unwrap();
        assert_eq!(pmt, dec!(100));
    }

    #[test]
    fn test_rejects_invalid_terms() {
        assert!(compute_monthly_payment(dec!(0), dec!(5), 12).is_err());
        assert!(compute_monthly_payment(dec!(-1), dec!(5), 12).is_err());
        assert!(compute_monthly_payment(dec!(1000), dec!(-0.1), 12).is_err());
        assert!(compute_monthly_payment(dec!(1000), dec!(5), 0).is_err());
    }

    #[test]
    fn test_absurd_rate_overflows_instead_of_panicking() {
        let err = compute_monthly_payment(dec!(1000), dec!(1000000000), 360).unwrap_err();
        assert!(matches!(err, CalcHubError::Overflow { .. }));
    }

    #[test]
    fn test_schedule_pays_off() {
        let pmt = compute_monthly_payment(dec!(10000), dec!(6), 12).unwrap();
        let sched = build_schedule(dec!(10000), monthly_rate(dec!(6)), 12, pmt).unwrap();
        assert_eq!(sched.len(), 12);
        assert_eq!(sched[0].payment_number, 1);
        // First month interest: 10,000 * 0.005 = 50
        assert_eq!(sched[0].interest_portion, dec!(50));
        assert!(sched.last().unwrap().remaining_balance < TOL);
    }

    #[test]
    fn test_schedule_capped_at_360_rows() {
        let pmt = compute_monthly_payment(dec!(100000), dec!(5), 480).unwrap();
        let sched = build_schedule(dec!(100000), monthly_rate(dec!(5)), 480, pmt).unwrap();
        assert_eq!(sched.len(), 360);
        assert!(sched.last().unwrap().remaining_balance > Decimal::ZERO);
    }

    #[test]
    fn test_schedule_stops_when_balance_hits_zero() {
        // Paying 600/month on 1,000 at 0% clears the balance after two rows.
        let sched = build_schedule(dec!(1000), Decimal::ZERO, 12, dec!(600)).unwrap();
        assert_eq!(sched.len(), 2);
        assert_eq!(sched[1].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_negative_amortization_grows_balance() {
        // Interest due is 100/month; paying 50 lets the balance grow.
        let sched = build_schedule(dec!(10000), dec!(0.01), 3, dec!(50)).unwrap();
        assert!(sched[0].principal_portion < Decimal::ZERO);
        assert!(sched[2].remaining_balance > sched[0].remaining_balance);
    }

    #[test]
    fn test_totals_use_uncapped_term() {
        let pmt = compute_monthly_payment(dec!(100000), dec!(5), 480).unwrap();
        let totals = compute_totals(dec!(100000), pmt, 480, None).unwrap();
        assert_eq!(totals.total_interest, pmt * dec!(480) - dec!(100000));
        assert_eq!(totals.total_escrow, Decimal::ZERO);
    }

    #[test]
    fn test_totals_with_escrow() {
        let escrow = EscrowComponents {
            property_tax: dec!(300),
            insurance: dec!(100),
            mortgage_insurance: dec!(0),
        };
        let totals = compute_totals(dec!(1200), dec!(100), 12, Some(&escrow)).unwrap();
        assert_eq!(totals.total_interest, dec!(0));
        assert_eq!(totals.total_escrow, dec!(4800));
        assert_eq!(totals.total_cost, dec!(6000));
    }

    #[test]
    fn test_escrow_overflow_is_an_error() {
        let escrow = EscrowComponents {
            property_tax: Decimal::MAX,
            insurance: dec!(1),
            mortgage_insurance: dec!(0),
        };
        assert!(matches!(
            escrow.monthly_total().unwrap_err(),
            CalcHubError::Overflow { .. }
        ));
    }

    #[test]
    fn test_total_cost_overflow_is_an_error() {
        // Escrow alone fits; principal + interest + escrow does not.
        let escrow = EscrowComponents {
            property_tax: (Decimal::MAX / dec!(30)).trunc(),
            insurance: dec!(0),
            mortgage_insurance: dec!(0),
        };
        let err = compute_totals(dec!(240000), dec!(8000), 30, Some(&escrow)).unwrap_err();
        assert!(matches!(err, CalcHubError::Overflow { .. }), "got {err:?}");
    }

    #[test]
    fn test_growing_balance_overflow_is_an_error() {
        // A 1.00 payment against 50% monthly interest: the balance grows until it
        // no longer fits in a Decimal.
        let err = build_schedule(Decimal::MAX / dec!(2), dec!(0.5), 360, dec!(1)).unwrap_err();
        assert!(matches!(err, CalcHubError::Overflow { .. }), "got {err:?}");
    }

    #[test]
    fn test_pmi_threshold() {
        assert!(pmi_required(dec!(300000), dec!(30000)));
        assert!(!pmi_required(dec!(300000), dec!(60000)));
        assert_eq!(monthly_mortgage_insurance(dec!(270000)), dec!(112.5));
    }

    #[test]
    fn test_amortize_is_idempotent() {
        let params = LoanParameters {
            principal: dec!(250000),
            annual_interest_rate_percent: dec!(6.5),
            term_months: 360,
            escrow: None,
        };
        assert_eq!(amortize(&params).unwrap(), amortize(&params).unwrap());
    }
}
