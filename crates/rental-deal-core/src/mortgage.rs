use log::warn;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::DealEngineError;
use crate::types::Money;
use crate::DealResult;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Loan terms for a payment quote.
///
/// `interest_rate` is in percentage points (7.0 = 7%), matching the external
/// pricing service's wire format. Conversion to a decimal rate happens only
/// inside the manual formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInputs {
    pub loan_amount: Money,
    pub interest_rate: Decimal,
    pub duration_years: u32,
}

/// Which strategy produced the accepted payment. Structural, so callers
/// never have to infer fallback from the numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSource {
    External,
    Manual,
}

/// Accepted mortgage quote. Both strategies pass the same invariant check
/// (finite, positive payment) before one of these is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageQuote {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub source: PaymentSource,
}

impl MortgageQuote {
    pub fn used_fallback(&self) -> bool {
        self.source == PaymentSource::Manual
    }
}

/// Raw response from the external pricing service. Every field is optional;
/// anything missing or malformed just disqualifies the external result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalQuote {
    #[serde(default)]
    pub monthly_payment: Option<f64>,
    #[serde(default)]
    pub annual_payment: Option<f64>,
    #[serde(default)]
    pub total_interest_paid: Option<f64>,
}

/// Seam for the external pricing service, so analysis code and tests never
/// depend on live HTTP.
pub trait MortgageQuoteSource {
    fn quote(&self, inputs: &MortgageInputs) -> DealResult<ExternalQuote>;
}

/// External pricing service client. One attempt per call, bounded timeout,
/// no retries; every failure mode resolves to the manual fallback upstream.
pub struct HttpMortgageService {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpMortgageService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> DealResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DealEngineError::ExternalService(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn with_default_timeout(base_url: impl Into<String>) -> DealResult<Self> {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }
}

impl MortgageQuoteSource for HttpMortgageService {
    fn quote(&self, inputs: &MortgageInputs) -> DealResult<ExternalQuote> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("loan_amount", inputs.loan_amount.to_string()),
                ("interest_rate", inputs.interest_rate.to_string()),
                ("duration_years", inputs.duration_years.to_string()),
            ])
            .send()
            .map_err(|e| DealEngineError::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DealEngineError::ExternalService(format!(
                "pricing service returned {}",
                response.status()
            )));
        }

        response
            .json::<ExternalQuote>()
            .map_err(|e| DealEngineError::ExternalService(e.to_string()))
    }
}

fn validate_inputs(inputs: &MortgageInputs) -> DealResult<()> {
    if inputs.loan_amount <= Decimal::ZERO {
        return Err(DealEngineError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount must be positive".into(),
        });
    }
    if inputs.interest_rate < Decimal::ZERO {
        return Err(DealEngineError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate must not be negative".into(),
        });
    }
    if inputs.duration_years == 0 {
        return Err(DealEngineError::InvalidInput {
            field: "duration_years".into(),
            reason: "Loan duration must be at least 1 year".into(),
        });
    }
    Ok(())
}

/// Standard fixed-rate amortisation: P * r(1+r)^n / ((1+r)^n - 1).
///
/// `annual_rate_pct` is in percentage points. The zero-rate loan is
/// straight-line (L / n) since the closed form is undefined at r = 0.
pub fn manual_monthly_payment(
    loan_amount: Money,
    annual_rate_pct: Decimal,
    duration_years: u32,
) -> DealResult<Money> {
    let total_months = duration_years * 12;
    if total_months == 0 {
        return Err(DealEngineError::InvalidInput {
            field: "duration_years".into(),
            reason: "Loan duration must be at least 1 year".into(),
        });
    }

    let monthly_rate = annual_rate_pct / dec!(100) / dec!(12);
    if monthly_rate.is_zero() {
        return Ok(loan_amount / Decimal::from(total_months));
    }

    // (1 + r)^n via iterative multiplication
    let mut compound = Decimal::ONE;
    for _ in 0..total_months {
        compound *= Decimal::ONE + monthly_rate;
    }

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(DealEngineError::CalculationError(
            "mortgage payment denominator collapsed to zero".into(),
        ));
    }

    Ok(loan_amount * monthly_rate * compound / denominator)
}

/// Convert the external payment to Decimal, rejecting anything that is
/// missing, non-finite, or non-positive.
fn accepted_external_payment(quote: &ExternalQuote) -> Option<Money> {
    let raw = quote.monthly_payment?;
    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }
    Decimal::from_f64(raw)
}

/// Compute a mortgage quote, preferring the external pricing service when a
/// source is supplied. Exactly one external attempt; any failure or unusable
/// response falls through to the manual formula. Fails with
/// `CalculationError` only if the manual path also violates the
/// positive-payment invariant.
pub fn compute_mortgage(
    inputs: &MortgageInputs,
    external: Option<&dyn MortgageQuoteSource>,
) -> DealResult<MortgageQuote> {
    validate_inputs(inputs)?;

    if let Some(source) = external {
        match source.quote(inputs) {
            Ok(quote) => match accepted_external_payment(&quote) {
                Some(payment) => return Ok(build_quote(inputs, payment, PaymentSource::External)),
                None => warn!(
                    "pricing service returned unusable monthly_payment; using manual formula"
                ),
            },
            Err(e) => warn!("pricing service unavailable ({e}); using manual formula"),
        }
    }

    let payment = manual_monthly_payment(
        inputs.loan_amount,
        inputs.interest_rate,
        inputs.duration_years,
    )?;
    if payment <= Decimal::ZERO {
        return Err(DealEngineError::CalculationError(format!(
            "manual amortisation produced non-positive payment {payment}"
        )));
    }

    Ok(build_quote(inputs, payment, PaymentSource::Manual))
}

fn build_quote(inputs: &MortgageInputs, payment: Money, source: PaymentSource) -> MortgageQuote {
    let total_paid = payment * dec!(12) * Decimal::from(inputs.duration_years);
    MortgageQuote {
        monthly_payment: payment,
        total_paid,
        total_interest: total_paid - inputs.loan_amount,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(f64);

    impl MortgageQuoteSource for FixedSource {
        fn quote(&self, _inputs: &MortgageInputs) -> DealResult<ExternalQuote> {
            Ok(ExternalQuote {
                monthly_payment: Some(self.0),
                ..Default::default()
            })
        }
    }

    struct FailingSource;

    impl MortgageQuoteSource for FailingSource {
        fn quote(&self, _inputs: &MortgageInputs) -> DealResult<ExternalQuote> {
            Err(DealEngineError::ExternalService("connection refused".into()))
        }
    }

    fn thirty_year(loan_amount: Decimal, rate_pct: Decimal) -> MortgageInputs {
        MortgageInputs {
            loan_amount,
            interest_rate: rate_pct,
            duration_years: 30,
        }
    }

    #[test]
    fn test_manual_payment_reference_value() {
        // $240k at 7% over 30 years: ~$1596.73/mo
        let payment = manual_monthly_payment(dec!(240000), dec!(7), 30).unwrap();
        assert!(
            (payment - dec!(1596.73)).abs() < dec!(0.01),
            "payment {payment} outside expected range"
        );
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let payment = manual_monthly_payment(dec!(360000), Decimal::ZERO, 30).unwrap();
        assert_eq!(payment, dec!(1000));
    }

    #[test]
    fn test_manual_payment_always_positive() {
        for (loan, rate, years) in [
            (dec!(1), dec!(0), 1u32),
            (dec!(50000), dec!(3.5), 15),
            (dec!(1000000), dec!(12), 40),
        ] {
            let payment = manual_monthly_payment(loan, rate, years).unwrap();
            assert!(payment > Decimal::ZERO, "{loan} @ {rate}% / {years}y");
        }
    }

    #[test]
    fn test_input_validation() {
        let bad_loan = MortgageInputs {
            loan_amount: Decimal::ZERO,
            interest_rate: dec!(7),
            duration_years: 30,
        };
        assert!(matches!(
            compute_mortgage(&bad_loan, None),
            Err(DealEngineError::InvalidInput { .. })
        ));

        let bad_rate = MortgageInputs {
            loan_amount: dec!(100000),
            interest_rate: dec!(-1),
            duration_years: 30,
        };
        assert!(matches!(
            compute_mortgage(&bad_rate, None),
            Err(DealEngineError::InvalidInput { .. })
        ));

        let bad_term = MortgageInputs {
            loan_amount: dec!(100000),
            interest_rate: dec!(7),
            duration_years: 0,
        };
        assert!(matches!(
            compute_mortgage(&bad_term, None),
            Err(DealEngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_external_quote_is_authoritative() {
        let source = FixedSource(1500.0);
        let quote = compute_mortgage(&thirty_year(dec!(240000), dec!(7)), Some(&source)).unwrap();
        assert_eq!(quote.source, PaymentSource::External);
        assert!(!quote.used_fallback());
        assert_eq!(quote.monthly_payment, dec!(1500));
    }

    #[test]
    fn test_service_failure_falls_back_to_manual() {
        let inputs = thirty_year(dec!(240000), dec!(7));
        let quote = compute_mortgage(&inputs, Some(&FailingSource)).unwrap();
        let manual = manual_monthly_payment(dec!(240000), dec!(7), 30).unwrap();

        assert_eq!(quote.source, PaymentSource::Manual);
        assert!(quote.used_fallback());
        assert_eq!(quote.monthly_payment, manual);
        assert!((quote.monthly_payment - dec!(1596.73)).abs() < dec!(0.01));
    }

    #[test]
    fn test_unusable_external_payment_falls_back() {
        for bad in [FixedSource(0.0), FixedSource(-25.0), FixedSource(f64::NAN)] {
            let quote = compute_mortgage(&thirty_year(dec!(240000), dec!(7)), Some(&bad)).unwrap();
            assert_eq!(quote.source, PaymentSource::Manual);
        }
    }

    #[test]
    fn test_missing_external_payment_falls_back() {
        struct EmptySource;
        impl MortgageQuoteSource for EmptySource {
            fn quote(&self, _inputs: &MortgageInputs) -> DealResult<ExternalQuote> {
                Ok(ExternalQuote::default())
            }
        }
        let quote = compute_mortgage(&thirty_year(dec!(240000), dec!(7)), Some(&EmptySource)).unwrap();
        assert_eq!(quote.source, PaymentSource::Manual);
    }

    #[test]
    fn test_quote_amortisation_totals() {
        let quote = compute_mortgage(&thirty_year(dec!(240000), dec!(7)), None).unwrap();
        assert_eq!(quote.total_paid, quote.monthly_payment * dec!(360));
        assert_eq!(quote.total_interest, quote.total_paid - dec!(240000));
        assert!(quote.total_interest > Decimal::ZERO);
    }
}
