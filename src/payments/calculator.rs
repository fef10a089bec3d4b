//! Commission / advance / balance split for a vendor order

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Platform commission, percent of the product total
pub const COMMISSION_RATE: Decimal = dec!(5.00);
/// Share of vendor earnings paid before hub verification, percent
pub const ADVANCE_PERCENTAGE: Decimal = dec!(40.00);
/// Share of vendor earnings paid after hub verification, percent
pub const BALANCE_PERCENTAGE: Decimal = dec!(60.00);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalculationError {
    #[error("Product total must be greater than 0 (got {0})")]
    NonPositiveTotal(Decimal),
}

/// Full breakdown of what the platform keeps and what the vendor receives
///
/// Every amount is rounded to 2 dp and the parts always add up:
/// `commission_amount + vendor_earnings == product_total` and
/// `advance_amount + balance_amount == vendor_earnings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    pub product_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub commission_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub commission_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub vendor_earnings: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub advance_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub advance_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance_amount: Decimal,
}

/// Round half away from zero to 2 decimal places
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    round_money(amount * percent / dec!(100))
}

pub fn calculate_breakdown(product_total: Decimal) -> Result<PaymentBreakdown, CalculationError> {
    let product_total = round_money(product_total);
    if product_total <= Decimal::ZERO {
        return Err(CalculationError::NonPositiveTotal(product_total));
    }

    // Remainders are taken by subtraction so the rounded parts sum exactly.
    let commission_amount = percent_of(product_total, COMMISSION_RATE);
    let vendor_earnings = product_total - commission_amount;
    let advance_amount = percent_of(vendor_earnings, ADVANCE_PERCENTAGE);
    let balance_amount = vendor_earnings - advance_amount;

    Ok(PaymentBreakdown {
        product_total,
        commission_rate: COMMISSION_RATE,
        commission_amount,
        vendor_earnings,
        advance_percentage: ADVANCE_PERCENTAGE,
        advance_amount,
        balance_percentage: BALANCE_PERCENTAGE,
        balance_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousand_naira_split() {
        let b = calculate_breakdown(dec!(1000.00)).unwrap();
        assert_eq!(b.commission_amount, dec!(50.00));
        assert_eq!(b.vendor_earnings, dec!(950.00));
        assert_eq!(b.advance_amount, dec!(380.00));
        assert_eq!(b.balance_amount, dec!(570.00));
        assert_eq!(b.commission_rate, dec!(5));
        assert_eq!(b.advance_percentage, dec!(40));
        assert_eq!(b.balance_percentage, dec!(60));
    }

    #[test]
    fn test_parts_always_sum_to_whole() {
        for total in [
            dec!(0.01),
            dec!(0.10),
            dec!(1.99),
            dec!(33.33),
            dec!(12345.67),
            dec!(999999.99),
            dec!(7.777),
        ] {
            let b = calculate_breakdown(total).unwrap();
            assert_eq!(b.commission_amount + b.vendor_earnings, b.product_total);
            assert_eq!(b.advance_amount + b.balance_amount, b.vendor_earnings);
            assert!(b.commission_amount.scale() <= 2);
            assert!(b.balance_amount.scale() <= 2);
        }
    }

    #[test]
    fn test_rounds_half_up() {
        // 0.10 * 5% = 0.005 -> 0.01
        let b = calculate_breakdown(dec!(0.10)).unwrap();
        assert_eq!(b.commission_amount, dec!(0.01));
        assert_eq!(b.vendor_earnings, dec!(0.09));
        assert_eq!(round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(round_money(dec!(-2.345)), dec!(-2.35));
    }

    #[test]
    fn test_rejects_zero_and_negative_totals() {
        assert_eq!(
            calculate_breakdown(Decimal::ZERO),
            Err(CalculationError::NonPositiveTotal(Decimal::ZERO))
        );
        assert!(calculate_breakdown(dec!(-10)).is_err());
        // rounds to zero
        assert!(calculate_breakdown(dec!(0.004)).is_err());
    }

    #[test]
    fn test_serializes_camel_case_numbers() {
        let b = calculate_breakdown(dec!(1000)).unwrap();
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["commissionAmount"], 50.0);
        assert_eq!(json["advanceAmount"], 380.0);
        assert_eq!(json["balancePercentage"], 60.0);
    }
}
