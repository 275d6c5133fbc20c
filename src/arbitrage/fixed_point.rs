use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint, Sign};

use crate::error::{ArbResult, ArbitrageError};

pub const DEFAULT_DECIMAL_PLACES: u32 = 6;

// Rounds half up on the magnitude; the sign is applied afterwards, so a
// negative quotient that rounds to zero renders as "-0".
pub fn divide<N, D>(numerator: N, denominator: D, decimal_places: u32) -> ArbResult<String>
where
    N: Into<BigInt>,
    D: Into<BigInt>,
{
    let numerator: BigInt = numerator.into();
    let denominator: BigInt = denominator.into();

    if denominator.sign() == Sign::NoSign {
        return Err(ArbitrageError::DivisionByZero);
    }

    let is_negative = (numerator.sign() == Sign::Minus) != (denominator.sign() == Sign::Minus);
    let numerator = numerator.magnitude();
    let denominator = denominator.magnitude();

    let scaled = numerator * BigUint::from(10u32).pow(decimal_places);
    let mut quotient = &scaled / denominator;
    let remainder = &scaled % denominator;
    if &remainder * 2u32 >= *denominator {
        quotient += 1u32;
    }

    let digits = quotient.to_string();
    let mut rendered = if decimal_places > 0 {
        let places = decimal_places as usize;
        let padded = format!("{:0>width$}", digits, width = places + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - places);
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            int_part.to_string()
        } else {
            format!("{}.{}", int_part, frac_part)
        }
    } else {
        digits
    };

    if is_negative {
        rendered.insert(0, '-');
    }

    Ok(rendered)
}

pub fn ratio<N, D>(numerator: N, denominator: D) -> ArbResult<String>
where
    N: Into<BigInt>,
    D: Into<BigInt>,
{
    divide(numerator, denominator, DEFAULT_DECIMAL_PLACES)
}

pub fn to_display_units(amount: impl Into<BigInt>, decimals: u32) -> BigDecimal {
    BigDecimal::new(amount.into(), decimals as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_exact_ratio() {
        assert_eq!(divide(1_050_000_000u64, 1_000_000_000u64, 6).unwrap(), "1.05");
        assert_eq!(divide(2, 1, 6).unwrap(), "2");
        assert_eq!(divide(1, 4, 6).unwrap(), "0.25");
        assert_eq!(divide(0, 7, 6).unwrap(), "0");
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(divide(5, 0, 6), Err(ArbitrageError::DivisionByZero));
        assert_eq!(divide(0, 0, 0), Err(ArbitrageError::DivisionByZero));
        assert_eq!(divide(-5, 0, 2), Err(ArbitrageError::DivisionByZero));
    }

    #[test]
    fn test_round_half_up() {
        // 2/3 = 0.6666.. -> 0.666667
        assert_eq!(divide(2, 3, 6).unwrap(), "0.666667");
        // 1/3 = 0.3333.. -> 0.333333
        assert_eq!(divide(1, 3, 6).unwrap(), "0.333333");
        // exactly half rounds up
        assert_eq!(divide(1, 8, 2).unwrap(), "0.13");
        assert_eq!(divide(5, 2, 0).unwrap(), "3");
        assert_eq!(divide(-5, 2, 0).unwrap(), "-3");
    }

    #[test]
    fn test_sign_handling() {
        let magnitude = divide(7, 3, 6).unwrap();
        assert_eq!(divide(-7, 3, 6).unwrap(), format!("-{}", magnitude));
        assert_eq!(divide(7, -3, 6).unwrap(), format!("-{}", magnitude));
        assert_eq!(divide(-7, -3, 6).unwrap(), magnitude);
    }

    #[test]
    fn test_negative_result_rounding_to_zero_keeps_sign() {
        assert_eq!(divide(1, 10_000_000, 6).unwrap(), "0");
        assert_eq!(divide(-1, 10_000_000, 6).unwrap(), "-0");
        assert_eq!(divide(1, -10_000_000, 6).unwrap(), "-0");
        assert_eq!(divide(-1, -10_000_000, 6).unwrap(), "0");
        assert_eq!(divide(0, -3, 6).unwrap(), "-0");
    }

    #[test]
    fn test_zero_places_keeps_integer_zeros() {
        assert_eq!(divide(100, 1, 0).unwrap(), "100");
        assert_eq!(divide(0, 1, 0).unwrap(), "0");
    }

    #[test]
    fn test_small_values_are_left_padded() {
        assert_eq!(divide(1, 1_000, 6).unwrap(), "0.001");
        assert_eq!(divide(1, 2_000_000, 6).unwrap(), "0.000001");
        assert_eq!(divide(1, 3_000_000, 6).unwrap(), "0");
    }

    #[test]
    fn test_large_integers_are_exact() {
        let numerator = BigInt::from_str("123456789012345678901234567890123456789").unwrap();
        let denominator = BigInt::from_str("1000000000000000000000000000000").unwrap();
        assert_eq!(
            divide(numerator, denominator, 6).unwrap(),
            "123456789.012346"
        );

        let huge = BigInt::from(u64::MAX) * BigInt::from(u64::MAX);
        assert_eq!(divide(huge.clone(), huge, 6).unwrap(), "1");
    }

    #[test]
    fn test_result_within_precision() {
        let cases: &[(i64, i64, u32)] = &[
            (1, 3, 6),
            (2, 3, 4),
            (-22, 7, 8),
            (1_000_000_007, 999_999_937, 9),
            (987_654_321, -123, 3),
            (5, 9, 0),
        ];

        for &(n, d, places) in cases {
            let rendered = divide(n, d, places).unwrap();
            let parsed = BigDecimal::from_str(&rendered).unwrap();
            let exact = BigDecimal::from(n) / BigDecimal::from(d);
            let tolerance = BigDecimal::new(BigInt::from(1), places as i64);
            let diff = (parsed - exact).abs();
            assert!(
                diff <= tolerance,
                "divide({}, {}, {}) = {} is off by {}",
                n, d, places, rendered, diff
            );
        }
    }

    #[test]
    fn test_default_precision() {
        assert_eq!(ratio(1, 7).unwrap(), "0.142857");
    }

    #[test]
    fn test_display_units() {
        assert_eq!(
            to_display_units(1_500_000_000u64, 9),
            BigDecimal::from_str("1.5").unwrap()
        );
        assert_eq!(
            to_display_units(-50_000_000i64, 9),
            BigDecimal::from_str("-0.05").unwrap()
        );
    }
}
