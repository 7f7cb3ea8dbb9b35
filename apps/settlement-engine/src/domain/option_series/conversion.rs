//! Proportional conversion between long and short units of a series.
//!
//! Both directions floor; they are inverses only up to truncation.

use crate::domain::option_series::OptionSeries;
use crate::domain::shared::DomainError;
use crate::domain::shared::math::mul_div;

/// Long units backing `short_qty` short units: `short_qty * base / quote`.
pub fn long_from_short(option: &OptionSeries, short_qty: u128) -> Result<u128, DomainError> {
    mul_div(short_qty, option.base(), option.quote(), "long_from_short")
}

/// Short units minted alongside `long_qty` long units: `long_qty * quote / base`.
pub fn short_from_long(option: &OptionSeries, long_qty: u128) -> Result<u128, DomainError> {
    mul_div(long_qty, option.quote(), option.base(), "short_from_long")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::option_series::option_series::fixtures::series;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(1, 1, 10 => 10 ; "parity")]
    #[test_case(1, 100, 3 => 300 ; "call style quote")]
    #[test_case(100, 1, 250 => 2 ; "put style floors")]
    #[test_case(3, 7, 0 => 0 ; "zero")]
    fn short_from_long_cases(base: u128, quote: u128, long: u128) -> u128 {
        short_from_long(&series(base, quote), long).unwrap()
    }

    #[test_case(1, 1, 10 => 10 ; "parity")]
    #[test_case(1, 100, 300 => 3 ; "call style quote")]
    #[test_case(1, 100, 299 => 2 ; "call style floors")]
    #[test_case(100, 1, 2 => 200 ; "put style")]
    fn long_from_short_cases(base: u128, quote: u128, short: u128) -> u128 {
        long_from_short(&series(base, quote), short).unwrap()
    }

    #[test]
    fn overflow_is_an_error() {
        let s = series(1, 2);
        assert!(short_from_long(&s, u128::MAX).is_err());
    }

    proptest! {
        #[test]
        fn short_round_trip_never_overstates(
            base in 1u128..1_000_000,
            quote in 1u128..1_000_000,
            short in 0u128..1_000_000_000_000_000_000_000,
        ) {
            let s = series(base, quote);
            let long = long_from_short(&s, short).unwrap();
            prop_assert!(short_from_long(&s, long).unwrap() <= short);
        }

        #[test]
        fn long_round_trip_never_overstates(
            base in 1u128..1_000_000,
            quote in 1u128..1_000_000,
            long in 0u128..1_000_000_000_000_000_000_000,
        ) {
            let s = series(base, quote);
            let short = short_from_long(&s, long).unwrap();
            prop_assert!(long_from_short(&s, short).unwrap() <= long);
        }
    }
}
