//! Implied volatility from an options-chain snapshot.
//!
//! Absence of implied volatility is an expected condition here: every lookup
//! returns `Option` or a possibly short `Vec` and never fails. Implied
//! volatilities are assumed to be decimal fractions already; normalizing
//! provider quotes is the loader's job.
//!
//! Days to expiry are counted from the snapshot's `as_of` date, which keeps
//! every function a pure function of its inputs.

use tracing::debug;
use vol_core::chain::{OptionContract, OptionType, OptionsChainSnapshot};
use vol_core::types::Date;

/// Default number of expirations in a term structure.
pub const DEFAULT_TERM_STRUCTURE_EXPIRATIONS: usize = 4;

/// One point of an ATM implied-volatility term structure.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TermStructurePoint {
    /// Expiration date
    pub expiration: Date,
    /// Calendar days from the snapshot date
    pub days_to_expiry: i64,
    /// ACT/365 year fraction from the snapshot date
    pub years_to_expiry: f64,
    /// Strike of the selected ATM contract
    pub strike: f64,
    /// Implied volatility of the selected ATM contract
    pub implied_volatility: f64,
}

/// The contract of `option_type` whose strike is closest to `current_price`.
///
/// Ties go to the first contract in provider order. Contracts with a
/// non-finite strike are ignored. Returns `None` when nothing matches or
/// `current_price` is not a positive finite number.
pub fn find_atm_contract(
    chain: &OptionsChainSnapshot,
    current_price: f64,
    expiration: Option<Date>,
    option_type: OptionType,
) -> Option<&OptionContract> {
    if !(current_price.is_finite() && current_price > 0.0) {
        return None;
    }
    let mut best: Option<(&OptionContract, f64)> = None;
    for contract in chain.filter(option_type, expiration) {
        if !contract.strike.is_finite() {
            continue;
        }
        let distance = (contract.strike - current_price).abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((contract, distance)),
        }
    }
    best.map(|(contract, _)| contract)
}

/// ATM implied volatility.
///
/// Filters by `option_type` and, when given, `expiration`; picks the strike
/// closest to `current_price` and returns its implied volatility. `None` when
/// no contract matches or the selected contract carries no usable IV.
///
/// # Example
///
/// ```
/// use vol_core::chain::{OptionContract, OptionType, OptionsChainSnapshot};
/// use vol_core::types::Date;
/// use vol_estimators::implied::extract_atm_implied_volatility;
///
/// let as_of = Date::from_ymd(2024, 6, 14).unwrap();
/// let expiry = as_of.add_days(7);
/// let contracts = [(95.0, 0.30), (100.0, 0.25), (105.0, 0.28)]
///     .iter()
///     .map(|&(k, iv)| OptionContract::new(k, expiry, OptionType::Call, Some(iv)))
///     .collect();
/// let chain = OptionsChainSnapshot::new("XYZ", as_of, contracts);
///
/// let iv = extract_atm_implied_volatility(&chain, 100.0, None, OptionType::Call);
/// assert_eq!(iv, Some(0.25));
/// ```
pub fn extract_atm_implied_volatility(
    chain: &OptionsChainSnapshot,
    current_price: f64,
    expiration: Option<Date>,
    option_type: OptionType,
) -> Option<f64> {
    find_atm_contract(chain, current_price, expiration, option_type)
        .and_then(OptionContract::usable_implied_volatility)
}

/// ATM call implied volatility for up to `num_expirations` soonest expirations.
///
/// Expirations whose ATM call has no IV are skipped, so the result may be
/// shorter than `num_expirations`. Points are in ascending expiration order.
pub fn calculate_iv_term_structure(
    chain: &OptionsChainSnapshot,
    current_price: f64,
    num_expirations: usize,
) -> Vec<TermStructurePoint> {
    let mut points = Vec::with_capacity(num_expirations);
    for expiration in chain.expirations().into_iter().take(num_expirations) {
        let atm = find_atm_contract(chain, current_price, Some(expiration), OptionType::Call);
        let Some((strike, iv)) =
            atm.and_then(|c| c.usable_implied_volatility().map(|iv| (c.strike, iv)))
        else {
            debug!(%expiration, "no ATM implied volatility, skipping expiration");
            continue;
        };
        points.push(TermStructurePoint {
            expiration,
            days_to_expiry: chain.days_to_expiry(expiration),
            years_to_expiry: chain.as_of.year_fraction_to(expiration),
            strike,
            implied_volatility: iv,
        });
    }
    points
}

/// Earliest available expiration, `None` for an empty chain.
pub fn nearest_weekly_expiration(chain: &OptionsChainSnapshot) -> Option<Date> {
    chain.expirations().into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn as_of() -> Date {
        Date::from_ymd(2024, 6, 14).unwrap()
    }

    fn call(strike: f64, days: i64, iv: Option<f64>) -> OptionContract {
        OptionContract::new(strike, as_of().add_days(days), OptionType::Call, iv)
    }

    fn put(strike: f64, days: i64, iv: Option<f64>) -> OptionContract {
        OptionContract::new(strike, as_of().add_days(days), OptionType::Put, iv)
    }

    fn chain(contracts: Vec<OptionContract>) -> OptionsChainSnapshot {
        OptionsChainSnapshot::new("XYZ", as_of(), contracts)
    }

    // ========================================================================
    // ATM extraction
    // ========================================================================

    #[test]
    fn test_empty_chain_gives_none() {
        let c = chain(vec![]);
        assert_eq!(extract_atm_implied_volatility(&c, 100.0, None, OptionType::Call), None);
        assert_eq!(nearest_weekly_expiration(&c), None);
        assert!(calculate_iv_term_structure(&c, 100.0, 4).is_empty());
    }

    #[test]
    fn test_picks_exact_atm_strike() {
        let c = chain(vec![
            call(95.0, 7, Some(0.31)),
            call(100.0, 7, Some(0.27)),
            call(105.0, 7, Some(0.29)),
        ]);
        assert_eq!(
            extract_atm_implied_volatility(&c, 100.0, None, OptionType::Call),
            Some(0.27)
        );
    }

    #[test]
    fn test_closest_strike_wins() {
        let c = chain(vec![call(95.0, 7, Some(0.31)), call(105.0, 7, Some(0.29))]);
        assert_eq!(
            extract_atm_implied_volatility(&c, 103.0, None, OptionType::Call),
            Some(0.29)
        );
    }

    #[test]
    fn test_tie_goes_to_first_in_provider_order() {
        let c = chain(vec![call(105.0, 7, Some(0.29)), call(95.0, 7, Some(0.31))]);
        assert_eq!(
            extract_atm_implied_volatility(&c, 100.0, None, OptionType::Call),
            Some(0.29)
        );
    }

    #[test]
    fn test_filters_by_type_and_expiration() {
        let c = chain(vec![
            call(100.0, 7, Some(0.20)),
            put(100.0, 7, Some(0.24)),
            call(100.0, 14, Some(0.22)),
        ]);
        assert_eq!(
            extract_atm_implied_volatility(&c, 100.0, None, OptionType::Put),
            Some(0.24)
        );
        assert_eq!(
            extract_atm_implied_volatility(
                &c,
                100.0,
                Some(as_of().add_days(14)),
                OptionType::Call
            ),
            Some(0.22)
        );
        assert_eq!(
            extract_atm_implied_volatility(&c, 100.0, Some(as_of().add_days(21)), OptionType::Call),
            None
        );
    }

    #[test]
    fn test_selected_contract_without_iv_gives_none() {
        // The closest strike is chosen first; a missing IV is not replaced by a neighbour
        let c = chain(vec![call(95.0, 7, Some(0.31)), call(100.0, 7, None)]);
        assert_eq!(extract_atm_implied_volatility(&c, 100.0, None, OptionType::Call), None);
    }

    #[test]
    fn test_invalid_current_price() {
        let c = chain(vec![call(100.0, 7, Some(0.2))]);
        assert_eq!(find_atm_contract(&c, f64::NAN, None, OptionType::Call), None);
        assert_eq!(find_atm_contract(&c, 0.0, None, OptionType::Call), None);
    }

    // ========================================================================
    // Term structure
    // ========================================================================

    #[test]
    fn test_term_structure_points() {
        let c = chain(vec![
            call(100.0, 28, Some(0.26)),
            call(100.0, 7, Some(0.21)),
            call(100.0, 14, Some(0.23)),
        ]);
        let ts = calculate_iv_term_structure(&c, 100.0, DEFAULT_TERM_STRUCTURE_EXPIRATIONS);
        assert_eq!(ts.len(), 3);
        assert_eq!(
            ts.iter().map(|p| p.days_to_expiry).collect::<Vec<_>>(),
            vec![7, 14, 28]
        );
        assert_eq!(ts[0].implied_volatility, 0.21);
        assert_eq!(ts[0].strike, 100.0);
        assert!((ts[2].years_to_expiry - 28.0 / 365.0).abs() < 1e-12);
    }

    #[test]
    fn test_term_structure_skips_missing_iv() {
        let c = chain(vec![
            call(100.0, 7, Some(0.21)),
            call(100.0, 14, None),
            call(100.0, 21, Some(0.24)),
        ]);
        let ts = calculate_iv_term_structure(&c, 100.0, 4);
        assert_eq!(ts.len(), 2);
        assert_eq!(ts[1].days_to_expiry, 21);
    }

    #[test]
    fn test_term_structure_limits_expirations() {
        let contracts = (1..=8).map(|w| call(100.0, 7 * w, Some(0.2))).collect();
        let ts = calculate_iv_term_structure(&chain(contracts), 100.0, 4);
        assert_eq!(ts.len(), 4);
        assert_eq!(ts[3].days_to_expiry, 28);
    }

    #[test]
    fn test_term_structure_ignores_puts_only_expiration() {
        let c = chain(vec![put(100.0, 7, Some(0.21)), call(100.0, 14, Some(0.23))]);
        let ts = calculate_iv_term_structure(&c, 100.0, 4);
        assert_eq!(ts.len(), 1);
        assert_eq!(ts[0].days_to_expiry, 14);
    }

    #[test]
    fn test_nearest_expiration_ignores_expired() {
        let c = chain(vec![call(100.0, -3, Some(0.2)), call(100.0, 10, Some(0.2))]);
        assert_eq!(nearest_weekly_expiration(&c), Some(as_of().add_days(10)));
    }

    // ========================================================================
    // Property-based Tests
    // ========================================================================

    proptest! {
        #[test]
        fn prop_term_structure_bounded_and_ordered(
            days in prop::collection::vec(0i64..400, 0..30),
            n in 0usize..8,
        ) {
            let contracts = days
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    let iv = if i % 3 == 0 { None } else { Some(0.2) };
                    call(90.0 + i as f64, *d, iv)
                })
                .collect();
            let ts = calculate_iv_term_structure(&chain(contracts), 100.0, n);
            prop_assert!(ts.len() <= n);
            for pair in ts.windows(2) {
                prop_assert!(pair[0].days_to_expiry <= pair[1].days_to_expiry);
            }
        }
    }
}
