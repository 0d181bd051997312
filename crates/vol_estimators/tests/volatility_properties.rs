//! Cross-module invariants of the volatility engine.
//!
//! Covers the published properties of the estimators, blender and implied
//! volatility extraction on generated inputs, and the end-to-end flow from
//! raw provider data to a final figure.

use approx::assert_relative_eq;
use proptest::prelude::*;
use vol_core::chain::{OptionContract, OptionType, OptionsChainSnapshot};
use vol_core::params::{BlendWeights, EstimatorConfig};
use vol_core::series::{PriceData, PriceSeries};
use vol_core::types::{Date, SeriesError, VolatilityError};
use vol_estimators::prelude::*;

fn dates(n: usize) -> Vec<Date> {
    let start = Date::from_ymd(2023, 3, 1).unwrap();
    (0..n as i64).map(|i| start.add_days(i)).collect()
}

/// OHLC series built from per-bar (gap, body, upper wick, lower wick) moves.
fn series_from_moves(moves: &[(f64, f64, f64, f64)]) -> PriceSeries {
    let n = moves.len();
    let mut opens = Vec::with_capacity(n);
    let mut highs = Vec::with_capacity(n);
    let mut lows = Vec::with_capacity(n);
    let mut closes = Vec::with_capacity(n);
    let mut prev = 100.0_f64;
    for &(gap, body, up, down) in moves {
        let open = prev * (1.0 + gap);
        let close = open * (1.0 + body);
        highs.push(open.max(close) * (1.0 + up));
        lows.push(open.min(close) * (1.0 - down));
        opens.push(open);
        closes.push(close);
        prev = close;
    }
    PriceSeries::new(PriceData::new(dates(n), closes).with_ohlc(opens, highs, lows)).unwrap()
}

fn moves_strategy(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<(f64, f64, f64, f64)>> {
    prop::collection::vec(
        (-0.02f64..0.02, -0.04f64..0.04, 0.0005f64..0.02, 0.0005f64..0.02),
        len,
    )
}

// ============================================================================
// Fixed examples
// ============================================================================

#[test]
fn test_constant_daily_return_has_zero_close_to_close_volatility() {
    let closes: Vec<f64> = (0..61).map(|i| 80.0 * 1.0015_f64.powi(i)).collect();
    let series = PriceSeries::from_closes(dates(61), closes).unwrap();
    let engine = VolatilityEngine::default();
    for window in [20, 60] {
        let r = engine
            .estimate(Method::CloseToClose, &series, Some(window), true)
            .unwrap();
        assert!(r.volatility().abs() < 1e-9);
    }
}

#[test]
fn test_zigzag_path_more_volatile_than_uniform() {
    let n = 40;
    let mut zigzag = Vec::with_capacity(n);
    let mut p = 100.0;
    for i in 0..n {
        zigzag.push(p);
        p *= if i % 2 == 0 { 1.01 } else { 0.995 };
    }
    let uniform: Vec<f64> = (0..n).map(|i| 100.0 * 1.001_f64.powi(i as i32)).collect();

    let engine = VolatilityEngine::default();
    let z = engine
        .estimate(
            Method::CloseToClose,
            &PriceSeries::from_closes(dates(n), zigzag).unwrap(),
            None,
            true,
        )
        .unwrap();
    let u = engine
        .estimate(
            Method::CloseToClose,
            &PriceSeries::from_closes(dates(n), uniform).unwrap(),
            None,
            true,
        )
        .unwrap();
    assert!(z.volatility() > u.volatility());
}

#[test]
fn test_blend_example_weights() {
    let blended = BlendWeights::default().combine(0.20, 0.15, 0.35);
    assert_relative_eq!(blended, 0.265, epsilon = 1e-12);
}

#[test]
fn test_weight_validation_messages() {
    let err = BlendWeights::new(0.5, 0.3, 0.3).unwrap_err();
    assert!(err.to_string().contains("must sum to 1.0"));
    let err = BlendWeights::new(-0.1, 0.6, 0.5).unwrap_err();
    assert!(err.to_string().contains("non-negative"));
}

#[test]
fn test_atm_extraction_examples() {
    let as_of = Date::from_ymd(2024, 6, 14).unwrap();
    let empty = OptionsChainSnapshot::new("XYZ", as_of, vec![]);
    assert_eq!(
        extract_atm_implied_volatility(&empty, 100.0, None, OptionType::Call),
        None
    );

    let expiry = as_of.add_days(7);
    let chain = OptionsChainSnapshot::new(
        "XYZ",
        as_of,
        vec![
            OptionContract::new(95.0, expiry, OptionType::Call, Some(0.31)),
            OptionContract::new(100.0, expiry, OptionType::Call, Some(0.24)),
            OptionContract::new(105.0, expiry, OptionType::Call, Some(0.27)),
        ],
    );
    assert_eq!(
        extract_atm_implied_volatility(&chain, 100.0, None, OptionType::Call),
        Some(0.24)
    );
}

#[test]
fn test_series_construction_failures() {
    let d = dates(5);
    assert!(matches!(
        PriceSeries::new(PriceData::new(d.clone(), vec![100.0; 4])),
        Err(SeriesError::LengthMismatch { .. })
    ));
    assert!(matches!(
        PriceSeries::new(PriceData::new(d.clone(), vec![100.0, 101.0, 0.0, 99.0, 98.0])),
        Err(SeriesError::NonPositivePrice { index: 2, .. })
    ));
    let bad = PriceData::new(d, vec![100.0; 5]).with_ohlc(
        vec![100.0; 5],
        vec![101.0, 101.0, 101.0, 98.0, 101.0],
        vec![99.0; 5],
    );
    let err = PriceSeries::new(bad).unwrap_err();
    assert!(err.to_string().contains("index 3"));
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_end_to_end_blend_with_chain() {
    let moves: Vec<_> = (0..90)
        .map(|i| {
            let x = i as f64;
            (
                0.004 * (x * 1.1).sin(),
                0.012 * (x * 0.6).cos(),
                0.005,
                0.006,
            )
        })
        .collect();
    let series = series_from_moves(&moves);
    let as_of = *series.dates().last().unwrap();
    let spot = *series.closes().last().unwrap();

    let contracts = (-3..=3)
        .flat_map(|k| {
            let strike = (spot + 5.0 * k as f64).round();
            [7, 14, 35].into_iter().map(move |days| {
                OptionContract::new(
                    strike,
                    as_of.add_days(days),
                    OptionType::Call,
                    Some(0.20 + 0.01 * (k as f64).abs() + 0.001 * days as f64),
                )
            })
        })
        .collect();
    let chain = OptionsChainSnapshot::new("XYZ", as_of, contracts);

    let engine = VolatilityEngine::default();
    let report = engine.quality_report(&series);
    assert!(report.is_valid);

    let ts = calculate_iv_term_structure(&chain, spot, 4);
    assert_eq!(ts.len(), 3);
    assert_eq!(ts[0].days_to_expiry, 7);

    let result = engine.blend_or_fallback(&series, Some(&chain), spot).unwrap();
    assert_eq!(result.method(), Method::Blended);
    assert_relative_eq!(
        result.metadata_f64("implied_vol").unwrap(),
        ts[0].implied_volatility,
        epsilon = 1e-15
    );
}

#[test]
fn test_insufficient_data_reports_need() {
    let series = series_from_moves(&[(0.0, 0.01, 0.01, 0.01); 15]);
    let err = VolatilityEngine::default()
        .estimate(Method::YangZhang, &series, Some(20), true)
        .unwrap_err();
    assert_eq!(err, VolatilityError::InsufficientData { got: 15, need: 21 });
    assert_eq!(
        err.to_string(),
        "Insufficient data: got 15 observations, need 21"
    );
}

// ============================================================================
// Property-based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_annualization_ratio(moves in moves_strategy(30..80), factor in 50.0f64..400.0) {
        let series = series_from_moves(&moves);
        let config = EstimatorConfig::default().with_annualization_factor(factor).unwrap();
        let engine = VolatilityEngine::new(config, BlendWeights::default());
        for method in Method::REALIZED {
            let daily = engine.estimate(method, &series, None, false).unwrap().volatility();
            let annual = engine.estimate(method, &series, None, true).unwrap().volatility();
            if daily > 1e-12 {
                let ratio = annual / daily;
                prop_assert!((ratio / factor.sqrt() - 1.0).abs() < 0.05);
            }
        }
    }

    #[test]
    fn prop_estimates_finite_and_non_negative(moves in moves_strategy(25..70)) {
        let series = series_from_moves(&moves);
        for result in VolatilityEngine::default().estimate_all(&series, None, true).unwrap() {
            prop_assert!(result.volatility().is_finite());
            prop_assert!(result.volatility() >= 0.0);
        }
    }

    #[test]
    fn prop_efficiency_ratios_fixed(moves in moves_strategy(25..50)) {
        let series = series_from_moves(&moves);
        let engine = VolatilityEngine::default();
        for (method, ratio) in [
            (Method::Parkinson, 5.2),
            (Method::GarmanKlass, 7.4),
            (Method::YangZhang, 8.0),
        ] {
            let r = engine.estimate(method, &series, None, true).unwrap();
            prop_assert_eq!(r.metadata_f64("efficiency_ratio"), Some(ratio));
        }
    }

    #[test]
    fn prop_blend_is_convex_combination(moves in moves_strategy(61..90), iv in 0.05f64..1.0) {
        let series = series_from_moves(&moves);
        let r = VolatilityEngine::default().blend(&series, iv).unwrap();
        let rv_short = r.metadata_f64("rv_short").unwrap();
        let rv_long = r.metadata_f64("rv_long").unwrap();
        let lo = rv_short.min(rv_long).min(iv);
        let hi = rv_short.max(rv_long).max(iv);
        prop_assert!(r.volatility() >= lo - 1e-12 && r.volatility() <= hi + 1e-12);
    }
}
