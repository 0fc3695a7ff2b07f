use outliercrab::frontier::{compute_frontier, is_outlier, TriggerMethod, TriggerOn, Verdict};
use proptest::prelude::*;

fn counts() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0u32..10_000, 1..60).prop_map(|v| v.into_iter().map(f64::from).collect())
}

fn direction() -> impl Strategy<Value = TriggerOn> {
    prop_oneof![Just(TriggerOn::High), Just(TriggerOn::Low)]
}

proptest! {
    #[test]
    fn percentile_ignores_duplicates(values in counts(), extra in prop::collection::vec(0usize..60, 0..20), q in 0.0f64..=100.0) {
        let base = compute_frontier(TriggerMethod::Percentile, &values, q, None).unwrap();

        let mut padded = values.clone();
        for idx in extra {
            padded.push(values[idx % values.len()]);
        }
        let with_duplicates = compute_frontier(TriggerMethod::Percentile, &padded, q, None).unwrap();

        prop_assert_eq!(base, with_duplicates);
    }

    #[test]
    fn percentile_is_order_independent(values in counts(), q in 0.0f64..=100.0) {
        let forward = compute_frontier(TriggerMethod::Percentile, &values, q, None).unwrap();
        let mut reversed = values.clone();
        reversed.reverse();
        let backward = compute_frontier(TriggerMethod::Percentile, &reversed, q, None).unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn madpos_is_never_negative(values in counts(), sensitivity in 0.0f64..20.0, on in direction()) {
        let frontier = compute_frontier(TriggerMethod::MadPos, &values, sensitivity, Some(on)).unwrap();
        prop_assert!(frontier >= 0.0, "madpos frontier {} is negative", frontier);
    }

    #[test]
    fn zero_mad_falls_back_to_unit_stdev(
        repeated in 0u32..1_000,
        majority in 3usize..20,
        others in prop::collection::vec(0u32..1_000, 0..2),
        sensitivity in 0.5f64..10.0,
        on in direction(),
    ) {
        // more than half of the values are equal, so the MAD is zero
        let mut values: Vec<f64> = std::iter::repeat_n(f64::from(repeated), majority).collect();
        values.extend(others.into_iter().map(f64::from));

        let stdev = compute_frontier(TriggerMethod::Stdev, &values, 1.0, Some(on)).unwrap();
        let mad = compute_frontier(TriggerMethod::Mad, &values, sensitivity, Some(on)).unwrap();
        let madpos = compute_frontier(TriggerMethod::MadPos, &values, sensitivity, Some(on)).unwrap();

        prop_assert_eq!(mad, stdev);
        prop_assert_eq!(madpos, stdev.max(0.0));
    }

    #[test]
    fn low_trigger_flags_only_counts_below(count in -1e6f64..1e6, frontier in -1e6f64..1e6) {
        let verdict = is_outlier(count, frontier, Some(TriggerOn::Low)).unwrap();
        if count < frontier {
            prop_assert_eq!(verdict, Verdict::Below { frontier });
        } else {
            prop_assert_eq!(verdict, Verdict::NotOutlier);
        }
    }

    #[test]
    fn high_trigger_flags_only_counts_above(count in -1e6f64..1e6, frontier in -1e6f64..1e6) {
        let verdict = is_outlier(count, frontier, Some(TriggerOn::High)).unwrap();
        prop_assert_eq!(verdict.is_outlier(), count > frontier);
    }

    #[test]
    fn stdev_frontiers_are_symmetric(values in counts(), sensitivity in 0.0f64..10.0) {
        let high = compute_frontier(TriggerMethod::Stdev, &values, sensitivity, Some(TriggerOn::High)).unwrap();
        let low = compute_frontier(TriggerMethod::Stdev, &values, sensitivity, Some(TriggerOn::Low)).unwrap();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        prop_assert!(((high + low) / 2.0 - mean).abs() < 1e-6 * mean.max(1.0));
    }
}
