use durafmt::{format_time, format_time_str, Mode, TimeUnit};
use proptest::prelude::*;

fn arb_unit() -> impl Strategy<Value = TimeUnit> {
    prop::sample::select(TimeUnit::ALL.to_vec())
}

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![
        Just(Mode::Default),
        Just(Mode::Precise),
        (1usize..=9).prop_map(|n| Mode::count(n).unwrap()),
    ]
}

fn unit_index(unit: TimeUnit) -> usize {
    TimeUnit::ALL.iter().position(|u| *u == unit).unwrap()
}

proptest! {
    /// Outside precise mode, any non-positive duration shows "< 1" of the input unit.
    #[test]
    fn non_positive_is_less_than_one_input_unit(
        duration in -1e12f64..=0.0,
        input in arb_unit(),
        output in prop::option::of(arb_unit()),
        count in 1usize..=9,
    ) {
        for mode in [Mode::Default, Mode::count(count).unwrap()] {
            let result = format_time(duration, mode, output, input);
            let value = result.value().unwrap();
            prop_assert_eq!(value.display_value(), "< 1");
            prop_assert_eq!(value.display_unit(), Some(input));
            prop_assert_eq!(result.to_string(), format!("< 1 {}", input));
        }
    }

    /// The emitted parts never exceed the duration, and the part that was
    /// dropped is smaller than the finest unit shown.
    #[test]
    fn default_breakdown_truncates(ms in 1u64..=1_000_000_000_000u64) {
        let duration = ms as f64;
        let result = format_time(duration, Mode::Default, None, TimeUnit::Millisecond);
        let value = result.value().unwrap();
        let parts = value.parts();
        prop_assert!(!parts.is_empty());

        let sum: f64 = parts
            .iter()
            .map(|(unit, amount)| amount.parse::<f64>().unwrap() * unit.millis())
            .sum();
        let smallest = parts.last().unwrap().0.millis();
        let tolerance = duration * 1e-9;
        prop_assert!(sum <= duration + tolerance, "{} > {}", sum, duration);
        prop_assert!(sum > duration - smallest - tolerance, "{} too small for {}", sum, duration);
    }

    /// A breakdown uses at most `n` parts, largest unit first, all positive integers.
    #[test]
    fn breakdown_respects_cap_and_order(
        ms in 1u64..=1_000_000_000_000u64,
        n in 1usize..=9,
    ) {
        let mode = Mode::count(n).unwrap();
        let result = format_time(ms as f64, mode, None, TimeUnit::Millisecond);
        let parts = result.value().unwrap().parts();
        prop_assert!(!parts.is_empty());
        prop_assert!(parts.len() <= n);
        for pair in parts.windows(2) {
            prop_assert!(unit_index(pair[0].0) < unit_index(pair[1].0));
        }
        for (_, amount) in parts {
            prop_assert!(amount.parse::<u64>().unwrap() >= 1);
        }
    }

    /// The slots span consecutive units starting at the first one emitted.
    #[test]
    fn breakdown_stays_within_cap_window(
        ms in 1u64..=1_000_000_000_000u64,
        n in 1usize..=9,
    ) {
        let mode = Mode::count(n).unwrap();
        let result = format_time(ms as f64, mode, None, TimeUnit::Millisecond);
        let parts = result.value().unwrap().parts();
        let first = unit_index(parts[0].0);
        let last = unit_index(parts.last().unwrap().0);
        prop_assert!(last - first < n);
    }

    /// Rounded output-unit mode always lands in the requested unit.
    #[test]
    fn output_unit_is_respected(
        duration in 1e-3f64..1e9,
        input in arb_unit(),
        output in arb_unit(),
    ) {
        let result = format_time(duration, Mode::Default, Some(output), input);
        let value = result.value().unwrap();
        prop_assert_eq!(value.display_unit(), Some(output));
        prop_assert_eq!(value.parts().len(), 1);
        let shown = value.display_value();
        prop_assert!(shown == "< 1" || shown.parse::<f64>().map(|v| v >= 1.0).unwrap_or(false));
    }

    /// Identical arguments give identical results.
    #[test]
    fn formatting_is_idempotent(
        duration in -1e9f64..1e9,
        mode in arb_mode(),
        output in prop::option::of(arb_unit()),
        input in arb_unit(),
    ) {
        let a = format_time(duration, mode, output, input);
        let b = format_time(duration, mode, output, input);
        prop_assert_eq!(a.to_string(), b.to_string());
        prop_assert_eq!(a, b);
    }

    /// Unknown input units never format, whatever the mode or duration.
    #[test]
    fn unknown_input_unit_is_no_data(
        duration in -1e9f64..1e9,
        unit in "[a-z]{3,8}",
        mode in prop::option::of(prop_oneof![
            Just("default".to_string()),
            Just("precise".to_string()),
            (1usize..=9).prop_map(|n| n.to_string()),
        ]),
    ) {
        prop_assume!(unit.parse::<TimeUnit>().is_err());
        let result = format_time_str(duration, mode.as_deref(), None, Some(unit.as_str()));
        prop_assert!(result.is_no_data());
        prop_assert_eq!(result.to_string(), "-");
    }

    /// Every unit parses back from its display symbol.
    #[test]
    fn unit_display_parses_back(unit in arb_unit()) {
        prop_assert_eq!(unit.to_string().parse::<TimeUnit>().unwrap(), unit);
    }

    /// The string boundary agrees with the typed entry point for valid requests.
    #[test]
    fn str_boundary_matches_typed(
        duration in -1e9f64..1e9,
        mode in arb_mode(),
        output in prop::option::of(arb_unit()),
        input in arb_unit(),
    ) {
        let mode_str = mode.to_string();
        let output_str = output.map(|u| u.to_string());
        let typed = format_time(duration, mode, output, input);
        let parsed = format_time_str(
            duration,
            Some(mode_str.as_str()),
            output_str.as_deref(),
            Some(input.to_string().as_str()),
        );
        prop_assert_eq!(typed, parsed);
    }
}
