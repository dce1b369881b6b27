use flotline::core::axis::{Axis, AxisDirection};
use flotline::options::AxisOptions;
use proptest::prelude::*;

proptest! {
    #[test]
    fn resolved_range_is_always_ordered(
        lo in -1.0e9f64..1.0e9,
        span in 0.0f64..1.0e9,
        margin in proptest::option::of(0.0f64..0.5),
    ) {
        let mut axis = Axis::new(1, AxisDirection::X, AxisOptions {
            autoscale_margin: margin,
            ..AxisOptions::default()
        });
        axis.datamin = Some(lo);
        axis.datamax = Some(lo + span);
        axis.set_range();
        prop_assert!(axis.min < axis.max);
    }

    #[test]
    fn transform_round_trip_stays_within_tolerance(
        min in -1.0e6f64..1.0e6,
        span in 1.0e-3f64..1.0e6,
        frac in 0.0f64..1.0,
    ) {
        let mut axis = Axis::new(1, AxisDirection::Y, AxisOptions::default());
        axis.min = min;
        axis.max = min + span;
        axis.update_transform(800.0, 600.0);

        let value = min + frac * span;
        let recovered = axis.c2p(axis.p2c(value));
        prop_assert!((recovered - value).abs() <= 1.0e-6 * span.max(value.abs()));
    }

    #[test]
    fn generated_ticks_cover_the_range_and_terminate(
        min in -1.0e6f64..1.0e6,
        span in 1.0e-3f64..1.0e6,
        dim in 100.0f64..2000.0,
    ) {
        let mut axis = Axis::new(1, AxisDirection::X, AxisOptions::default());
        axis.min = min;
        axis.max = min + span;
        axis.setup_tick_generation(dim).unwrap();
        axis.set_ticks();

        prop_assert!(!axis.ticks.is_empty());
        prop_assert!(axis.ticks[0].value <= axis.min);
        prop_assert!(axis.ticks[axis.ticks.len() - 1].value >= axis.max);
    }
}
