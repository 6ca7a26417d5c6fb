//! Property tests for the heat-loss network and per-step exchange.

use hs_core::{m, mm};
use hs_thermal::{Container, Fluid, Material, Shape, cooling_step, heating_step};
use proptest::prelude::*;

fn container(thickness_m: f64, conductivity: f64) -> Container {
    let material = Material::new("test-alloy", conductivity, 500.0, 7900.0).unwrap();
    Container::new(
        Shape::cylinder(m(0.09), m(0.15)).unwrap(),
        material,
        m(thickness_m),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn coefficient_always_within_bounds(
        thickness in 1e-6_f64..1.0,
        conductivity in 0.01_f64..5000.0,
        correction in 0.0_f64..10.0,
    ) {
        let u = container(thickness, conductivity).heat_loss_coefficient(correction);
        prop_assert!(u.is_finite());
        prop_assert!((0.001..=100.0).contains(&u));
    }

    #[test]
    fn heat_loss_never_negative(
        current in -50.0_f64..150.0,
        ambient in -30.0_f64..60.0,
        u in 0.001_f64..100.0,
    ) {
        let water = Fluid::water();
        let step = cooling_step(u, current, ambient, 1.0, 1.0, water.specific_heat);
        prop_assert!(step.heat_loss_j >= 0.0);
        prop_assert!(step.delta_c >= 0.0);
    }

    #[test]
    fn heating_is_linear_in_time_step(power in 0.0_f64..5000.0, dt in 0.01_f64..10.0) {
        let one = heating_step(power, dt, 1.0, 4186.0).delta_c;
        let two = heating_step(power, 2.0 * dt, 1.0, 4186.0).delta_c;
        prop_assert!((two - 2.0 * one).abs() < 1e-9);
    }
}

#[test]
fn conductive_materials_clamp_to_same_coefficient() {
    let copper = Container::new(
        Shape::cylinder(m(0.09), m(0.15)).unwrap(),
        Material::copper(),
        mm(2.5),
    )
    .unwrap();
    let super_conductor = container(0.0025, 10_000.0);
    // both conductivities land on the 500 W/(m·K) ceiling
    let a = super_conductor.heat_loss_coefficient(1.0);
    let b = container(0.0025, 500.0).heat_loss_coefficient(1.0);
    assert!((a - b).abs() < 1e-12);
    assert!(copper.heat_loss_coefficient(1.0) <= a + 1e-12);
}
