//! Common clamps and guards for thermal calculations.

/// Minimum series resistance (K/W) before inversion.
pub const MIN_RESISTANCE_K_PER_W: f64 = 1e-6;

/// Minimum heat capacity (J/K) used as a divisor.
pub const MIN_HEAT_CAPACITY_J_PER_K: f64 = 1e-9;

/// Clamp a value between min and max, mapping NaN to min.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() || value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Temperature change produced by `energy_j` in a body of the given heat capacity.
pub fn temperature_change(energy_j: f64, mass_kg: f64, specific_heat: f64) -> f64 {
    let capacity = (mass_kg * specific_heat).max(MIN_HEAT_CAPACITY_J_PER_K);
    energy_j / capacity
}
