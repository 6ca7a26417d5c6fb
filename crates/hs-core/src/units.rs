// hs-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Energy as UomEnergy, Length as UomLength, Power as UomPower,
    Time as UomTime, Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Energy = UomEnergy;
pub type Length = UomLength;
pub type Power = UomPower;
pub type Time = UomTime;
pub type Volume = UomVolume;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn joules(v: f64) -> Energy {
    use uom::si::energy::joule;
    Energy::new::<joule>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

pub mod constants {
    /// Density of liquid water used for meltwater volume (kg/m³).
    pub const WATER_DENSITY_KG_M3: f64 = 1000.0;
    /// Specific heat of ice (J/(kg·K)).
    pub const ICE_SPECIFIC_HEAT_J_KGK: f64 = 2108.0;
    /// Latent heat of fusion of ice (J/kg).
    pub const ICE_LATENT_HEAT_J_KG: f64 = 334_000.0;
    /// Melting point of ice (°C).
    pub const ICE_MELTING_POINT_C: f64 = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _l = m(2.0);
        let _a = m2(0.5);
        let _v = m3(0.001);
        let _p = watts(1100.0);
        let _e = joules(4186.0);
        let _dt = s(0.1);
    }

    #[test]
    fn millimeters_convert_to_si() {
        assert!((mm(2.5).value - 0.0025).abs() < 1e-15);
    }
}
