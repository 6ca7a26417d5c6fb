//! hs-core: shared foundation for heatsim.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + float checks + lerp)
//! - error (shared error type)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
