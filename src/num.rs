//! Numbers and numerics.

use bytemuck::Pod;
use num_traits as nt;
use std::fmt;

/// Gathers traits useful for working with generic floating point types.
///
/// Every kernel in this crate is written once against this trait and
/// instantiated for [`f32`] and [`f64`].
pub trait Float:
    nt::Float
    + nt::FromPrimitive
    + approx::AbsDiffEq<Epsilon = Self>
    + approx::RelativeEq
    + Pod
    + fmt::Debug
    + fmt::Display
    + fmt::LowerExp
{
    const ZERO: Self;
    const ONE: Self;
    const NEG_ONE: Self;
    const ONE_HALF: Self;

    /// Determinants with a magnitude at or below this value make a matrix
    /// count as singular during inversion.
    const SINGULARITY_THRESHOLD: Self;
}

macro_rules! impl_float {
    ($f:ty, $singularity_threshold:expr) => {
        impl Float for $f {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const NEG_ONE: Self = -1.0;
            const ONE_HALF: Self = 0.5;
            const SINGULARITY_THRESHOLD: Self = $singularity_threshold;
        }
    };
}

impl_float!(f32, 1e-6);
impl_float!(f64, 1e-12);
