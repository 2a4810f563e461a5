//! Small value types shared across settings fields.

use serde::{Deserialize, Serialize};

/// 2-D image-space point, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ordered pair of doubles, typically a lower/upper bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DoubleCouple {
    pub first: f64,
    pub second: f64,
}

impl DoubleCouple {
    pub fn new(first: f64, second: f64) -> Self {
        Self { first, second }
    }
}

/// Ordered pair of integers, typically a lower/upper bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntCouple {
    pub first: i32,
    pub second: i32,
}

impl IntCouple {
    pub fn new(first: i32, second: i32) -> Self {
        Self { first, second }
    }
}

/// Integer-ordinal resolution for wire enums.
///
/// The UI selects enum values by ordinal index into the declared variant
/// order, so every wire enum carries its variant table and resolves ordinals
/// against it. Out-of-range ordinals yield `None` instead of panicking.
pub trait OrdinalEnum: Sized + Copy + 'static {
    /// All variants, in declared order.
    const VARIANTS: &'static [Self];

    fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::VARIANTS.get(ordinal).copied()
    }
}

/// Declare an enum together with its [`OrdinalEnum`] variant table.
macro_rules! ordinal_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::types::OrdinalEnum for $name {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];
        }
    };
}
pub(crate) use ordinal_enum;

#[cfg(test)]
mod tests {
    use super::*;

    ordinal_enum! {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        enum Sample {
            First,
            Second,
            Third,
        }
    }

    #[test]
    fn ordinal_resolves_in_declared_order() {
        assert_eq!(Sample::from_ordinal(0), Some(Sample::First));
        assert_eq!(Sample::from_ordinal(2), Some(Sample::Third));
    }

    #[test]
    fn ordinal_out_of_range_is_none() {
        assert_eq!(Sample::from_ordinal(3), None);
    }
}
