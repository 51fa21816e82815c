//! Physical quantities stored as SI doubles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        pub struct $name(f64);

        impl $name {
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> f64 {
                self.0
            }
        }

        impl From<f64> for $name {
            fn from(value: f64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<f64>()
                    .map(Self)
                    .map_err(|_| ModelError::InvalidQuantity {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

quantity!(
    /// Length in metres.
    Length,
    "length"
);
quantity!(
    /// Frequency in hertz.
    Frequency,
    "frequency"
);
quantity!(
    /// Angle in radians.
    Angle,
    "angle"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_form_is_shortest_round_trip() {
        let f = Frequency::new(230.538e9);
        assert_eq!(f.to_string().parse::<Frequency>().unwrap(), f);
        assert_eq!(Length::new(12.0).to_string(), "12");
        assert_eq!(" 0.25 ".parse::<Angle>().unwrap(), Angle::new(0.25));
    }

    #[test]
    fn test_rejects_non_numeric() {
        let err = "twelve".parse::<Length>().unwrap_err();
        assert_eq!(err.to_string(), "invalid length value: twelve");
    }
}
