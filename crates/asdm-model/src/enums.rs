//! Closed enumerations used by table attributes.
//!
//! Each enumeration carries an immutable literal table: the text form used in
//! XML documents and, by position, the ordinal used by the binary codec.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ModelError, Result};

/// Common surface of every ASDM enumeration.
pub trait AsdmEnum: Copy + Eq + fmt::Debug + 'static {
    /// Enumeration name, used in error messages.
    const ENUM_NAME: &'static str;
    /// Every literal, in ordinal order.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn ordinal(&self) -> i32 {
        Self::ALL
            .iter()
            .position(|v| v == self)
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(-1)
    }

    fn from_ordinal(ordinal: i32) -> Result<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
            .ok_or(ModelError::InvalidEnumOrdinal {
                enum_name: Self::ENUM_NAME,
                ordinal,
            })
    }

    fn from_literal(literal: &str) -> Result<Self> {
        let literal = literal.trim();
        Self::ALL
            .iter()
            .find(|v| v.as_str() == literal)
            .copied()
            .ok_or_else(|| ModelError::InvalidEnumLiteral {
                enum_name: Self::ENUM_NAME,
                value: literal.to_string(),
            })
    }
}

macro_rules! asdm_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $literal:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl AsdmEnum for $name {
            const ENUM_NAME: &'static str = stringify!($name);
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $literal),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                <Self as AsdmEnum>::ALL[0]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_literal(s)
            }
        }
    };
}

asdm_enum!(
    /// Kind of site occupied by a station.
    StationType {
        AntennaPad => "ANTENNA_PAD",
        MaintenancePad => "MAINTENANCE_PAD",
        WeatherStation => "WEATHER_STATION",
    }
);

asdm_enum!(
    AntennaMake {
        Aem12 => "AEM_12",
        Mitsubishi7 => "MITSUBISHI_7",
        Mitsubishi12A => "MITSUBISHI_12_A",
        Mitsubishi12B => "MITSUBISHI_12_B",
        Vertex12Atf => "VERTEX_12_ATF",
        Aem12Atf => "AEM_12_ATF",
        Vertex12 => "VERTEX_12",
        Iram15 => "IRAM_15",
        Undefined => "UNDEFINED",
    }
);

asdm_enum!(
    AntennaType {
        GroundBased => "GROUND_BASED",
        SpaceBased => "SPACE_BASED",
        TrackingStation => "TRACKING_STN",
    }
);

asdm_enum!(
    BasebandName {
        NoBaseband => "NOBB",
        Bb1 => "BB_1",
        Bb2 => "BB_2",
        Bb3 => "BB_3",
        Bb4 => "BB_4",
        Bb5 => "BB_5",
        Bb6 => "BB_6",
        Bb7 => "BB_7",
        Bb8 => "BB_8",
        BbAll => "BB_ALL",
    }
);

asdm_enum!(
    NetSideband {
        NoSideband => "NOSB",
        Lower => "LSB",
        Upper => "USB",
        Double => "DSB",
    }
);

asdm_enum!(
    SidebandProcessingMode {
        None => "NONE",
        PhaseSwitchSeparation => "PHASE_SWITCH_SEPARATION",
        FrequencyOffsetSeparation => "FREQUENCY_OFFSET_SEPARATION",
        PhaseSwitchRejection => "PHASE_SWITCH_REJECTION",
        FrequencyOffsetRejection => "FREQUENCY_OFFSET_REJECTION",
    }
);

asdm_enum!(
    /// Spectral window function applied by the correlator.
    WindowFunction {
        Uniform => "UNIFORM",
        Hanning => "HANNING",
        Hamming => "HAMMING",
        Bartlett => "BARTLETT",
        Blackmann => "BLACKMANN",
        BlackmannHarris => "BLACKMANN_HARRIS",
        Welch => "WELCH",
    }
);

asdm_enum!(
    /// Correlation products and Stokes parameters.
    StokesParameter {
        I => "I",
        Q => "Q",
        U => "U",
        V => "V",
        RR => "RR",
        RL => "RL",
        LR => "LR",
        LL => "LL",
        XX => "XX",
        XY => "XY",
        YX => "YX",
        YY => "YY",
        RX => "RX",
        RY => "RY",
        LX => "LX",
        LY => "LY",
        XR => "XR",
        XL => "XL",
        YR => "YR",
        YL => "YL",
        PP => "PP",
        PQ => "PQ",
        QP => "QP",
        QQ => "QQ",
        RCircular => "RCIRCULAR",
        LCircular => "LCIRCULAR",
        Linear => "LINEAR",
        PTotal => "PTOTAL",
        PLinear => "PLINEAR",
        PfTotal => "PFTOTAL",
        PfLinear => "PFLINEAR",
        PAngle => "PANGLE",
    }
);

asdm_enum!(
    PolarizationType {
        R => "R",
        L => "L",
        X => "X",
        Y => "Y",
        Both => "BOTH",
    }
);

asdm_enum!(
    ProcessorType {
        Correlator => "CORRELATOR",
        Radiometer => "RADIOMETER",
        Spectrometer => "SPECTROMETER",
    }
);

asdm_enum!(
    ProcessorSubType {
        AlmaCorrelatorMode => "ALMA_CORRELATOR_MODE",
        SquareLawDetector => "SQUARE_LAW_DETECTOR",
        Holography => "HOLOGRAPHY",
        AlmaRadiometer => "ALMA_RADIOMETER",
    }
);

asdm_enum!(
    CorrelationMode {
        CrossOnly => "CROSS_ONLY",
        AutoOnly => "AUTO_ONLY",
        CrossAndAuto => "CROSS_AND_AUTO",
    }
);

asdm_enum!(
    AtmPhaseCorrection {
        Uncorrected => "AP_UNCORRECTED",
        Corrected => "AP_CORRECTED",
    }
);

asdm_enum!(
    SpectralResolutionType {
        ChannelAverage => "CHANNEL_AVERAGE",
        BasebandWide => "BASEBAND_WIDE",
        FullResolution => "FULL_RESOLUTION",
    }
);

asdm_enum!(
    SubscanIntent {
        OnSource => "ON_SOURCE",
        OffSource => "OFF_SOURCE",
        Mixed => "MIXED",
        Reference => "REFERENCE",
        Scanning => "SCANNING",
        Hot => "HOT",
        Ambient => "AMBIENT",
        Signal => "SIGNAL",
        Image => "IMAGE",
        Test => "TEST",
        Unspecified => "UNSPECIFIED",
    }
);

asdm_enum!(
    SwitchingMode {
        NoSwitching => "NO_SWITCHING",
        LoadSwitching => "LOAD_SWITCHING",
        PositionSwitching => "POSITION_SWITCHING",
        PhaseSwitching => "PHASE_SWITCHING",
        FrequencySwitching => "FREQUENCY_SWITCHING",
        NutatorSwitching => "NUTATOR_SWITCHING",
        ChopperWheel => "CHOPPER_WHEEL",
    }
);

asdm_enum!(
    CorrelatorCalibration {
        None => "NONE",
        ChannelZeroJitter => "CHANNEL_ZERO_JITTER",
        ChannelZeroJitterRaw => "CHANNEL_ZERO_JITTER_RAW",
        ChannelZeroRaw => "CHANNEL_ZERO_RAW",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_round_trip() {
        for v in StokesParameter::ALL {
            assert_eq!(v.as_str().parse::<StokesParameter>().unwrap(), *v);
        }
        assert_eq!("ANTENNA_PAD".parse::<StationType>().unwrap(), StationType::AntennaPad);
    }

    #[test]
    fn test_ordinals_follow_declaration_order() {
        assert_eq!(BasebandName::NoBaseband.ordinal(), 0);
        assert_eq!(BasebandName::Bb4.ordinal(), 4);
        assert_eq!(NetSideband::from_ordinal(2).unwrap(), NetSideband::Upper);
        assert!(NetSideband::from_ordinal(4).is_err());
        assert!(NetSideband::from_ordinal(-1).is_err());
    }

    #[test]
    fn test_unknown_literal() {
        let err = "CIRCULAR".parse::<PolarizationType>().unwrap_err();
        assert_eq!(err.to_string(), "invalid PolarizationType literal: CIRCULAR");
    }

    #[test]
    fn test_default_is_first_literal() {
        assert_eq!(SidebandProcessingMode::default(), SidebandProcessingMode::None);
        assert_eq!(SubscanIntent::default(), SubscanIntent::OnSource);
    }
}
