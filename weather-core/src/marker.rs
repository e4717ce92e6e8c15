//! Temperature to map-marker color classification.

use serde::{Serialize, Serializer};

/// Discrete color band for a map marker, warmest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorBucket {
    Scorching,
    VeryHot,
    Hot,
    Warm,
    Mild,
    Pleasant,
    Cool,
    Chilly,
    Cold,
    VeryCold,
    Freezing,
    Frigid,
}

/// Lower bounds (inclusive, °C), evaluated top to bottom; first match wins.
const THRESHOLDS: &[(f64, ColorBucket)] = &[
    (35.0, ColorBucket::Scorching),
    (30.0, ColorBucket::VeryHot),
    (25.0, ColorBucket::Hot),
    (20.0, ColorBucket::Warm),
    (15.0, ColorBucket::Mild),
    (10.0, ColorBucket::Pleasant),
    (5.0, ColorBucket::Cool),
    (0.0, ColorBucket::Chilly),
    (-5.0, ColorBucket::Cold),
    (-10.0, ColorBucket::VeryCold),
    (-15.0, ColorBucket::Freezing),
];

impl ColorBucket {
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Scorching => "#840319",
            Self::VeryHot => "#e51b1b",
            Self::Hot => "#e5791b",
            Self::Warm => "#e5b91b",
            Self::Mild => "#eae71c",
            Self::Pleasant => "#94ff42",
            Self::Cool => "#34f474",
            Self::Chilly => "#34f4d4",
            Self::Cold => "#7ccdff",
            Self::VeryCold => "#7972ff",
            Self::Freezing => "#3c15c6",
            Self::Frigid => "#64259b",
        }
    }

    /// Every bucket, warmest first; the last one is the below-lowest-threshold band.
    pub const fn all() -> &'static [ColorBucket] {
        &[
            Self::Scorching,
            Self::VeryHot,
            Self::Hot,
            Self::Warm,
            Self::Mild,
            Self::Pleasant,
            Self::Cool,
            Self::Chilly,
            Self::Cold,
            Self::VeryCold,
            Self::Freezing,
            Self::Frigid,
        ]
    }
}

impl std::fmt::Display for ColorBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hex())
    }
}

impl Serialize for ColorBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

/// Map a Celsius temperature to its marker color. Total: NaN lands in the coldest band.
pub fn classify_temperature(temp_celsius: f64) -> ColorBucket {
    THRESHOLDS
        .iter()
        .find(|(lower, _)| temp_celsius >= *lower)
        .map(|(_, bucket)| *bucket)
        .unwrap_or(ColorBucket::Frigid)
}
