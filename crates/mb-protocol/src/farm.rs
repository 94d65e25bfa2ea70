use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Farm conditions supplied with a pest-risk request.
///
/// Values are taken as given; none of the ranges below are enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmConditions {
    /// Soil pH, typically 4.5–8.0.
    pub soil_ph: f64,
    /// Air temperature in celsius.
    pub temperature: f64,
    /// Relative humidity percentage (0–100 expected).
    pub humidity: f64,
    /// Recent rainfall in millimetres.
    pub rainfall: f64,
    /// Season name as entered (matched case-insensitively).
    pub season: String,
    /// Tree age in years.
    pub tree_age: u32,
}

impl FarmConditions {
    pub fn new(
        soil_ph: f64,
        temperature: f64,
        humidity: f64,
        rainfall: f64,
        season: impl Into<String>,
        tree_age: u32,
    ) -> Self {
        Self {
            soil_ph,
            temperature,
            humidity,
            rainfall,
            season: season.into(),
            tree_age,
        }
    }

    /// Recognised season, or `None` for anything outside the four names.
    pub fn season_kind(&self) -> Option<Season> {
        self.season.parse().ok()
    }

    /// Names of numeric fields that are NaN or infinite.
    pub fn non_finite_fields(&self) -> Vec<&'static str> {
        [
            ("soil_ph", self.soil_ph),
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("rainfall", self.rainfall),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Southern-hemisphere growing season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }

    /// Fixed categorical code used when no trained encoder is loaded.
    pub fn static_code(&self) -> f64 {
        match self {
            Season::Spring => 0.0,
            Season::Summer => 1.0,
            Season::Autumn => 2.0,
            Season::Winter => 3.0,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the four season names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown season: {0}")]
pub struct UnknownSeason(pub String);

impl FromStr for Season {
    type Err = UnknownSeason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            _ => Err(UnknownSeason(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_parse_is_case_insensitive() {
        assert_eq!("SUMMER".parse::<Season>().unwrap(), Season::Summer);
        assert_eq!("Autumn".parse::<Season>().unwrap(), Season::Autumn);
        assert_eq!(" winter ".parse::<Season>().unwrap(), Season::Winter);
    }

    #[test]
    fn unknown_season_is_error() {
        let err = "monsoon".parse::<Season>().unwrap_err();
        assert_eq!(err.to_string(), "unknown season: monsoon");
        // "fall" is only normalised by the query parser, not here.
        assert!("fall".parse::<Season>().is_err());
    }

    #[test]
    fn static_codes_follow_calendar_order() {
        let codes: Vec<f64> = Season::ALL.iter().map(Season::static_code).collect();
        assert_eq!(codes, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn farm_conditions_roundtrip() {
        let farm = FarmConditions::new(6.2, 22.0, 65.0, 120.0, "Spring", 5);
        let json = serde_json::to_string(&farm).unwrap();
        let back: FarmConditions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, farm);
        assert_eq!(back.season_kind(), Some(Season::Spring));
    }

    #[test]
    fn non_finite_fields_reported() {
        let farm = FarmConditions::new(6.2, f64::NAN, 65.0, f64::INFINITY, "spring", 5);
        assert_eq!(farm.non_finite_fields(), vec!["temperature", "rainfall"]);

        let ok = FarmConditions::new(6.2, 1000.0, 65.0, 0.0, "spring", 5);
        assert!(ok.non_finite_fields().is_empty());
    }
}
