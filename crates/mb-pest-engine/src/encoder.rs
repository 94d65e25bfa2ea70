//! Feature encoder: six farm inputs to a fixed-order numeric vector.
//!
//! Order: `[soil_ph, temperature, humidity, rainfall, season_code, tree_age]`.
//! Encoding never fails; every problem falls back to the static season
//! mapping without scaling.

use mb_protocol::{FarmConditions, Season};

use crate::artifacts::{LabelEncoder, StandardScaler};

pub const FEATURE_COUNT: usize = 6;

/// Season code used when a label cannot be encoded.
pub const FALLBACK_SEASON_CODE: f64 = 0.0;

/// Encoded model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub values: [f64; FEATURE_COUNT],
    /// Whether the fitted scaler was applied.
    pub scaled: bool,
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Encodes farm conditions using the trained encoder and scaler when present.
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder {
    season_encoder: Option<LabelEncoder>,
    scaler: Option<StandardScaler>,
}

impl FeatureEncoder {
    pub fn new(season_encoder: Option<LabelEncoder>, scaler: Option<StandardScaler>) -> Self {
        Self {
            season_encoder,
            scaler,
        }
    }

    /// Encoder with the static season mapping and no scaling.
    pub fn static_only() -> Self {
        Self::default()
    }

    /// Static mapping {spring:0, summer:1, autumn:2, winter:3}, default 0.
    pub fn static_season_code(season: &str) -> f64 {
        season
            .parse::<Season>()
            .map_or(FALLBACK_SEASON_CODE, |s| s.static_code())
    }

    /// Categorical code for the season, via the trained encoder when loaded.
    pub fn season_code(&self, season: &str) -> f64 {
        let Some(encoder) = &self.season_encoder else {
            return Self::static_season_code(season);
        };
        let label = season.trim().to_lowercase();
        match encoder.transform(&label) {
            Ok(code) => code as f64,
            Err(e) => {
                tracing::warn!(season = %season, error = %e, "season not known to encoder, using fallback code");
                FALLBACK_SEASON_CODE
            }
        }
    }

    pub fn encode(&self, farm: &FarmConditions) -> FeatureVector {
        let raw = [
            farm.soil_ph,
            farm.temperature,
            farm.humidity,
            farm.rainfall,
            self.season_code(&farm.season),
            f64::from(farm.tree_age),
        ];

        let Some(scaler) = &self.scaler else {
            return FeatureVector {
                values: raw,
                scaled: false,
            };
        };

        match scaler.transform(&raw) {
            Ok(scaled) => {
                let mut values = [0.0; FEATURE_COUNT];
                values.copy_from_slice(&scaled);
                FeatureVector {
                    values,
                    scaled: true,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "feature scaling failed, using static encoding");
                FeatureVector {
                    values: [
                        farm.soil_ph,
                        farm.temperature,
                        farm.humidity,
                        farm.rainfall,
                        Self::static_season_code(&farm.season),
                        f64::from(farm.tree_age),
                    ],
                    scaled: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm(season: &str) -> FarmConditions {
        FarmConditions::new(6.2, 22.0, 65.0, 120.0, season, 5)
    }

    /// Alphabetical, as a fitted label encoder orders them.
    fn fitted_seasons() -> LabelEncoder {
        LabelEncoder::new(["autumn", "spring", "summer", "winter"])
    }

    #[test]
    fn static_mapping() {
        let enc = FeatureEncoder::static_only();
        assert_eq!(enc.season_code("spring"), 0.0);
        assert_eq!(enc.season_code("SUMMER"), 1.0);
        assert_eq!(enc.season_code("autumn"), 2.0);
        assert_eq!(enc.season_code("Winter"), 3.0);
        assert_eq!(enc.season_code("monsoon"), FALLBACK_SEASON_CODE);
    }

    #[test]
    fn unscaled_vector_order() {
        let v = FeatureEncoder::static_only().encode(&farm("winter"));
        assert_eq!(v.values, [6.2, 22.0, 65.0, 120.0, 3.0, 5.0]);
        assert!(!v.scaled);
    }

    #[test]
    fn trained_encoder_takes_precedence() {
        let enc = FeatureEncoder::new(Some(fitted_seasons()), None);
        assert_eq!(enc.season_code("spring"), 1.0);
        assert_eq!(enc.season_code("Summer"), 2.0);
        assert_eq!(enc.season_code("autumn"), 0.0);
    }

    #[test]
    fn trained_encoder_normalises_label() {
        let enc = FeatureEncoder::new(Some(fitted_seasons()), None);
        assert_eq!(enc.season_code("  WINTER "), 3.0);
        assert_eq!(enc.encode(&farm("Spring\n")).values[4], 1.0);
    }

    #[test]
    fn unseen_label_gets_fallback_code() {
        let enc = FeatureEncoder::new(Some(fitted_seasons()), None);
        assert_eq!(enc.season_code("fall"), FALLBACK_SEASON_CODE);
        let v = enc.encode(&farm("dry season"));
        assert_eq!(v.values[4], FALLBACK_SEASON_CODE);
    }

    #[test]
    fn scaler_applied() {
        let scaler = StandardScaler {
            mean: vec![6.0, 20.0, 60.0, 100.0, 0.0, 5.0],
            scale: vec![0.2, 2.0, 5.0, 20.0, 1.0, 1.0],
        };
        let v = FeatureEncoder::new(None, Some(scaler)).encode(&farm("summer"));
        assert!(v.scaled);
        let expected = [1.0, 1.0, 1.0, 1.0, 1.0, 0.0];
        for (got, want) in v.values.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    #[test]
    fn mismatched_scaler_falls_back_to_static_path() {
        let scaler = StandardScaler {
            mean: vec![0.0; 4],
            scale: vec![1.0; 4],
        };
        let enc = FeatureEncoder::new(Some(fitted_seasons()), Some(scaler));
        let v = enc.encode(&farm("summer"));
        assert!(!v.scaled);
        // Static mapping, not the fitted encoder's code (2)
        assert_eq!(v.values, [6.2, 22.0, 65.0, 120.0, 1.0, 5.0]);
    }
}
