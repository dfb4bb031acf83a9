use serde::Deserialize;

use crate::error::{PersistenceError, Result, ValidationError};
use crate::model::{DEFAULT_CHRONICLE_CAPACITY, Era};

/// Tunables for a simulation run. Every field has a default, so a host can
/// deserialize a partial JSON document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// RNG seed; the same seed and commands replay the same history.
    pub seed: u64,
    pub start_year: u32,
    pub start_era: Era,
    /// Chance per tick that an eligible event fires.
    pub event_chance: f64,
    /// Chance per month that an eligible mother gives birth.
    pub birth_chance: f64,
    pub fertile_min_age: u32,
    pub fertile_max_age: u32,
    /// Age past which monthly death rolls begin.
    pub mortality_onset_age: u32,
    /// Monthly death chance added per year past the onset age.
    pub mortality_per_year: f64,
    pub candidate_min_age: u32,
    pub chronicle_capacity: usize,
}

impl EngineConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse a JSON document; absent fields take their defaults. The result
    /// must pass [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(PersistenceError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Chances must lie in [0, 1] and the mortality slope must be a finite,
    /// non-negative number.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for (name, p) in [
            ("event_chance", self.event_chance),
            ("birth_chance", self.birth_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ValidationError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        if !(self.mortality_per_year.is_finite() && self.mortality_per_year >= 0.0) {
            return Err(ValidationError::InvalidConfig(format!(
                "mortality_per_year must be a non-negative number, got {}",
                self.mortality_per_year
            )));
        }
        if self.fertile_min_age > self.fertile_max_age {
            return Err(ValidationError::InvalidConfig(format!(
                "fertile ages {}..={} are empty",
                self.fertile_min_age, self.fertile_max_age
            )));
        }
        Ok(())
    }

    /// Monthly death probability for a character of `age`, in [0, 1].
    pub fn death_chance(&self, age: u32) -> f64 {
        if age <= self.mortality_onset_age {
            return 0.0;
        }
        let years_past = f64::from(age - self.mortality_onset_age);
        let chance = years_past * self.mortality_per_year;
        if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) }
    }

    pub fn is_fertile_age(&self, age: u32) -> bool {
        (self.fertile_min_age..=self.fertile_max_age).contains(&age)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_year: 753,
            start_era: Era::BC,
            event_chance: 0.30,
            birth_chance: 0.02,
            fertile_min_age: 16,
            fertile_max_age: 45,
            mortality_onset_age: 50,
            mortality_per_year: 0.005,
            candidate_min_age: 30,
            chronicle_capacity: DEFAULT_CHRONICLE_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_death_risk_at_or_below_onset() {
        let config = EngineConfig::default();
        assert_eq!(config.death_chance(30), 0.0);
        assert_eq!(config.death_chance(50), 0.0);
    }

    #[test]
    fn death_risk_grows_half_percent_per_year() {
        let config = EngineConfig::default();
        assert!((config.death_chance(51) - 0.005).abs() < 1e-12);
        assert!((config.death_chance(70) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn death_risk_is_clamped_to_certainty() {
        let config = EngineConfig::default();
        assert_eq!(config.death_chance(300), 1.0);
        assert_eq!(config.death_chance(400), 1.0);
    }

    #[test]
    fn fertile_window_is_inclusive() {
        let config = EngineConfig::default();
        assert!(!config.is_fertile_age(15));
        assert!(config.is_fertile_age(16));
        assert!(config.is_fertile_age(45));
        assert!(!config.is_fertile_age(46));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"seed": 7, "start_era": "AD"}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.start_era, Era::AD);
        assert_eq!(config.event_chance, 0.30);
        assert_eq!(config.chronicle_capacity, 100);
    }

    #[test]
    fn unknown_era_is_rejected() {
        assert!(EngineConfig::from_json(r#"{"start_era": "CE"}"#).is_err());
    }

    #[test]
    fn chances_outside_unit_interval_are_rejected() {
        for json in [
            r#"{"birth_chance": 1.5}"#,
            r#"{"event_chance": -0.1}"#,
            r#"{"mortality_per_year": -1.0}"#,
            r#"{"fertile_min_age": 50, "fertile_max_age": 20}"#,
        ] {
            let err = EngineConfig::from_json(json).unwrap_err();
            assert!(err.is_validation(), "{json}: {err}");
        }
        assert!(EngineConfig::from_json(r#"{"birth_chance": 1.0, "event_chance": 0.0}"#).is_ok());
    }

    #[test]
    fn nan_slope_never_kills() {
        let config = EngineConfig {
            mortality_per_year: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.death_chance(90), 0.0);
    }
}
