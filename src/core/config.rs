//! Simulation configuration with documented constants
//!
//! Every tuning number of the map generator, the district model and the
//! election engine lives here. Defaults reproduce the reference game
//! balance; a TOML file can override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub map: MapConfig,
    pub district: DistrictConfig,
    pub election: ElectionConfig,
    pub campaign: CampaignConfig,
    pub world: WorldConfig,
}

/// Procedural map generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Number of grid cells per row, including the outer ocean ring
    pub width: u32,
    /// Number of grid cells per column, including the outer ocean ring
    pub height: u32,
    /// Side length of one cell in map units
    ///
    /// A cell of 0.8 has an area of 0.64, which yields a population of
    /// roughly 640,000 at mixed density.
    pub cell_size: f32,
    /// Maximum node displacement as a fraction of `cell_size`
    pub jitter: f32,
    /// Chance for an interior cell to become water
    pub water_frequency: f32,
    pub seed: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 18,
            height: 14,
            cell_size: 0.8,
            jitter: 0.3,
            water_frequency: 0.18,
            seed: 12345,
        }
    }
}

impl MapConfig {
    pub fn world_width(&self) -> f32 {
        self.width as f32 * self.cell_size
    }

    pub fn world_height(&self) -> f32 {
        self.height as f32 * self.cell_size
    }
}

/// District population, seat and turnout model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistrictConfig {
    pub min_seats: u32,
    /// Population needed for the first seat
    pub population_per_seat: u32,
    /// Each claimed seat raises the requirement for the next one by this much
    pub requirement_increase_per_seat: u32,
    /// Inhabitants per unit of region area before the density multiplier
    pub population_per_area: f32,
    /// Multiplier ranges `(min, max)` drawn uniformly per district
    pub urban_multiplier: (f32, f32),
    pub mixed_multiplier: (f32, f32),
    pub rural_multiplier: (f32, f32),
    /// Voter bands `[min, max)`
    pub high_turnout: (u32, u32),
    pub medium_turnout: (u32, u32),
    pub low_turnout: (u32, u32),
}

impl Default for DistrictConfig {
    fn default() -> Self {
        Self {
            min_seats: 1,
            population_per_seat: 40_000,
            requirement_increase_per_seat: 20_000,
            population_per_area: 1_000_000.0,
            urban_multiplier: (1.2, 1.6),
            mixed_multiplier: (0.9, 1.1),
            rural_multiplier: (0.4, 0.8),
            high_turnout: (400, 500),
            medium_turnout: (200, 300),
            low_turnout: (100, 150),
        }
    }
}

/// Party scoring and modifier weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectionConfig {
    pub base_popularity: i32,
    pub undecided_base_popularity: i32,
    pub decided_base_popularity: i32,
    pub low_impact: i32,
    pub medium_impact: i32,
    pub high_impact: i32,
    pub positive_modifier_impact: i32,
    pub negative_modifier_impact: i32,
    /// Share points added to the party that wins a drawn tie
    pub tie_break_bonus: f32,
    pub years_per_cycle: u32,
    pub start_year: u32,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            base_popularity: 20,
            undecided_base_popularity: 40,
            decided_base_popularity: 5,
            low_impact: 3,
            medium_impact: 5,
            high_impact: 7,
            positive_modifier_impact: 30,
            negative_modifier_impact: 30,
            tie_break_bonus: 0.1,
            years_per_cycle: 4,
            start_year: 1900,
        }
    }
}

/// Demo campaign played on the generated map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    /// Parties on the ballot; the first one is the player's
    pub parties: u32,
    pub elections: u32,
    /// Policy values are drawn from `0..=max_policy_value`
    pub max_policy_value: i32,
    pub languages: u16,
    pub religions: u16,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            parties: 4,
            elections: 3,
            max_policy_value: 3,
            languages: 3,
            religions: 3,
        }
    }
}

/// Nation expansion simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub nations: u32,
    pub ticks: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { nations: 5, ticks: 200 }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.map.width < 3 || self.map.height < 3 {
            return Err(SimError::Config(format!(
                "map must be at least 3x3 cells to fit the outer ocean ring, got {}x{}",
                self.map.width, self.map.height
            )));
        }
        if self.map.cell_size <= 0.0 {
            return Err(SimError::Config("cell_size must be positive".into()));
        }
        if !(0.0..0.5).contains(&self.map.jitter) {
            return Err(SimError::Config(format!(
                "jitter ({}) must be in [0, 0.5) to keep cells convex",
                self.map.jitter
            )));
        }

        let d = &self.district;
        if d.min_seats == 0 {
            return Err(SimError::Config("min_seats must be at least 1".into()));
        }
        if d.population_per_seat == 0 {
            return Err(SimError::Config("population_per_seat must be positive".into()));
        }
        for (name, (lo, hi)) in [
            ("urban_multiplier", d.urban_multiplier),
            ("mixed_multiplier", d.mixed_multiplier),
            ("rural_multiplier", d.rural_multiplier),
        ] {
            if lo <= 0.0 || lo >= hi {
                return Err(SimError::Config(format!("{name} must satisfy 0 < min < max")));
            }
        }
        for (name, (lo, hi)) in [
            ("low_turnout", d.low_turnout),
            ("medium_turnout", d.medium_turnout),
            ("high_turnout", d.high_turnout),
        ] {
            if lo == 0 || lo >= hi {
                return Err(SimError::Config(format!("{name} must satisfy 0 < min < max")));
            }
        }
        // Bands are disjoint and ordered so the band is recoverable from the count
        if d.low_turnout.1 > d.medium_turnout.0 || d.medium_turnout.1 > d.high_turnout.0 {
            return Err(SimError::Config(
                "turnout bands must be disjoint and ordered low < medium < high".into(),
            ));
        }

        let e = &self.election;
        if !(e.low_impact <= e.medium_impact && e.medium_impact <= e.high_impact) {
            return Err(SimError::Config(format!(
                "impacts must be ordered low ({}) <= medium ({}) <= high ({})",
                e.low_impact, e.medium_impact, e.high_impact
            )));
        }
        if e.tie_break_bonus <= 0.0 {
            return Err(SimError::Config("tie_break_bonus must be positive".into()));
        }

        let c = &self.campaign;
        if c.parties == 0 {
            return Err(SimError::Config("a campaign needs at least one party".into()));
        }
        if c.languages == 0 || c.religions == 0 {
            return Err(SimError::Config("languages and religions must be at least 1".into()));
        }
        if c.max_policy_value < 0 {
            return Err(SimError::Config("max_policy_value must not be negative".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [election]
            base_popularity = 25

            [district]
            high_turnout = [450, 550]
            "#,
        )
        .unwrap();

        assert_eq!(config.election.base_popularity, 25);
        assert_eq!(config.election.high_impact, 7);
        assert_eq!(config.district.high_turnout, (450, 550));
        assert_eq!(config.district.population_per_seat, 40_000);
    }

    #[test]
    fn test_overlapping_bands_rejected() {
        let mut config = SimulationConfig::default();
        config.district.medium_turnout = (120, 300);
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn test_unordered_impacts_rejected() {
        let mut config = SimulationConfig::default();
        config.election.low_impact = 9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_file_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/simulation.toml");
        let config = SimulationConfig::load(&path).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_campaign_without_parties_rejected() {
        let err = SimulationConfig::from_toml_str("[campaign]\nparties = 0").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_bad_toml_is_reported() {
        let err = SimulationConfig::from_toml_str("[map\nwidth = ").unwrap_err();
        assert!(matches!(err, SimError::TomlError(_)));
    }
}
