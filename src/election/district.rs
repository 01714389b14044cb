//! District - the electable unit built on one land region

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::DistrictConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{DistrictId, PartyId, RegionId};
use crate::election::geography::geography_traits;
use crate::election::modifier::{mentality_modifiers, Modifier, ModifierLedger};
use crate::election::result::ElectionResult;
use crate::election::traits::{
    AgeGroup, Density, EconomyTrait, GeographyTrait, Language, Mentality, MentalitySet, Religion,
    TraitSource,
};
use crate::map::world_map::WorldMap;

/// Demographic inputs chosen by the game when a district is founded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub density: Density,
    pub age_group: AgeGroup,
    pub language: Language,
    pub religion: Religion,
}

/// Live outcome of the most recent election, for display
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub winner: PartyId,
    pub winner_share: f32,
    pub player_share: f32,
    /// Positive when the player is ahead
    pub margin: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct District {
    pub id: DistrictId,
    pub name: String,
    pub region: RegionId,

    // Traits
    pub geography: Vec<GeographyTrait>,
    pub language: Language,
    pub religion: Religion,
    pub density: Density,
    pub age_group: AgeGroup,
    /// Economy traits in descending importance; pairwise distinct
    pub economy: [EconomyTrait; 3],
    pub mentalities: MentalitySet,

    pub population: u32,
    pub seats: u32,
    /// Number of sampled voters per election
    pub voters: u32,

    pub modifiers: ModifierLedger,
    pub results: Vec<ElectionResult>,
    pub standing: Option<Standing>,
}

impl District {
    /// Build a district on a land region.
    ///
    /// Random draws happen in a fixed order: three or more economy draws,
    /// the mentality count, the mentality picks, the density multiplier and
    /// finally the voter count.
    pub fn new<R: Rng>(
        id: DistrictId,
        region: RegionId,
        map: &WorldMap,
        demographics: Demographics,
        source: &mut dyn TraitSource,
        config: &DistrictConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let r = map.try_region(region)?;
        if r.is_water {
            return Err(SimError::NotLand(region));
        }

        let geography = geography_traits(r, map);
        let economy = draw_economy(source, rng);

        let target = rng.gen_range(1..=3);
        let mut mentalities = MentalitySet::new();
        while mentalities.len() < target {
            let m = source.mentality_for(&mentalities, rng);
            mentalities.push(m);
        }

        let population = population_for(r.area, demographics.density, config, rng);
        let seats = seats_for(population, config);
        let voters = voters_for(&mentalities, config, rng);

        tracing::debug!(
            district = %id,
            region = %region,
            population,
            seats,
            voters,
            traits = geography.len(),
            "district founded"
        );

        Ok(Self {
            id,
            name: r.name.clone(),
            region,
            geography,
            language: demographics.language,
            religion: demographics.religion,
            density: demographics.density,
            age_group: demographics.age_group,
            economy,
            mentalities,
            population,
            seats,
            voters,
            modifiers: ModifierLedger::new(),
            results: Vec::new(),
            standing: None,
        })
    }

    pub fn has_mentality(&self, mentality: Mentality) -> bool {
        self.mentalities.contains(mentality)
    }

    pub fn last_result(&self) -> Option<&ElectionResult> {
        self.results.last()
    }

    pub fn current_winner(&self) -> Option<PartyId> {
        self.standing.map(|s| s.winner)
    }

    /// Post-election update: decay existing modifiers, then attach the
    /// mentality modifiers for the current winner. Returns the new ones.
    pub fn on_election_end(&mut self) -> Vec<Modifier> {
        self.modifiers.decay();
        let added = mentality_modifiers(self.id, &self.mentalities, self.current_winner());
        for modifier in &added {
            self.modifiers.add(modifier.clone());
        }
        added
    }
}

fn draw_economy<R: Rng>(source: &mut dyn TraitSource, rng: &mut R) -> [EconomyTrait; 3] {
    let first = source.random_economy_trait(rng);
    let mut second = source.random_economy_trait(rng);
    while second == first {
        second = source.random_economy_trait(rng);
    }
    let mut third = source.random_economy_trait(rng);
    while third == first || third == second {
        third = source.random_economy_trait(rng);
    }
    [first, second, third]
}

/// Inhabitants: area scaled by a density-dependent draw, floored to the thousand
pub fn population_for<R: Rng>(area: f32, density: Density, config: &DistrictConfig, rng: &mut R) -> u32 {
    let (lo, hi) = match density {
        Density::Urban => config.urban_multiplier,
        Density::Mixed => config.mixed_multiplier,
        Density::Rural => config.rural_multiplier,
    };
    let multiplier = rng.gen_range(lo..hi) as f64;
    let raw = (area.max(0.0) as f64 * config.population_per_area as f64 * multiplier) as u32;
    raw / 1000 * 1000
}

/// Seats claimed when each seat costs 20,000 more than the previous one
pub fn seats_for(population: u32, config: &DistrictConfig) -> u32 {
    let mut remaining = population as u64;
    let mut requirement = config.population_per_seat as u64;
    let mut seats = 0;
    while remaining >= requirement {
        seats += 1;
        remaining -= requirement;
        requirement += config.requirement_increase_per_seat as u64;
    }
    seats.max(config.min_seats)
}

/// Voter count from the turnout band; Predictable is checked before Unpredictable
pub fn voters_for<R: Rng>(mentalities: &MentalitySet, config: &DistrictConfig, rng: &mut R) -> u32 {
    let (lo, hi) = if mentalities.contains(Mentality::Predictable) {
        config.high_turnout
    } else if mentalities.contains(Mentality::Unpredictable) {
        config.low_turnout
    } else {
        config.medium_turnout
    };
    rng.gen_range(lo..hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::election::traits::DefaultTraitSource;
    use crate::map::region::Region;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand::RngCore;
    use rand_chacha::ChaCha8Rng;
    use glam::Vec2;

    fn one_region_map(area: f32) -> WorldMap {
        let mut regions = vec![Region::outer_ocean(0), Region::land(1, area, Vec2::new(5.0, 5.0))];
        regions[0].add_neighbor(RegionId(1), 1.0);
        regions[1].add_neighbor(RegionId(0), 1.0);
        WorldMap::new(10.0, 10.0, regions).unwrap()
    }

    fn demographics(density: Density) -> Demographics {
        Demographics {
            density,
            age_group: AgeGroup::Young,
            language: Language(0),
            religion: Religion(0),
        }
    }

    /// Always hands out the same mentality and cycles through economy traits
    struct Scripted {
        mentality: Mentality,
        economy: Vec<EconomyTrait>,
        next: usize,
    }

    impl TraitSource for Scripted {
        fn random_economy_trait(&mut self, _rng: &mut dyn RngCore) -> EconomyTrait {
            let e = self.economy[self.next % self.economy.len()];
            self.next += 1;
            e
        }

        fn mentality_for(&mut self, _held: &MentalitySet, _rng: &mut dyn RngCore) -> Mentality {
            self.mentality
        }
    }

    #[test]
    fn test_seat_apportionment() {
        let config = DistrictConfig::default();
        assert_eq!(seats_for(0, &config), 1);
        assert_eq!(seats_for(39_999, &config), 1);
        assert_eq!(seats_for(40_000, &config), 1);
        // 40k + 60k
        assert_eq!(seats_for(100_000, &config), 2);
        assert_eq!(seats_for(99_999, &config), 1);
        // 40k + 60k + 80k
        assert_eq!(seats_for(180_000, &config), 3);
        assert_eq!(seats_for(640_000, &config), 6);
    }

    #[test]
    fn test_population_floored_to_thousand() {
        let config = DistrictConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for density in Density::ALL {
            let p = population_for(0.6543, density, &config, &mut rng);
            assert_eq!(p % 1000, 0);
        }
    }

    #[test]
    fn test_population_bands() {
        let config = DistrictConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        for _ in 0..100 {
            let urban = population_for(1.0, Density::Urban, &config, &mut rng);
            let rural = population_for(1.0, Density::Rural, &config, &mut rng);
            assert!((1_199_000..=1_600_000).contains(&urban), "{urban}");
            assert!((399_000..=800_000).contains(&rural), "{rural}");
        }
    }

    #[test]
    fn test_voter_bands_first_match_wins() {
        let config = DistrictConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let both: MentalitySet = [Mentality::Unpredictable, Mentality::Predictable]
            .into_iter()
            .collect();
        let low: MentalitySet = [Mentality::Unpredictable].into_iter().collect();
        let none = MentalitySet::new();
        for _ in 0..50 {
            assert!((400..500).contains(&voters_for(&both, &config, &mut rng)));
            assert!((100..150).contains(&voters_for(&low, &config, &mut rng)));
            assert!((200..300).contains(&voters_for(&none, &config, &mut rng)));
        }
    }

    #[test]
    fn test_economy_traits_distinct_even_with_repeats() {
        let mut source = Scripted {
            mentality: Mentality::Stable,
            economy: vec![
                EconomyTrait::Mining,
                EconomyTrait::Mining,
                EconomyTrait::Trade,
                EconomyTrait::Mining,
                EconomyTrait::Trade,
                EconomyTrait::Finance,
            ],
            next: 0,
        };
        let mut rng = StepRng::new(0, 0);
        let economy = draw_economy(&mut source, &mut rng);
        assert_eq!(
            economy,
            [EconomyTrait::Mining, EconomyTrait::Trade, EconomyTrait::Finance]
        );
    }

    #[test]
    fn test_new_district() {
        let map = one_region_map(0.8);
        let config = DistrictConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let d = District::new(
            DistrictId(0),
            RegionId(1),
            &map,
            demographics(Density::Mixed),
            &mut DefaultTraitSource,
            &config,
            &mut rng,
        )
        .unwrap();

        assert!(d.seats >= 1);
        assert!((1..=3).contains(&d.mentalities.len()));
        assert_ne!(d.economy[0], d.economy[1]);
        assert_ne!(d.economy[1], d.economy[2]);
        assert_ne!(d.economy[0], d.economy[2]);
        assert!((100..500).contains(&d.voters));
        assert_eq!(d.seats, seats_for(d.population, &config));
        assert!(d.standing.is_none());
    }

    #[test]
    fn test_lowest_draws_are_reproducible() {
        let map = one_region_map(1.0);
        let mut source = Scripted {
            mentality: Mentality::Predictable,
            economy: EconomyTrait::ALL.to_vec(),
            next: 0,
        };
        // StepRng(0, 0) picks the lowest value of every range: one mentality
        let mut rng = StepRng::new(0, 0);
        let d = District::new(
            DistrictId(0),
            RegionId(1),
            &map,
            demographics(Density::Urban),
            &mut source,
            &DistrictConfig::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(d.mentalities.len(), 1);
        assert_eq!(d.voters, 400);
        // 1.0 * 1e6 * 1.2
        assert_eq!(d.population, 1_200_000);
        assert_eq!(d.seats, 9);
    }

    #[test]
    fn test_water_region_rejected() {
        let map = one_region_map(0.8);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = District::new(
            DistrictId(0),
            RegionId(0),
            &map,
            demographics(Density::Rural),
            &mut DefaultTraitSource,
            &DistrictConfig::default(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, SimError::NotLand(RegionId(0))));
    }
}
