//! Main simulation loop

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{NationId, PartyId, RegionId};
use crate::election::campaign::{Campaign, GeneralElection, LogEntry};
use crate::election::district::Demographics;
use crate::election::party::Party;
use crate::election::traits::{AgeGroup, DefaultTraitSource, Density, Language, Religion};
use crate::history::events::{EventType, GameEvent, HistoryLog};
use crate::history::output::SimulationOutput;
use crate::history::systems::NationExpansionEvent;
use crate::history::world::WorldState;
use crate::map::generation::generate_map;
use crate::map::world_map::WorldMap;

/// Nations spreading over a map, one weighted event per tick
pub struct WorldSimulation<R: RngCore = ChaCha8Rng> {
    pub world: WorldState,
    pub history: HistoryLog,
    rng: R,
    events: Vec<Box<dyn GameEvent>>,
}

impl WorldSimulation<ChaCha8Rng> {
    pub fn from_seed(map: WorldMap, seed: u64) -> Self {
        Self::new(map, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: RngCore> WorldSimulation<R> {
    /// A simulation with the expansion event registered
    pub fn new(map: WorldMap, rng: R) -> Self {
        Self {
            world: WorldState::new(map),
            history: HistoryLog::new(),
            rng,
            events: vec![Box::new(NationExpansionEvent::new())],
        }
    }

    pub fn register_event(&mut self, event: Box<dyn GameEvent>) {
        self.events.push(event);
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn add_log(&mut self, event_type: EventType, message: impl Into<String>) -> u32 {
        self.history.add_event(event_type, self.world.tick, message)
    }

    pub fn found_nation(&mut self, name: impl Into<String>, capital: RegionId) -> Result<NationId> {
        let name = name.into();
        let nation = self.world.found_nation(name.clone(), capital)?;
        let region_name = self
            .world
            .map
            .region(capital)
            .map(|r| r.name.clone())
            .unwrap_or_default();
        self.add_log(
            EventType::NationFounded { nation, capital },
            format!("The nation {name} was founded in {region_name}"),
        );
        tracing::debug!(nation = %nation, capital = %capital, "nation founded");
        Ok(nation)
    }

    pub fn capture_region(&mut self, nation: NationId, region: RegionId) -> Result<Option<NationId>> {
        let previous = self.world.capture_region(nation, region)?;
        self.note_destroyed(previous);
        Ok(previous)
    }

    /// Found `count` nations on distinct random land regions; stops early
    /// when the land runs out.
    pub fn seed_nations(&mut self, count: u32) -> Result<Vec<NationId>> {
        let mut free: Vec<RegionId> = self
            .world
            .map
            .land_regions()
            .filter(|r| r.nation.is_none())
            .map(|r| r.id)
            .collect();
        free.shuffle(&mut self.rng);

        let mut founded = Vec::new();
        for capital in free.into_iter().take(count as usize) {
            let name = format!("Nation {}", self.world.nations.len() + 1);
            founded.push(self.found_nation(name, capital)?);
        }
        Ok(founded)
    }

    /// Advance one tick: pick one event weighted by probability and run it
    pub fn tick(&mut self) -> Result<Option<EventType>> {
        self.world.tick += 1;

        let weights: Vec<u64> = self
            .events
            .iter_mut()
            .map(|e| e.probability(&self.world) as u64)
            .collect();
        let total: u64 = weights.iter().sum();
        if total == 0 {
            return Ok(None);
        }

        let draw = self.rng.gen_range(0..total);
        let mut cumulative = 0;
        let Some(index) = weights.iter().position(|&w| {
            cumulative += w;
            draw < cumulative
        }) else {
            return Ok(None);
        };

        let event = &mut self.events[index];
        if !event.init_execution(&self.world, &mut self.rng) {
            return Ok(None);
        }
        let Some((event_type, message)) = event.execute(&mut self.world)? else {
            return Ok(None);
        };

        self.add_log(event_type.clone(), message);
        if let EventType::Expansion { previous, .. } = event_type {
            self.note_destroyed(previous);
        }
        Ok(Some(event_type))
    }

    /// Run up to `ticks` ticks; stops once nothing can happen any more.
    /// Returns the number of ticks that produced an event.
    pub fn run(&mut self, ticks: u32) -> Result<u32> {
        let mut active = 0;
        for _ in 0..ticks {
            match self.tick()? {
                Some(_) => active += 1,
                None if self.is_settled() => break,
                None => {}
            }
        }
        tracing::info!(
            ticks = self.world.tick,
            events = active,
            nations = self.world.alive_nations().count(),
            "history simulated"
        );
        Ok(active)
    }

    /// No registered event can fire
    pub fn is_settled(&mut self) -> bool {
        let world = &self.world;
        self.events.iter_mut().all(|e| e.probability(world) == 0)
    }

    fn note_destroyed(&mut self, previous: Option<NationId>) {
        let Some(old) = previous.and_then(|p| self.world.nation(p)) else {
            return;
        };
        if old.is_alive() {
            return;
        }
        let (nation, message) = (old.id, format!("The nation {} has fallen", old.name));
        self.add_log(EventType::NationDestroyed { nation }, message);
    }
}

/// Result of the demo campaign held after the history run
pub struct CampaignRun {
    pub home_nation: Option<NationId>,
    pub elections: Vec<GeneralElection>,
    pub log: Vec<LogEntry>,
}

/// Generate a map, let nations expand over it, then hold general elections
/// in the districts of the largest nation.
pub fn simulate(config: &SimulationConfig) -> Result<SimulationOutput> {
    config.validate()?;
    let start = Instant::now();

    let mut rng = ChaCha8Rng::seed_from_u64(config.map.seed);
    let map = generate_map(&config.map, &mut rng)?;

    let mut sim = WorldSimulation::new(map, rng);
    sim.seed_nations(config.world.nations)?;
    sim.run(config.world.ticks)?;

    let campaign = run_campaign(&mut sim, config)?;

    Ok(SimulationOutput::new(sim.world, sim.history, campaign, start.elapsed()))
}

fn run_campaign<R: RngCore>(sim: &mut WorldSimulation<R>, config: &SimulationConfig) -> Result<CampaignRun> {
    let home = sim
        .world
        .alive_nations()
        .max_by(|a, b| a.size().cmp(&b.size()).then(b.id.cmp(&a.id)))
        .map(|n| (n.id, n.regions.clone()));
    let Some((home_nation, mut regions)) = home else {
        return Ok(CampaignRun {
            home_nation: None,
            elections: Vec::new(),
            log: Vec::new(),
        });
    };
    regions.sort();

    let c = &config.campaign;
    let languages: Vec<Language> = (0..c.languages).map(Language).collect();
    let religions: Vec<Religion> = (0..c.religions).map(Religion).collect();

    let map = sim.world.map.clone();
    let rng = sim.rng_mut();
    let parties: Vec<Party> = (0..c.parties as usize)
        .map(|i| {
            let name = format!("Party {}", i + 1);
            Party::random(PartyId(i), name, &languages, &religions, c.max_policy_value, rng)
        })
        .collect();

    let mut campaign = Campaign::new(map, parties, PartyId(0), config)?;
    for region in regions {
        let demographics = Demographics {
            density: Density::ALL[rng.gen_range(0..Density::ALL.len())],
            age_group: AgeGroup::ALL[rng.gen_range(0..AgeGroup::ALL.len())],
            language: languages[rng.gen_range(0..languages.len())],
            religion: religions[rng.gen_range(0..religions.len())],
        };
        campaign.add_district(region, demographics, &mut DefaultTraitSource, rng)?;
    }

    let mut elections = Vec::with_capacity(c.elections as usize);
    for _ in 0..c.elections {
        elections.push(campaign.run_general_election(rng)?);
    }

    Ok(CampaignRun {
        home_nation: Some(home_nation),
        elections,
        log: campaign.log,
    })
}
