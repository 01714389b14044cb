//! Campaign - districts, parties and the election calendar

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{DistrictConfig, SimulationConfig};
use crate::core::error::{Result, SimError};
use crate::core::types::{DistrictId, PartyId, RegionId};
use crate::election::district::{Demographics, District};
use crate::election::engine::{record_result, ElectionDate, ElectionEngine};
use crate::election::modifier::Modifier;
use crate::election::party::Party;
use crate::election::result::ElectionResult;
use crate::election::traits::TraitSource;
use crate::map::world_map::WorldMap;

/// A line in the campaign log
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub election_cycle: u32,
    pub year: u32,
    pub message: String,
}

/// Outcome of one election held in every district
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneralElection {
    pub election_cycle: u32,
    pub year: u32,
    /// One result per district, ascending district id
    pub results: Vec<ElectionResult>,
    /// Parliament seats per party; each district's seats go to its winner
    pub seats: Vec<u32>,
}

impl GeneralElection {
    pub fn total_seats(&self) -> u32 {
        self.seats.iter().sum()
    }

    /// Party holding more than half of all seats
    pub fn majority(&self) -> Option<PartyId> {
        let total = self.total_seats();
        self.seats
            .iter()
            .position(|&s| s * 2 > total)
            .map(PartyId)
    }

    /// Party with the most seats; lowest id on equal counts
    pub fn largest_party(&self) -> Option<PartyId> {
        let max = self.seats.iter().copied().max()?;
        self.seats.iter().position(|&s| s == max).map(PartyId)
    }
}

pub struct Campaign {
    pub map: WorldMap,
    pub parties: Vec<Party>,
    pub player: PartyId,
    pub districts: BTreeMap<DistrictId, District>,
    pub election_cycle: u32,
    pub year: u32,
    pub log: Vec<LogEntry>,
    engine: ElectionEngine,
    district_config: DistrictConfig,
    years_per_cycle: u32,
    next_district_id: u32,
}

impl Campaign {
    /// Parties are indexed by their position; `player` must be one of them
    pub fn new(map: WorldMap, parties: Vec<Party>, player: PartyId, config: &SimulationConfig) -> Result<Self> {
        if parties.is_empty() {
            return Err(SimError::NoParties);
        }
        if player.index() >= parties.len() {
            return Err(SimError::UnknownParty(player));
        }
        if let Some((i, p)) = parties.iter().enumerate().find(|(i, p)| p.id.index() != *i) {
            return Err(SimError::Config(format!(
                "party '{}' has id {} but sits at position {}",
                p.name, p.id, i
            )));
        }

        Ok(Self {
            map,
            parties,
            player,
            districts: BTreeMap::new(),
            election_cycle: 1,
            year: config.election.start_year,
            log: Vec::new(),
            engine: ElectionEngine::new(config),
            district_config: config.district.clone(),
            years_per_cycle: config.election.years_per_cycle,
            next_district_id: 0,
        })
    }

    pub fn engine(&self) -> &ElectionEngine {
        &self.engine
    }

    pub fn district(&self, id: DistrictId) -> Option<&District> {
        self.districts.get(&id)
    }

    /// Found a district on a land region
    pub fn add_district<R: Rng>(
        &mut self,
        region: RegionId,
        demographics: Demographics,
        source: &mut dyn TraitSource,
        rng: &mut R,
    ) -> Result<DistrictId> {
        let id = DistrictId(self.next_district_id);
        let district = District::new(id, region, &self.map, demographics, source, &self.district_config, rng)?;
        self.next_district_id += 1;
        self.add_log(format!("{} founded with {} seats", district.name, district.seats));
        self.districts.insert(id, district);
        Ok(id)
    }

    pub fn add_modifier(&mut self, district: DistrictId, modifier: Modifier) -> Result<()> {
        if modifier.party.index() >= self.parties.len() {
            return Err(SimError::UnknownParty(modifier.party));
        }
        let d = self
            .districts
            .get_mut(&district)
            .ok_or(SimError::UnknownDistrict(district))?;
        let message = format!("{}: {} ({})", d.name, modifier.description, modifier.source);
        d.modifiers.add(modifier);
        self.add_log(message);
        Ok(())
    }

    pub fn add_log(&mut self, message: impl Into<String>) {
        self.log.push(LogEntry {
            election_cycle: self.election_cycle,
            year: self.year,
            message: message.into(),
        });
    }

    /// Hold an election in every district, in ascending id order, then
    /// settle modifiers and advance the calendar by one cycle.
    ///
    /// Nothing is written back unless every district resolves.
    pub fn run_general_election<R: Rng>(&mut self, rng: &mut R) -> Result<GeneralElection> {
        let date = ElectionDate {
            cycle: self.election_cycle,
            year: self.year,
        };

        let results = self
            .districts
            .values()
            .map(|d| self.engine.hold_election(d, self.player, &self.parties, date, &mut *rng))
            .collect::<Result<Vec<ElectionResult>>>()?;

        let mut seats = vec![0u32; self.parties.len()];
        let mut reports = Vec::new();
        for (district, result) in self.districts.values_mut().zip(&results) {
            seats[result.winner.index()] += district.seats;
            record_result(district, self.player, result.clone());
            for m in district.on_election_end() {
                reports.push(format!("{}: {} ({})", district.name, m.description, m.source));
            }
        }

        for message in reports {
            self.add_log(message);
        }

        let election = GeneralElection {
            election_cycle: date.cycle,
            year: date.year,
            results,
            seats,
        };

        tracing::info!(
            cycle = date.cycle,
            year = date.year,
            districts = election.results.len(),
            seats = election.total_seats(),
            majority = ?election.majority(),
            "general election held"
        );

        self.election_cycle += 1;
        self.year += self.years_per_cycle;
        Ok(election)
    }
}
