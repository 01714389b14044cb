//! Simulation output and serialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::types::NationId;
use crate::election::campaign::{GeneralElection, LogEntry};
use crate::history::events::HistoryLog;
use crate::history::nation::Nation;
use crate::history::simulation::CampaignRun;
use crate::history::world::WorldState;

/// Complete simulation output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub final_world: WorldSnapshot,
    pub history: HistoryLog,
    pub home_nation: Option<NationId>,
    pub elections: Vec<GeneralElection>,
    pub campaign_log: Vec<LogEntry>,
    pub statistics: SimulationStats,
}

/// Serializable snapshot of world state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u32,
    pub width: f32,
    pub height: f32,
    pub nations: Vec<Nation>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationStats {
    pub ticks_simulated: u32,
    pub simulation_time_ms: u64,
    pub total_events: u32,
    pub expansions: u32,
    pub land_regions: u32,
    pub water_regions: u32,
    pub landmasses: u32,
    pub water_bodies: u32,
    pub unclaimed_regions: u32,
    pub nations_at_start: u32,
    pub nations_at_end: u32,
    pub districts: u32,
    pub seats: u32,
}

impl SimulationOutput {
    pub fn new(world: WorldState, history: HistoryLog, campaign: CampaignRun, elapsed: Duration) -> Self {
        let map = &world.map;
        let unclaimed = map.land_regions().filter(|r| r.nation.is_none()).count() as u32;
        let nations_alive = world.alive_nations().count() as u32;
        let (districts, seats) = campaign
            .elections
            .last()
            .map(|e| (e.results.len() as u32, e.total_seats()))
            .unwrap_or((0, 0));

        let statistics = SimulationStats {
            ticks_simulated: world.tick,
            simulation_time_ms: elapsed.as_millis() as u64,
            total_events: history.len() as u32,
            expansions: history.count_expansions() as u32,
            land_regions: map.num_land_regions() as u32,
            water_regions: map.num_water_regions() as u32,
            landmasses: map.num_landmasses() as u32,
            water_bodies: map.num_water_bodies() as u32,
            unclaimed_regions: unclaimed,
            nations_at_start: world.nations.len() as u32,
            nations_at_end: nations_alive,
            districts,
            seats,
        };

        Self {
            final_world: WorldSnapshot {
                tick: world.tick,
                width: world.map.width,
                height: world.map.height,
                nations: world.nations,
            },
            history,
            home_nation: campaign.home_nation,
            elections: campaign.elections,
            campaign_log: campaign.log,
            statistics,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        let s = &self.statistics;
        let mut out = format!(
            "Simulated {} ticks in {}ms\n\
             Map: {} land regions on {} landmasses, {} water regions in {} water bodies\n\
             {} events, {} expansions, {} of {} nations remain, {} regions unclaimed",
            s.ticks_simulated,
            s.simulation_time_ms,
            s.land_regions,
            s.landmasses,
            s.water_regions,
            s.water_bodies,
            s.total_events,
            s.expansions,
            s.nations_at_end,
            s.nations_at_start,
            s.unclaimed_regions,
        );

        if let Some(home) = self.home_nation.and_then(|id| self.final_world.nations.get(id.index())) {
            out.push_str(&format!(
                "\nCampaign in {}: {} districts, {} seats",
                home.name, s.districts, s.seats
            ));
        }
        for e in &self.elections {
            let seats: Vec<String> = e.seats.iter().map(|s| s.to_string()).collect();
            let majority = match e.majority() {
                Some(p) => format!("majority for {p}"),
                None => "hung parliament".to_string(),
            };
            out.push_str(&format!(
                "\n  {} (cycle {}): seats [{}], {}",
                e.year,
                e.election_cycle,
                seats.join(", "),
                majority
            ));
        }
        out
    }
}
