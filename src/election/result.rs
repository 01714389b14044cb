//! Election results

use serde::{Deserialize, Serialize};

use crate::core::types::{DistrictId, PartyId};
use crate::election::modifier::Modifier;

/// Record of a tie for first place settled by lot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TieBreak {
    /// Parties that shared the highest tally
    pub tied: Vec<PartyId>,
    pub chosen: PartyId,
    /// Share points credited to the chosen party on top of its raw share
    pub bonus: f32,
}

/// Immutable snapshot of one district election.
///
/// Per-party vectors are indexed by `PartyId`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElectionResult {
    pub election_cycle: u32,
    pub year: u32,
    pub district: DistrictId,
    /// Scores after modifiers, as used for sampling
    pub scores: Vec<i32>,
    /// Sampled ballots per party
    pub raw_votes: Vec<u32>,
    /// Ballots scaled to the district population
    pub votes: Vec<u64>,
    /// Raw share in percent; sums to 100
    pub vote_share: Vec<f32>,
    pub tie_break: Option<TieBreak>,
    pub winner: PartyId,
    /// Modifiers active when the votes were cast
    pub modifiers: Vec<Modifier>,
}

impl ElectionResult {
    /// Share including the tie-break bonus
    pub fn share_of(&self, party: PartyId) -> f32 {
        let raw = self.vote_share.get(party.index()).copied().unwrap_or(0.0);
        match &self.tie_break {
            Some(t) if t.chosen == party => raw + t.bonus,
            _ => raw,
        }
    }

    pub fn winner_share(&self) -> f32 {
        self.share_of(self.winner)
    }

    /// Best share among the parties that did not win (0 when unopposed)
    pub fn runner_up_share(&self) -> f32 {
        (0..self.vote_share.len())
            .map(PartyId)
            .filter(|&p| p != self.winner)
            .map(|p| self.share_of(p))
            .fold(0.0, f32::max)
    }

    /// Parties ordered by share, highest first; the winner always leads
    pub fn ranking(&self) -> Vec<(PartyId, f32)> {
        let mut ranked: Vec<(PartyId, f32)> = (0..self.vote_share.len())
            .map(|i| (PartyId(i), self.share_of(PartyId(i))))
            .collect();
        ranked.sort_by(|a, b| {
            (b.0 == self.winner)
                .cmp(&(a.0 == self.winner))
                .then(b.1.total_cmp(&a.1))
                .then(a.0.cmp(&b.0))
        });
        ranked
    }

    pub fn total_votes(&self) -> u64 {
        self.votes.iter().sum()
    }

    pub fn was_tied(&self) -> bool {
        self.tie_break.is_some()
    }
}
