//! Election engine
//!
//! Every party gets a popularity score from the district's traits and the
//! party's policies. Modifiers adjust the scores, then each sampled voter
//! picks a party with probability proportional to its score. There is
//! always exactly one winner: a tie for first place is settled by lot.
//!
//! Random draws per election: exactly `district.voters` ballots, plus one
//! extra draw if a tie for first place has to be broken.

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::core::config::{ElectionConfig, SimulationConfig};
use crate::core::error::{Result, SimError};
use crate::core::types::PartyId;
use crate::election::district::{District, Standing};
use crate::election::modifier::{Modifier, ModifierType};
use crate::election::party::PolicySource;
use crate::election::result::{ElectionResult, TieBreak};
use crate::election::traits::{GeographyTrait, Mentality, PolicyKey};

/// Election cycle and calendar year an election is held in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElectionDate {
    pub cycle: u32,
    pub year: u32,
}

#[derive(Clone, Debug)]
pub struct ElectionEngine {
    config: ElectionConfig,
    /// Top of the high turnout band; raw ballots are scaled by population / cap
    turnout_cap: u32,
}

impl ElectionEngine {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            config: config.election.clone(),
            turnout_cap: config.district.high_turnout.1.max(1),
        }
    }

    pub fn config(&self) -> &ElectionConfig {
        &self.config
    }

    fn impact_for(&self, t: &GeographyTrait) -> Result<i32> {
        match t.category {
            3 => Ok(self.config.high_impact),
            2 => Ok(self.config.medium_impact),
            1 => Ok(self.config.low_impact),
            other => Err(SimError::InvalidTraitCategory(other)),
        }
    }

    /// Popularity of a party in a district before modifiers; may be negative
    pub fn party_popularity<P: PolicySource + ?Sized>(&self, district: &District, party: &P) -> Result<i32> {
        let c = &self.config;

        // Decided takes precedence when a district holds both
        let mut points = if district.has_mentality(Mentality::Decided) {
            c.decided_base_popularity
        } else if district.has_mentality(Mentality::Undecided) {
            c.undecided_base_popularity
        } else {
            c.base_popularity
        };

        for t in &district.geography {
            points += party.policy_value(PolicyKey::Geography(t.kind)) * self.impact_for(t)?;
        }

        let [e1, e2, e3] = district.economy;
        points += party.policy_value(PolicyKey::Economy(e1)) * c.high_impact;
        points += party.policy_value(PolicyKey::Economy(e2)) * c.medium_impact;
        points += party.policy_value(PolicyKey::Economy(e3)) * c.low_impact;

        points += party.policy_value(PolicyKey::Density(district.density)) * c.medium_impact;
        points += party.policy_value(PolicyKey::AgeGroup(district.age_group)) * c.medium_impact;

        let mut language = party.policy_value(PolicyKey::Language(district.language)) * c.medium_impact;
        if district.has_mentality(Mentality::Linguistic) {
            language *= 2;
        }
        if district.has_mentality(Mentality::Nonlinguistic) {
            language /= 2;
        }
        points += language;

        let mut religion = party.policy_value(PolicyKey::Religion(district.religion)) * c.medium_impact;
        if district.has_mentality(Mentality::Religious) {
            religion *= 2;
        }
        if district.has_mentality(Mentality::Secular) {
            religion /= 2;
        }
        points += religion;

        Ok(points)
    }

    /// Apply modifiers to scores; exclusions are applied last so they always win
    pub fn apply_modifiers(&self, scores: &mut [i32], modifiers: &[Modifier]) -> Result<()> {
        for m in modifiers {
            let score = scores
                .get_mut(m.party.index())
                .ok_or(SimError::UnknownParty(m.party))?;
            match m.kind {
                ModifierType::Positive => *score += self.config.positive_modifier_impact,
                ModifierType::Negative => *score -= self.config.negative_modifier_impact,
                ModifierType::Exclusion => {}
            }
        }
        for m in modifiers.iter().filter(|m| m.kind == ModifierType::Exclusion) {
            scores[m.party.index()] = 0;
        }
        Ok(())
    }

    /// Run one election in `district` between `parties` (indexed by `PartyId`).
    ///
    /// Appends the result to the district history and refreshes its standing.
    pub fn run_election<P: PolicySource, R: Rng>(
        &self,
        district: &mut District,
        player: PartyId,
        parties: &[P],
        date: ElectionDate,
        rng: &mut R,
    ) -> Result<ElectionResult> {
        let result = self.hold_election(district, player, parties, date, rng)?;
        record_result(district, player, result.clone());
        Ok(result)
    }

    /// Score, sample and resolve an election without touching the district
    pub fn hold_election<P: PolicySource, R: Rng>(
        &self,
        district: &District,
        player: PartyId,
        parties: &[P],
        date: ElectionDate,
        rng: &mut R,
    ) -> Result<ElectionResult> {
        if parties.is_empty() {
            return Err(SimError::NoParties);
        }
        if player.index() >= parties.len() {
            return Err(SimError::UnknownParty(player));
        }

        let mut scores = parties
            .iter()
            .map(|p| self.party_popularity(district, p))
            .collect::<Result<Vec<i32>>>()?;

        let modifiers = district.modifiers.active().to_vec();
        self.apply_modifiers(&mut scores, &modifiers)?;

        // Negative scores carry no weight
        let weights: Vec<u32> = scores.iter().map(|&s| s.max(0) as u32).collect();
        let raw_votes = cast_votes(&weights, district.voters, rng)
            .ok_or(SimError::NoVotingWeight(district.id))?;

        let voters = district.voters as f32;
        let vote_share: Vec<f32> = raw_votes
            .iter()
            .map(|&v| 100.0 * v as f32 / voters)
            .collect();

        let (winner, tie_break) = pick_winner(&raw_votes, self.config.tie_break_bonus, rng);

        let scale = district.population as u64 / self.turnout_cap as u64;
        let votes: Vec<u64> = raw_votes.iter().map(|&v| v as u64 * scale).collect();

        let result = ElectionResult {
            election_cycle: date.cycle,
            year: date.year,
            district: district.id,
            scores,
            raw_votes,
            votes,
            vote_share,
            tie_break,
            winner,
            modifiers,
        };

        tracing::debug!(
            district = %district.id,
            winner = %winner,
            winner_share = result.winner_share(),
            tied = result.was_tied(),
            "election resolved"
        );

        Ok(result)
    }
}

/// Store a resolved election in the district history and refresh its standing
pub fn record_result(district: &mut District, player: PartyId, result: ElectionResult) {
    let winner = result.winner;
    let winner_share = result.winner_share();
    let player_share = result.share_of(player);
    let margin = if winner == player {
        winner_share - result.runner_up_share()
    } else {
        player_share - winner_share
    };
    district.standing = Some(Standing {
        winner,
        winner_share,
        player_share,
        margin,
    });
    district.results.push(result);
}

/// Sample `voters` ballots, each landing on a party with probability
/// proportional to its weight. Returns `None` when all weights are zero.
pub fn cast_votes<R: Rng>(weights: &[u32], voters: u32, rng: &mut R) -> Option<Vec<u32>> {
    let total: u64 = weights.iter().map(|&w| w as u64).sum();
    if total == 0 || voters == 0 {
        return None;
    }

    // One uniform sample per ballot
    let ballot = Uniform::new(0, total);
    let mut tally = vec![0u32; weights.len()];
    for _ in 0..voters {
        let draw = ballot.sample(rng);
        let mut cumulative = 0u64;
        for (i, &w) in weights.iter().enumerate() {
            cumulative += w as u64;
            if draw < cumulative {
                tally[i] += 1;
                break;
            }
        }
    }
    Some(tally)
}

/// Party with the most ballots; a shared maximum is settled with one draw
fn pick_winner<R: Rng>(raw_votes: &[u32], bonus: f32, rng: &mut R) -> (PartyId, Option<TieBreak>) {
    let max = raw_votes.iter().copied().max().unwrap_or(0);
    let tied: Vec<PartyId> = raw_votes
        .iter()
        .enumerate()
        .filter(|(_, &v)| v == max)
        .map(|(i, _)| PartyId(i))
        .collect();

    if tied.len() == 1 {
        return (tied[0], None);
    }

    let chosen = tied[Uniform::new(0, tied.len()).sample(rng)];
    (chosen, Some(TieBreak { tied, chosen, bonus }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::CountingRng;
    use crate::core::types::{DistrictId, RegionId};
    use crate::election::modifier::{Modifier, ModifierLedger};
    use crate::election::party::Party;
    use crate::election::traits::{
        AgeGroup, Density, EconomyTrait, GeographyTraitType, Language, MentalitySet, Religion,
    };
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn district(mentalities: &[Mentality], voters: u32) -> District {
        District {
            id: DistrictId(0),
            name: "Test".to_string(),
            region: RegionId(1),
            geography: vec![
                GeographyTrait::new(GeographyTraitType::Coastal, 3).unwrap(),
                GeographyTrait::new(GeographyTraitType::Tiny, 1).unwrap(),
            ],
            language: Language(0),
            religion: Religion(0),
            density: Density::Urban,
            age_group: AgeGroup::Young,
            economy: [EconomyTrait::Fishing, EconomyTrait::Trade, EconomyTrait::Mining],
            mentalities: mentalities.iter().copied().collect::<MentalitySet>(),
            population: 500_000,
            seats: 5,
            voters,
            modifiers: ModifierLedger::new(),
            results: Vec::new(),
            standing: None,
        }
    }

    fn engine() -> ElectionEngine {
        ElectionEngine::new(&SimulationConfig::default())
    }

    fn date() -> ElectionDate {
        ElectionDate { cycle: 1, year: 1900 }
    }

    #[test]
    fn test_popularity_weights() {
        let party = Party::new(PartyId(0), "Sea")
            .with_policy(PolicyKey::Geography(GeographyTraitType::Coastal), 2)
            .with_policy(PolicyKey::Geography(GeographyTraitType::Tiny), 1)
            .with_policy(PolicyKey::Economy(EconomyTrait::Fishing), 1)
            .with_policy(PolicyKey::Economy(EconomyTrait::Trade), 1)
            .with_policy(PolicyKey::Economy(EconomyTrait::Mining), 1)
            .with_policy(PolicyKey::Density(Density::Urban), 1)
            .with_policy(PolicyKey::AgeGroup(AgeGroup::Young), 1);
        let d = district(&[], 200);
        // 20 + 2*7 + 1*3 + 7 + 5 + 3 + 5 + 5
        assert_eq!(engine().party_popularity(&d, &party).unwrap(), 62);
    }

    #[test]
    fn test_base_popularity_precedence() {
        let party = Party::new(PartyId(0), "Empty");
        let e = engine();
        assert_eq!(e.party_popularity(&district(&[Mentality::Decided], 200), &party).unwrap(), 5);
        assert_eq!(e.party_popularity(&district(&[Mentality::Undecided], 200), &party).unwrap(), 40);
        let both = district(&[Mentality::Undecided, Mentality::Decided], 200);
        assert_eq!(e.party_popularity(&both, &party).unwrap(), 5);
    }

    #[test]
    fn test_language_and_religion_scaling() {
        let party = Party::new(PartyId(0), "Folk")
            .with_policy(PolicyKey::Language(Language(0)), 3)
            .with_policy(PolicyKey::Religion(Religion(0)), 1);
        let e = engine();
        // 20 + 15 + 5
        assert_eq!(e.party_popularity(&district(&[], 200), &party).unwrap(), 40);
        // 20 + 30 + 5
        assert_eq!(e.party_popularity(&district(&[Mentality::Linguistic], 200), &party).unwrap(), 55);
        // 20 + 7 + 5
        assert_eq!(e.party_popularity(&district(&[Mentality::Nonlinguistic], 200), &party).unwrap(), 32);
        // 20 + 15 + 2
        assert_eq!(e.party_popularity(&district(&[Mentality::Secular], 200), &party).unwrap(), 37);
        // 20 + 15 + 10
        assert_eq!(e.party_popularity(&district(&[Mentality::Religious], 200), &party).unwrap(), 45);
    }

    #[test]
    fn test_invalid_category_is_fatal() {
        let mut d = district(&[], 200);
        d.geography.push(GeographyTrait {
            kind: GeographyTraitType::Large,
            category: 4,
        });
        let party = Party::new(PartyId(0), "Any");
        assert!(matches!(
            engine().party_popularity(&d, &party),
            Err(SimError::InvalidTraitCategory(4))
        ));
    }

    #[test]
    fn test_exclusion_dominates_regardless_of_order() {
        let e = engine();
        let m = |kind| Modifier::new(kind, DistrictId(0), PartyId(0), 1, "", "");
        let mut scores = vec![50, 50];
        e.apply_modifiers(
            &mut scores,
            &[m(ModifierType::Exclusion), m(ModifierType::Positive), m(ModifierType::Positive)],
        )
        .unwrap();
        assert_eq!(scores, vec![0, 50]);

        let mut scores = vec![50, 50];
        e.apply_modifiers(&mut scores, &[m(ModifierType::Negative), m(ModifierType::Exclusion)])
            .unwrap();
        assert_eq!(scores, vec![0, 50]);
    }

    #[test]
    fn test_modifier_for_unknown_party() {
        let e = engine();
        let mut scores = vec![10];
        let m = Modifier::new(ModifierType::Positive, DistrictId(0), PartyId(3), 1, "", "");
        assert!(matches!(
            e.apply_modifiers(&mut scores, &[m]),
            Err(SimError::UnknownParty(PartyId(3)))
        ));
    }

    #[test]
    fn test_cast_votes_fixed_sequence() {
        // Every draw is 0, so every ballot lands on the first party with weight
        let mut rng = StepRng::new(0, 0);
        assert_eq!(cast_votes(&[150, 50], 200, &mut rng), Some(vec![200, 0]));
        assert_eq!(cast_votes(&[0, 50], 200, &mut rng), Some(vec![0, 200]));
    }

    #[test]
    fn test_cast_votes_zero_weight() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(cast_votes(&[0, 0], 200, &mut rng), None);
        assert_eq!(cast_votes(&[], 200, &mut rng), None);
    }

    #[test]
    fn test_cast_votes_converges() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let trials = 500;
        let mut first = 0u64;
        for _ in 0..trials {
            let tally = cast_votes(&[150, 50], 200, &mut rng).unwrap();
            assert_eq!(tally.iter().sum::<u32>(), 200);
            first += tally[0] as u64;
        }
        let share = first as f64 / (trials as f64 * 200.0);
        assert!((share - 0.75).abs() < 0.01, "share {share}");
    }

    #[test]
    fn test_seeded_election_reproducible() {
        let parties = vec![
            Party::new(PartyId(0), "A").with_policy(PolicyKey::Density(Density::Urban), 2),
            Party::new(PartyId(1), "B"),
        ];
        let run = |seed| {
            let mut d = district(&[], 250);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            engine().run_election(&mut d, PartyId(0), &parties, date(), &mut rng).unwrap()
        };
        assert_eq!(run(17), run(17));
    }

    #[test]
    fn test_cast_votes_golden_tally() {
        let mut rng = CountingRng::new(ChaCha8Rng::seed_from_u64(7));
        assert_eq!(cast_votes(&[30, 10, 20], 12, &mut rng), Some(vec![7, 1, 4]));
        assert_eq!(rng.draws, 12);
    }

    #[test]
    fn test_election_draws_one_per_voter() {
        let parties = vec![
            Party::new(PartyId(0), "A").with_policy(PolicyKey::Density(Density::Urban), 1),
            Party::new(PartyId(1), "B"),
        ];
        let mut d = district(&[], 20);
        let mut rng = CountingRng::new(ChaCha8Rng::seed_from_u64(11));
        let r = engine().run_election(&mut d, PartyId(0), &parties, date(), &mut rng).unwrap();
        assert_eq!(r.scores, vec![25, 20]);
        assert_eq!(r.raw_votes, vec![15, 5]);
        assert_eq!(r.winner, PartyId(0));
        assert!(!r.was_tied());
        assert_eq!(rng.draws, 20);
    }

    #[test]
    fn test_tie_costs_one_extra_draw() {
        let parties = vec![Party::new(PartyId(0), "A"), Party::new(PartyId(1), "B")];
        let mut d = district(&[], 10);
        let mut rng = CountingRng::new(ChaCha8Rng::seed_from_u64(7));
        let r = engine().run_election(&mut d, PartyId(1), &parties, date(), &mut rng).unwrap();
        assert_eq!(r.raw_votes, vec![5, 5]);
        assert!(r.was_tied());
        assert_eq!(r.winner, PartyId(0));
        assert_eq!(rng.draws, 11);
    }

    #[test]
    fn test_hold_election_leaves_district_untouched() {
        let parties = vec![Party::new(PartyId(0), "A"), Party::new(PartyId(1), "B")];
        let d = district(&[], 50);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let r = engine().hold_election(&d, PartyId(0), &parties, date(), &mut rng).unwrap();
        assert_eq!(r.raw_votes.iter().sum::<u32>(), 50);
        assert!(d.results.is_empty());
        assert!(d.standing.is_none());
    }

    #[test]
    fn test_tie_broken_with_single_winner() {
        let parties = vec![Party::new(PartyId(0), "A"), Party::new(PartyId(1), "B")];
        let mut d = district(&[], 200);

        let (winner, tie) = pick_winner(&[100, 100, 3], 0.1, &mut StepRng::new(0, 0));
        assert_eq!(winner, PartyId(0));
        let tie = tie.unwrap();
        assert_eq!(tie.tied, vec![PartyId(0), PartyId(1)]);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let r = engine().run_election(&mut d, PartyId(1), &parties, date(), &mut rng).unwrap();
        let winners = (0..2)
            .filter(|&i| r.share_of(PartyId(i)) >= r.winner_share())
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_shares_sum_to_hundred_and_votes_scaled() {
        let parties = vec![
            Party::new(PartyId(0), "A"),
            Party::new(PartyId(1), "B").with_policy(PolicyKey::AgeGroup(AgeGroup::Young), 3),
            Party::new(PartyId(2), "C"),
        ];
        let mut d = district(&[], 280);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let r = engine().run_election(&mut d, PartyId(0), &parties, date(), &mut rng).unwrap();

        let total: f32 = r.vote_share.iter().sum();
        assert!((total - 100.0).abs() < 1e-3);
        assert_eq!(r.raw_votes.iter().sum::<u32>(), 280);
        // 500,000 / 500 = 1000 per ballot
        assert_eq!(r.total_votes(), 280_000);
        assert_eq!(d.results.len(), 1);
    }

    #[test]
    fn test_standing_margin_sign() {
        let parties = vec![
            Party::new(PartyId(0), "Strong").with_policy(PolicyKey::Density(Density::Urban), 50),
            Party::new(PartyId(1), "Weak"),
        ];
        let e = engine();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let mut d = district(&[], 200);
        e.run_election(&mut d, PartyId(0), &parties, date(), &mut rng).unwrap();
        let s = d.standing.unwrap();
        assert_eq!(s.winner, PartyId(0));
        assert!(s.margin > 0.0);
        assert_eq!(s.player_share, s.winner_share);

        let mut d = district(&[], 200);
        e.run_election(&mut d, PartyId(1), &parties, date(), &mut rng).unwrap();
        let s = d.standing.unwrap();
        assert!(s.margin < 0.0);
        assert!((s.margin - (s.player_share - s.winner_share)).abs() < 1e-5);
    }

    #[test]
    fn test_all_excluded_is_error() {
        let parties = vec![Party::new(PartyId(0), "A")];
        let mut d = district(&[], 200);
        d.modifiers.add(Modifier::new(ModifierType::Exclusion, d.id, PartyId(0), 1, "", ""));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = engine()
            .run_election(&mut d, PartyId(0), &parties, date(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, SimError::NoVotingWeight(DistrictId(0))));
    }

    #[test]
    fn test_preconditions() {
        let mut d = district(&[], 200);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let none: Vec<Party> = Vec::new();
        assert!(matches!(
            engine().run_election(&mut d, PartyId(0), &none, date(), &mut rng),
            Err(SimError::NoParties)
        ));
        let one = vec![Party::new(PartyId(0), "A")];
        assert!(matches!(
            engine().run_election(&mut d, PartyId(4), &one, date(), &mut rng),
            Err(SimError::UnknownParty(PartyId(4)))
        ));
    }

    #[test]
    fn test_modifiers_frozen_into_result() {
        let parties = vec![Party::new(PartyId(0), "A"), Party::new(PartyId(1), "B")];
        let mut d = district(&[], 200);
        d.modifiers.add(Modifier::new(ModifierType::Positive, d.id, PartyId(1), 2, "", ""));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let r = engine().run_election(&mut d, PartyId(0), &parties, date(), &mut rng).unwrap();
        d.on_election_end();
        assert_eq!(r.modifiers[0].remaining_length, 2);
        assert_eq!(d.results[0].modifiers[0].remaining_length, 2);
        assert_eq!(d.modifiers.active()[0].remaining_length, 1);
        // 20 + 30
        assert_eq!(r.scores, vec![20, 50]);
    }
}
