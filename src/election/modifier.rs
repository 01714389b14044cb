//! Modifiers - temporary effects on one party in one district

use serde::{Deserialize, Serialize};

use crate::core::types::{DistrictId, PartyId};
use crate::election::traits::{Mentality, MentalitySet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierType {
    /// Adds a fixed bonus to the party's score
    Positive,
    /// Subtracts a fixed penalty from the party's score
    Negative,
    /// Sets the party's score to zero
    Exclusion,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub kind: ModifierType,
    pub district: DistrictId,
    pub party: PartyId,
    /// Number of elections the modifier lasts
    pub total_length: u32,
    pub remaining_length: u32,
    pub description: String,
    pub source: String,
}

impl Modifier {
    pub fn new(
        kind: ModifierType,
        district: DistrictId,
        party: PartyId,
        length: u32,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            district,
            party,
            total_length: length,
            remaining_length: length,
            description: description.into(),
            source: source.into(),
        }
    }
}

/// Active modifiers of a district
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierLedger {
    modifiers: Vec<Modifier>,
}

impl ModifierLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    pub fn active(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Count one election off every modifier and drop the expired ones
    pub fn decay(&mut self) {
        for modifier in &mut self.modifiers {
            modifier.remaining_length = modifier.remaining_length.saturating_sub(1);
        }
        self.modifiers.retain(|m| m.remaining_length > 0);
    }
}

/// One-election modifiers a district's mentalities attach to the last winner.
///
/// Stable, Rebellious and Revolutionary trigger independently.
pub fn mentality_modifiers(
    district: DistrictId,
    mentalities: &MentalitySet,
    winner: Option<PartyId>,
) -> Vec<Modifier> {
    let Some(winner) = winner else {
        return Vec::new();
    };

    let mut added = Vec::new();
    if mentalities.contains(Mentality::Stable) {
        added.push(Modifier::new(
            ModifierType::Positive,
            district,
            winner,
            1,
            "Bonus for winning last election",
            "Stable Mentality",
        ));
    }
    if mentalities.contains(Mentality::Rebellious) {
        added.push(Modifier::new(
            ModifierType::Negative,
            district,
            winner,
            1,
            "Malus for winning last election",
            "Rebellious Mentality",
        ));
    }
    if mentalities.contains(Mentality::Revolutionary) {
        added.push(Modifier::new(
            ModifierType::Exclusion,
            district,
            winner,
            1,
            "Excluded for winning last election",
            "Revolutionary Mentality",
        ));
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modifier(length: u32) -> Modifier {
        Modifier::new(ModifierType::Positive, DistrictId(0), PartyId(0), length, "test", "test")
    }

    #[test]
    fn test_decay_drops_expired() {
        let mut ledger = ModifierLedger::new();
        ledger.add(modifier(1));
        ledger.add(modifier(3));
        ledger.decay();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.active()[0].remaining_length, 2);
        assert_eq!(ledger.active()[0].total_length, 3);
    }

    #[test]
    fn test_decay_on_empty_ledger() {
        let mut ledger = ModifierLedger::new();
        ledger.decay();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_zero_length_modifier_expires_immediately() {
        let mut ledger = ModifierLedger::new();
        ledger.add(modifier(0));
        ledger.decay();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_mentality_modifiers_without_winner() {
        let set: MentalitySet = [Mentality::Stable].into_iter().collect();
        assert!(mentality_modifiers(DistrictId(1), &set, None).is_empty());
    }

    #[test]
    fn test_contradictory_mentalities_trigger_independently() {
        let set: MentalitySet = [Mentality::Stable, Mentality::Revolutionary, Mentality::Secular]
            .into_iter()
            .collect();
        let added = mentality_modifiers(DistrictId(1), &set, Some(PartyId(2)));
        let kinds: Vec<ModifierType> = added.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![ModifierType::Positive, ModifierType::Exclusion]);
        assert!(added.iter().all(|m| m.party == PartyId(2) && m.remaining_length == 1));
    }
}
