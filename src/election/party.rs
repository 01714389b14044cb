//! Parties and their policy tables

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::PartyId;
use crate::election::traits::{
    AgeGroup, Density, EconomyTrait, GeographyTraitType, Language, PolicyKey, Religion,
};

/// Read-only policy lookup the election engine scores parties with
pub trait PolicySource {
    /// Alignment of the party with a trait; 0 when the party has no policy on it
    fn policy_value(&self, key: PolicyKey) -> i32;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub key: PolicyKey,
    pub value: i32,
    pub max_value: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    pub name: String,
    pub policies: Vec<Policy>,
}

impl Party {
    pub fn new(id: PartyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            policies: Vec::new(),
        }
    }

    /// Builder form of [`Party::set_policy`] for an unbounded policy
    pub fn with_policy(mut self, key: PolicyKey, value: i32) -> Self {
        self.set_policy(key, value, i32::MAX);
        self
    }

    /// Set a policy value, clamped to `-max_value..=max_value`
    pub fn set_policy(&mut self, key: PolicyKey, value: i32, max_value: i32) {
        let bound = max_value.saturating_abs();
        let value = value.clamp(-bound, bound);
        match self.policies.iter_mut().find(|p| p.key == key) {
            Some(policy) => {
                policy.value = value;
                policy.max_value = max_value;
            }
            None => self.policies.push(Policy {
                key,
                value,
                max_value,
            }),
        }
    }

    /// A party with random values on every trait in the given language/religion domain
    pub fn random<R: Rng>(
        id: PartyId,
        name: impl Into<String>,
        languages: &[Language],
        religions: &[Religion],
        max_value: i32,
        rng: &mut R,
    ) -> Self {
        let mut party = Self::new(id, name);
        let keys = GeographyTraitType::ALL
            .iter()
            .map(|&t| PolicyKey::Geography(t))
            .chain(EconomyTrait::ALL.iter().map(|&t| PolicyKey::Economy(t)))
            .chain(Density::ALL.iter().map(|&t| PolicyKey::Density(t)))
            .chain(AgeGroup::ALL.iter().map(|&t| PolicyKey::AgeGroup(t)))
            .chain(languages.iter().map(|&l| PolicyKey::Language(l)))
            .chain(religions.iter().map(|&r| PolicyKey::Religion(r)));
        for key in keys {
            let value = rng.gen_range(0..=max_value);
            party.set_policy(key, value, max_value);
        }
        party
    }
}

impl PolicySource for Party {
    fn policy_value(&self, key: PolicyKey) -> i32 {
        self.policies
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value)
            .unwrap_or(0)
    }
}
