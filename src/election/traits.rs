//! District trait domains
//!
//! Every trait a district can carry, and the key a party's policy table is
//! looked up by.

use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GeographyTraitType {
    Coastal,
    Landlocked,
    Island,
    Tiny,
    Large,
    Northern,
    Southern,
    Eastern,
    Western,
    Lakeside,
}

impl GeographyTraitType {
    pub const ALL: [GeographyTraitType; 10] = [
        GeographyTraitType::Coastal,
        GeographyTraitType::Landlocked,
        GeographyTraitType::Island,
        GeographyTraitType::Tiny,
        GeographyTraitType::Large,
        GeographyTraitType::Northern,
        GeographyTraitType::Southern,
        GeographyTraitType::Eastern,
        GeographyTraitType::Western,
        GeographyTraitType::Lakeside,
    ];
}

/// A geography trait with its severity category (3 strongest, 1 weakest)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeographyTrait {
    pub kind: GeographyTraitType,
    pub category: u8,
}

impl GeographyTrait {
    pub fn new(kind: GeographyTraitType, category: u8) -> Result<Self> {
        if !(1..=3).contains(&category) {
            return Err(SimError::InvalidTraitCategory(category));
        }
        Ok(Self { kind, category })
    }
}

impl fmt::Display for GeographyTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.kind, "I".repeat(self.category as usize))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EconomyTrait {
    Agriculture,
    Fishing,
    Forestry,
    Mining,
    Manufacturing,
    Trade,
    Tourism,
    Finance,
    Technology,
    Services,
}

impl EconomyTrait {
    pub const ALL: [EconomyTrait; 10] = [
        EconomyTrait::Agriculture,
        EconomyTrait::Fishing,
        EconomyTrait::Forestry,
        EconomyTrait::Mining,
        EconomyTrait::Manufacturing,
        EconomyTrait::Trade,
        EconomyTrait::Tourism,
        EconomyTrait::Finance,
        EconomyTrait::Technology,
        EconomyTrait::Services,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Density {
    Urban,
    Mixed,
    Rural,
}

impl Density {
    pub const ALL: [Density; 3] = [Density::Urban, Density::Mixed, Density::Rural];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Young,
    MiddleAged,
    Retired,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 3] = [AgeGroup::Young, AgeGroup::MiddleAged, AgeGroup::Retired];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Language(pub u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Religion(pub u16);

/// Behavioural district trait
///
/// Pairs that contradict each other: Predictable / Unpredictable,
/// Decided / Undecided, Linguistic / Nonlinguistic, Religious / Secular,
/// and any two of Stable / Rebellious / Revolutionary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mentality {
    /// High turnout
    Predictable,
    /// Low turnout
    Unpredictable,
    Decided,
    Undecided,
    Linguistic,
    Nonlinguistic,
    Religious,
    Secular,
    Stable,
    Rebellious,
    Revolutionary,
}

impl Mentality {
    pub const ALL: [Mentality; 11] = [
        Mentality::Predictable,
        Mentality::Unpredictable,
        Mentality::Decided,
        Mentality::Undecided,
        Mentality::Linguistic,
        Mentality::Nonlinguistic,
        Mentality::Religious,
        Mentality::Secular,
        Mentality::Stable,
        Mentality::Rebellious,
        Mentality::Revolutionary,
    ];

    fn group(self) -> u8 {
        match self {
            Mentality::Predictable | Mentality::Unpredictable => 0,
            Mentality::Decided | Mentality::Undecided => 1,
            Mentality::Linguistic | Mentality::Nonlinguistic => 2,
            Mentality::Religious | Mentality::Secular => 3,
            Mentality::Stable | Mentality::Rebellious | Mentality::Revolutionary => 4,
        }
    }

    /// Two different mentalities of the same group contradict each other
    pub fn conflicts_with(self, other: Mentality) -> bool {
        self != other && self.group() == other.group()
    }
}

/// Ordered mentality list of a district.
///
/// Duplicates and contradictions are stored as given; consumers resolve
/// contradictions by checking in a fixed order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentalitySet(Vec<Mentality>);

impl MentalitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mentality: Mentality) {
        self.0.push(mentality);
    }

    pub fn contains(&self, mentality: Mentality) -> bool {
        self.0.contains(&mentality)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mentality> {
        self.0.iter()
    }

    /// Whether `candidate` is neither held nor contradicts a held mentality
    pub fn accepts(&self, candidate: Mentality) -> bool {
        self.0
            .iter()
            .all(|&m| m != candidate && !m.conflicts_with(candidate))
    }
}

impl FromIterator<Mentality> for MentalitySet {
    fn from_iter<I: IntoIterator<Item = Mentality>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Key of a party policy lookup
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PolicyKey {
    Geography(GeographyTraitType),
    Economy(EconomyTrait),
    Density(Density),
    AgeGroup(AgeGroup),
    Language(Language),
    Religion(Religion),
}

/// Supplies the randomised traits a district is built with
pub trait TraitSource {
    fn random_economy_trait(&mut self, rng: &mut dyn RngCore) -> EconomyTrait;

    /// Pick one more mentality for a district that already holds `held`
    fn mentality_for(&mut self, held: &MentalitySet, rng: &mut dyn RngCore) -> Mentality;
}

/// Uniform economy draws; mentalities never repeat or contradict
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTraitSource;

impl TraitSource for DefaultTraitSource {
    fn random_economy_trait(&mut self, rng: &mut dyn RngCore) -> EconomyTrait {
        EconomyTrait::ALL[rng.gen_range(0..EconomyTrait::ALL.len())]
    }

    fn mentality_for(&mut self, held: &MentalitySet, rng: &mut dyn RngCore) -> Mentality {
        let candidates: Vec<Mentality> = Mentality::ALL
            .iter()
            .copied()
            .filter(|&m| held.accepts(m))
            .collect();
        match candidates.choose(rng) {
            Some(&m) => m,
            None => Mentality::ALL[rng.gen_range(0..Mentality::ALL.len())],
        }
    }
}
