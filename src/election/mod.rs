//! Districts, parties and elections
//!
//! A district is founded on a land region and inherits geography traits
//! from its shape and position. Parties hold policy values per trait; the
//! engine turns those into popularity scores and samples voters.

pub mod campaign;
pub mod district;
pub mod engine;
pub mod geography;
pub mod modifier;
pub mod party;
pub mod result;
pub mod traits;

pub use campaign::{Campaign, GeneralElection, LogEntry};
pub use district::{Demographics, District, Standing};
pub use engine::{cast_votes, record_result, ElectionDate, ElectionEngine};
pub use geography::geography_traits;
pub use modifier::{Modifier, ModifierLedger, ModifierType};
pub use party::{Party, Policy, PolicySource};
pub use result::{ElectionResult, TieBreak};
pub use traits::{
    AgeGroup, DefaultTraitSource, Density, EconomyTrait, GeographyTrait, GeographyTraitType,
    Language, Mentality, MentalitySet, PolicyKey, Religion, TraitSource,
};
