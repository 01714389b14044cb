use thiserror::Error;

use crate::core::types::{DistrictId, NationId, NodeId, PartyId, RegionId};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Geography trait category {0} is outside 1..=3")]
    InvalidTraitCategory(u8),

    #[error("Total voting weight in {0} is not positive")]
    NoVotingWeight(DistrictId),

    #[error("{region} is adjacent to unknown {neighbor}")]
    UnknownRegion { region: RegionId, neighbor: RegionId },

    #[error("Region not found: {0}")]
    RegionNotFound(RegionId),

    #[error("{0} is water and cannot hold a district")]
    NotLand(RegionId),

    #[error("Polygon references unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("Party not in roster: {0}")]
    UnknownParty(PartyId),

    #[error("Election needs at least one party")]
    NoParties,

    #[error("District not found: {0}")]
    UnknownDistrict(DistrictId),

    #[error("Nation not found: {0}")]
    UnknownNation(NationId),

    #[error("{region} already belongs to {owner}")]
    RegionClaimed { region: RegionId, owner: NationId },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
