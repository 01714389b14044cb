pub mod config;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::SimulationConfig;
pub use error::{Result, SimError};
