//! Election Tactics - territorial election simulation

pub mod core;
pub mod election;
pub mod history;
pub mod map;
