//! World events

pub mod expansion;

pub use expansion::NationExpansionEvent;
