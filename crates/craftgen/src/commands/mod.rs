//! Command implementations

pub mod scaffold;
