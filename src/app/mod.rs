// DomainLens - app/mod.rs
//
// Application layer: orchestration and state management.
// Dependencies: core layer, platform (dataset reads, validated config).
// Must NOT depend on: ui.

pub mod load;
pub mod state;
