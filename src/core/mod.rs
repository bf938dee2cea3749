// DomainLens - core/mod.rs
//
// Core business logic layer.
// Dependencies: util, standard library, csv, regex, serde.
// Must NOT depend on: ui, platform, app, or direct filesystem access.

pub mod coerce;
pub mod colour;
pub mod export;
pub mod filter;
pub mod group;
pub mod model;
pub mod schema;
pub mod table;
pub mod view;
