// DomainLens - ui/panels/mod.rs

pub mod about;
pub mod cards;
pub mod detail;
pub mod filters;
