// DomainLens - lib.rs
//
// Library entry point for integration tests and headless use.
//
// The `eframe::App` implementation (`gui`) lives in the binary and is not
// part of the library surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
