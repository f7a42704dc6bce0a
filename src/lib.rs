//! famtree: in-memory genealogy trees
//!
//! Layers, innermost first:
//! - `domain`: persons, trees, traversal, rendering and the export visitor
//! - `application`: registry of named trees, script parsing, sessions, CSV export
//! - `infrastructure`: filesystem boundary and service wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
