//! Core types and definitions for the Grovewatch simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! entity records, game state, snapshots, commands, events, configuration
//! tables, and constants. It holds no per-tick simulation logic.

pub mod commands;
pub mod config;
pub mod constants;
pub mod entities;
pub mod enums;
pub mod error;
pub mod events;
pub mod geometry;
pub mod map;
pub mod snapshot;
pub mod state;
pub mod types;
pub mod wave;
