//! Per-tick updaters that operate on the shared `GameState`.
//!
//! Each updater is a free `run` function taking `&mut GameState` plus the
//! resources it needs. None of them own state. The `SystemManager` calls
//! them in a fixed order.

pub mod economy;
pub mod enemy;
pub mod particle;
pub mod projectile;
pub mod snapshot;
pub mod tower;
pub mod wave;
