//! TetrECS (workspace facade crate).
//!
//! Re-exports the member crates under one roof and adds the greedy autoplayer
//! used by the headless binary.

pub use tetrecs_adapter as adapter;
pub use tetrecs_core as core;
pub use tetrecs_engine as engine;
pub use tetrecs_types as types;

pub mod autoplay;
