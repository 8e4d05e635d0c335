//! hexbridge core - Hex move engine
//!
//! This crate provides the engine behind the `hexbridge` bot:
//! - Board geometry (rhombic grid with four edge sentinels)
//! - Two-bridge tracking as a per-player status state machine
//! - Bidirectional BFS win detection
//! - Least-cost connection search and move ranking

pub mod board;
pub mod bot;
pub mod bridge;
pub mod cell;
pub mod color;
pub mod config;
pub mod coord;
pub mod engine;
pub mod error;
pub mod search;

// Re-exports for convenient access
pub use board::Board;
pub use bot::{Bot, Outcome};
pub use bridge::{Status, TwoBridge};
pub use cell::Cell;
pub use color::{Color, Player};
pub use config::{EngineConfig, Weights, DEFAULT_BOARD_SIZE};
pub use coord::{Coord, Edge, Node, MAX_BOARD_SIZE};
pub use engine::{Candidate, MoveEngine};
pub use error::HexError;
pub use search::{cheapest_connection, cheapest_path, Connection, Link, PathStep};
