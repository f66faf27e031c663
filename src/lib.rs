pub mod board;
pub mod config;
pub mod driver;
pub mod game;
pub mod search;

pub use board::{Board, Direction};
pub use config::EngineConfig;
pub use search::Expectimax;
