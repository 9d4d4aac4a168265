//! Game core: track pool, question generation, and session scoring.

pub mod pool;
pub mod question;
pub mod session;
pub mod track;

pub use pool::{CatalogClient, CatalogSelector, LoadedPool, PoolSource};
pub use question::GameQuestion;
pub use session::{GameError, GameSession, GameSettings, RoundResult};
pub use track::Track;
