//! Wire contract shared by the Game Hub client and its game server.
//!
//! Everything here mirrors the JSON the server speaks. Interpretation of these
//! shapes (normalization, validation, reconciliation) lives in `gamehub-core`.

pub use payload::*;
pub use route::*;

mod payload;
mod route;
