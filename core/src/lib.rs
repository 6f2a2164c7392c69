pub use gamehub_protocol::{ApiRequest, ApiResponse, GameKind, Method};

pub use elapsed::*;
pub use error::*;
pub use game::*;
pub use games::*;
pub use scheduler::*;
pub use selection::*;
pub use session::*;
pub use transport::*;
pub use types::*;

mod elapsed;
mod error;
mod game;
mod games;
mod scheduler;
mod selection;
mod session;
mod transport;
mod types;
