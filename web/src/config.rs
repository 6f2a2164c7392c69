use core::time::Duration;

use clap::Parser;
use gamehub_core::{Credentials, GameKind, MemoryParams, SessionOptions};
use gloo::storage::{LocalStorage, Storage};

/// Key the login flow stores the token under.
pub(crate) const AUTHORIZATION_KEY: &str = "authorization";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Args {
    /// What log level to use
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Root URL of the game API
    #[arg(long, default_value = "/api")]
    pub api_url: String,

    /// Which game to open
    #[arg(short, long, default_value_t = GameKind::WordSearch)]
    pub game: GameKind,

    /// Number of card pairs in a memory game
    #[arg(long, default_value_t = MemoryParams::default().pairs)]
    pub pairs: u32,

    /// Milliseconds a revealed move stays on screen before the board catches up
    #[arg(long, default_value_t = 2000)]
    pub reveal_delay_ms: u64,
}

impl Args {
    /// Parses `#--game=sudoku&-vv` style location hashes.
    pub(crate) fn from_location_hash(hash: &str) -> Result<Self, clap::Error> {
        let args = hash.split(['#', '&']).filter(|arg| !arg.is_empty());
        Self::try_parse_from(core::iter::once("").chain(args))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ClientConfig {
    pub api_url: String,
    pub game: GameKind,
    pub memory: MemoryParams,
    pub options: SessionOptions,
    pub credentials: Credentials,
}

impl ClientConfig {
    pub(crate) fn new(args: &Args, credentials: Credentials) -> Self {
        Self {
            api_url: args.api_url.clone(),
            game: args.game,
            memory: MemoryParams { pairs: args.pairs },
            options: SessionOptions {
                reveal_delay: Duration::from_millis(args.reveal_delay_ms),
            },
            credentials,
        }
    }
}

/// Reads the token left behind by the login flow. A missing key is not an
/// error here; the session refuses to start without one.
pub(crate) fn stored_credentials() -> Credentials {
    let stored = LocalStorage::raw()
        .get_item(AUTHORIZATION_KEY)
        .ok()
        .flatten();
    if stored.is_none() {
        log::warn!("no {:?} entry in local storage", AUTHORIZATION_KEY);
    }
    Credentials::from_stored(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hash_uses_defaults() {
        let args = Args::from_location_hash("").unwrap();
        let config = ClientConfig::new(&args, Credentials::anonymous());

        assert_eq!(config.api_url, "/api");
        assert_eq!(config.game, GameKind::WordSearch);
        assert_eq!(config.memory.pairs, 10);
        assert_eq!(config.options, SessionOptions::default());
    }

    #[test]
    fn hash_arguments_are_split_on_ampersands() {
        let args =
            Args::from_location_hash("#--game=memory&--pairs=6&--api-url=https://hub.test/api&-vv")
                .unwrap();
        let config = ClientConfig::new(&args, Credentials::new("token"));

        assert_eq!(config.game, GameKind::Memory);
        assert_eq!(config.memory.pairs, 6);
        assert_eq!(config.api_url, "https://hub.test/api");
        assert_eq!(args.verbose.log_level(), Some(log::Level::Info));
    }

    #[test]
    fn games_are_accepted_by_slug_or_route() {
        let by_slug = Args::from_location_hash("#--game=three-in-a-row").unwrap();
        let by_route = Args::from_location_hash("#-g&wordsearch").unwrap();

        assert_eq!(by_slug.game, GameKind::ThreeInARow);
        assert_eq!(by_route.game, GameKind::WordSearch);
    }

    #[test]
    fn reveal_delay_is_configurable() {
        let args = Args::from_location_hash("#--reveal-delay-ms=500").unwrap();
        let config = ClientConfig::new(&args, Credentials::anonymous());

        assert_eq!(config.options.reveal_delay, Duration::from_millis(500));
    }

    #[test]
    fn unknown_games_are_refused() {
        assert!(Args::from_location_hash("#--game=chess").is_err());
    }
}
