use std::rc::Rc;

use gamehub_core::{GameKind, Memory, Minesweeper, Sudoku, ThreeInARow, WordSearch};
use wasm_bindgen::prelude::*;
use yew::prelude::*;

mod boards;
mod config;
mod host;
mod transport;

use config::{Args, ClientConfig};
use host::GameHost;

#[derive(Properties, PartialEq)]
struct AppProps {
    config: Rc<ClientConfig>,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let config = props.config.clone();
    match config.game {
        GameKind::ThreeInARow => html! { <GameHost<ThreeInARow> {config}/> },
        GameKind::Memory => html! { <GameHost<Memory> {config}/> },
        GameKind::Sudoku => html! { <GameHost<Sudoku> {config}/> },
        GameKind::Minesweeper => html! { <GameHost<Minesweeper> {config}/> },
        GameKind::WordSearch => html! { <GameHost<WordSearch> {config}/> },
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::from_location_hash(&location_hash).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }

    let config = ClientConfig::new(&args, config::stored_credentials());
    log::debug!("api: {}, game: {}", config.api_url, config.game);

    let root = document()
        .get_element_by_id("game")
        .expect("Could not find id=\"game\" element");

    log::debug!("App started");
    yew::Renderer::<App>::with_root_and_props(
        root,
        AppProps {
            config: Rc::new(config),
        },
    )
    .render();
}
