use bitflags::bitflags;
use gamehub_core::*;
use yew::prelude::*;

use crate::config::ClientConfig;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub(crate) struct CellFlags: u8 {
        const LOCKED   = 1;
        const SHOWN    = 1 << 1;
        const SELECTED = 1 << 2;
        const FOUND    = 1 << 3;
        const WINNING  = 1 << 4;
        const FIXED    = 1 << 5;
        const FLAGGED  = 1 << 6;
        const MINE     = 1 << 7;
    }
}

impl CellFlags {
    pub(crate) fn classes(self) -> Classes {
        let mut classes = classes!("cell");
        for (name, _) in self.iter_names() {
            classes.push(name.to_lowercase());
        }
        classes
    }

    /// Locked cells get no listener, so clicks during a pending request
    /// never reach the session.
    pub(crate) fn listener<E>(self, callback: Callback<E>) -> Option<Callback<E>> {
        (!self.contains(Self::LOCKED)).then_some(callback)
    }
}

/// Rendering and input handling for one game inside [`crate::host::GameHost`].
pub(crate) trait BoardView: Game + 'static {
    type Input: Clone + core::fmt::Debug + 'static;

    fn start_params(config: &ClientConfig) -> Self::StartParams;

    /// Applies one user input, returning the request to send if any.
    fn handle(session: &mut Session<Self>, input: Self::Input) -> Result<Option<Outbound>>;

    fn status(session: &Session<Self>) -> String;

    fn render(session: &Session<Self>, onaction: &Callback<Self::Input>) -> Html;
}

fn locked(session: &Session<impl Game>) -> CellFlags {
    if session.is_playable() {
        CellFlags::empty()
    } else {
        CellFlags::LOCKED
    }
}

fn rows_of(size: Coord2, cell: impl Fn(Coord2) -> Html) -> Html {
    let (rows, cols) = size;
    html! {
        <table>
            {
                for (0..rows).map(|row| html! {
                    <tr>{ for (0..cols).map(|col| cell((row, col))) }</tr>
                })
            }
        </table>
    }
}

impl BoardView for ThreeInARow {
    type Input = ThreeInARowAction;

    fn start_params(_config: &ClientConfig) {}

    fn handle(session: &mut Session<Self>, input: ThreeInARowAction) -> Result<Option<Outbound>> {
        session.submit(input).map(Some)
    }

    fn status(session: &Session<Self>) -> String {
        match session.view().outcome() {
            None if session.is_busy() => "Opponent is thinking...".to_string(),
            None => "Your turn".to_string(),
            Some(Outcome::UserWon) => "You won!".to_string(),
            Some(Outcome::OpponentWon) => "You lost".to_string(),
            Some(Outcome::Draw) => "Draw".to_string(),
        }
    }

    fn render(session: &Session<Self>, onaction: &Callback<ThreeInARowAction>) -> Html {
        let state = session.view();
        let locked = locked(session);

        rows_of(state.size(), |coords| {
            let mut flags = locked;
            flags.set(CellFlags::WINNING, state.is_winning(coords));
            let mark = match state.occupant(coords) {
                Occupant::Empty => "",
                Occupant::User => "X",
                Occupant::Opponent => "O",
            };
            let onclick = flags.listener(onaction.reform(move |_: MouseEvent| ThreeInARowAction::Play(coords)));
            html! { <td class={flags.classes()} {onclick}>{mark}</td> }
        })
    }
}

impl BoardView for Memory {
    type Input = MemoryAction;

    fn start_params(config: &ClientConfig) -> MemoryParams {
        config.memory
    }

    fn handle(session: &mut Session<Self>, input: MemoryAction) -> Result<Option<Outbound>> {
        session.submit(input).map(Some)
    }

    fn status(session: &Session<Self>) -> String {
        let state = session.view();
        match state.game_time() {
            Some(time) if state.is_end_of_game() => {
                format!("Done in {} moves ({})", state.moves(), time)
            }
            _ => format!("Moves: {}", state.moves()),
        }
    }

    fn render(session: &Session<Self>, onaction: &Callback<MemoryAction>) -> Html {
        let state = session.view();
        let locked = locked(session);
        let width = state.grid_width().max(1);

        html! {
            <table class="memory">
                {
                    for state.cards().chunks(width).enumerate().map(|(row, cards)| html! {
                        <tr>
                            {
                                for cards.iter().enumerate().map(|(col, card)| {
                                    let position = row * width + col;
                                    let mut flags = locked;
                                    flags.set(CellFlags::SHOWN, card.is_shown());
                                    let onclick = flags.listener(onaction.reform(move |_: MouseEvent| MemoryAction::Flip(position)));
                                    let face = card.face_value().map(|value| value.to_string()).unwrap_or_default();
                                    html! { <td class={flags.classes()} {onclick}>{face}</td> }
                                })
                            }
                        </tr>
                    })
                }
            </table>
        }
    }
}

impl BoardView for Minesweeper {
    type Input = MinesweeperAction;

    fn start_params(_config: &ClientConfig) {}

    fn handle(session: &mut Session<Self>, input: MinesweeperAction) -> Result<Option<Outbound>> {
        session.submit(input).map(Some)
    }

    fn status(session: &Session<Self>) -> String {
        let state = session.view();
        match (state.is_end_of_game(), state.is_win()) {
            (true, true) => "Cleared!".to_string(),
            (true, false) => "Boom".to_string(),
            (false, _) => format!("Mines left: {}", state.mines_left()),
        }
    }

    fn render(session: &Session<Self>, onaction: &Callback<MinesweeperAction>) -> Html {
        let state = session.view();
        let locked = locked(session);

        rows_of(state.size(), |coords| {
            let cell = state.cell(coords);
            let mut flags = locked;
            flags.set(CellFlags::SHOWN, cell.state == RevealState::Revealed);
            flags.set(CellFlags::FLAGGED, cell.state == RevealState::Flagged);
            flags.set(
                CellFlags::MINE,
                cell.is_mine && cell.state == RevealState::Revealed,
            );
            let text = match cell.state {
                RevealState::Revealed if !cell.is_mine && cell.neighbor_mines > 0 => {
                    cell.neighbor_mines.to_string()
                }
                _ => String::new(),
            };
            let onclick = flags.listener(onaction.reform(move |_: MouseEvent| MinesweeperAction::Reveal(coords)));
            let oncontextmenu = flags.listener(onaction.reform(move |e: MouseEvent| {
                e.prevent_default();
                MinesweeperAction::ToggleFlag(coords)
            }));
            html! { <td class={flags.classes()} {onclick} {oncontextmenu}>{text}</td> }
        })
    }
}

#[derive(Properties, PartialEq)]
struct SudokuBoardProps {
    state: Sudoku,
    locked: bool,
    onaction: Callback<SudokuAction>,
}

#[function_component(SudokuBoard)]
fn sudoku_board(props: &SudokuBoardProps) -> Html {
    let selected = use_state(|| None::<Coord2>);
    let state = &props.state;

    let board = rows_of(state.size(), |coords| {
        let cell = state.cell(coords);
        let mut flags = if props.locked {
            CellFlags::LOCKED
        } else {
            CellFlags::empty()
        };
        flags.set(CellFlags::FIXED, cell.is_fixed());
        flags.set(CellFlags::SELECTED, *selected == Some(coords));
        let text = cell
            .value()
            .map(|digit| digit.get().to_string())
            .unwrap_or_default();
        let onclick = {
            let selected = selected.clone();
            Callback::from(move |_: MouseEvent| selected.set(Some(coords)))
        };
        html! { <td class={flags.classes()} {onclick}>{text}</td> }
    });

    let digits = (1..=9u8).map(|value| {
        let onclick = {
            let selected = selected.clone();
            let filtered = props.onaction.filter_reform(move |_: MouseEvent| {
                (*selected).map(|coords| SudokuAction::Place { coords, value })
            });
            Callback::from(move |event: MouseEvent| {
                filtered.emit(event);
            })
        };
        html! { <button {onclick} disabled={props.locked}>{value.to_string()}</button> }
    });

    html! {
        <>
            {board}
            <nav class="digits">{ for digits }</nav>
        </>
    }
}

impl BoardView for Sudoku {
    type Input = SudokuAction;

    fn start_params(_config: &ClientConfig) {}

    fn handle(session: &mut Session<Self>, input: SudokuAction) -> Result<Option<Outbound>> {
        session.submit(input).map(Some)
    }

    fn status(session: &Session<Self>) -> String {
        if session.is_end_of_game() {
            "Solved!".to_string()
        } else if session.is_busy() {
            "Checking...".to_string()
        } else {
            "Pick a cell, then a number".to_string()
        }
    }

    fn render(session: &Session<Self>, onaction: &Callback<SudokuAction>) -> Html {
        html! {
            <SudokuBoard
                state={session.view().clone()}
                locked={!session.is_playable()}
                onaction={onaction.clone()}
            />
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum WordInput {
    Tap(Coord2),
    Confirm,
    Cancel,
}

impl BoardView for WordSearch {
    type Input = WordInput;

    fn start_params(_config: &ClientConfig) {}

    fn handle(session: &mut Session<Self>, input: WordInput) -> Result<Option<Outbound>> {
        match input {
            WordInput::Tap(coords) => {
                let outcome = session.tap(coords);
                log::trace!("tap {:?}: {:?}", coords, outcome);
                Ok(None)
            }
            WordInput::Confirm => session.confirm().map(Some),
            WordInput::Cancel => {
                session.cancel_selection();
                Ok(None)
            }
        }
    }

    fn status(session: &Session<Self>) -> String {
        let state = session.view();
        let found = state.found_words().len();
        let total = state.words().len();
        match (state.is_end_of_game(), state.is_user_winner()) {
            (true, true) => format!("All {} words found!", total),
            (true, false) => "Game over".to_string(),
            (false, _) if !session.selection().is_idle() => {
                format!("Selected: {}", session.selection().word())
            }
            (false, _) => format!("Found {}/{}", found, total),
        }
    }

    fn render(session: &Session<Self>, onaction: &Callback<WordInput>) -> Html {
        let state = session.view();
        let selection = session.selection();
        let locked = locked(session);

        let board = rows_of(state.size(), |coords| {
            let mut flags = locked;
            flags.set(CellFlags::FOUND, state.is_found(coords));
            flags.set(CellFlags::SELECTED, selection.contains(coords));
            let letter = state.letter(coords).unwrap_or_default().to_string();
            let onclick = flags.listener(onaction.reform(move |_: MouseEvent| WordInput::Tap(coords)));
            html! { <td class={flags.classes()} {onclick}>{letter}</td> }
        });

        let words = state.words().iter().map(|word| {
            let class = state.is_word_found(word).then_some("found");
            html! { <li {class}>{word.clone()}</li> }
        });
        let idle = selection.is_idle();

        html! {
            <>
                {board}
                <nav>
                    <button onclick={onaction.reform(|_: MouseEvent| WordInput::Confirm)} disabled={idle || !session.is_playable()}>{"Confirm"}</button>
                    <button onclick={onaction.reform(|_: MouseEvent| WordInput::Cancel)} disabled={idle}>{"Cancel"}</button>
                </nav>
                <ul class="words">{ for words }</ul>
            </>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_become_lowercase_classes() {
        let classes = (CellFlags::SELECTED | CellFlags::FOUND).classes();

        assert!(classes.contains("cell"));
        assert!(classes.contains("selected"));
        assert!(classes.contains("found"));
        assert!(!classes.contains("locked"));
    }

    #[test]
    fn locked_cells_take_no_clicks() {
        let callback = Callback::from(|_: MouseEvent| ());

        assert!(CellFlags::SHOWN.listener(callback.clone()).is_some());
        assert!((CellFlags::LOCKED | CellFlags::SHOWN).listener(callback).is_none());
    }

    #[test]
    fn word_search_inputs_drive_the_selection() {
        let pending = PendingStart::<WordSearch>::begin(&Credentials::new("t"), &()).unwrap();
        let mut session = pending
            .finish(
                Ok(ApiResponse::ok(r#"{"board":[["o","k"]],"words":["ok"]}"#)),
                web_time::Instant::now(),
            )
            .unwrap();

        assert_eq!(WordSearch::handle(&mut session, WordInput::Tap((0, 0))), Ok(None));
        assert_eq!(WordSearch::handle(&mut session, WordInput::Tap((0, 1))), Ok(None));
        assert_eq!(WordSearch::status(&session), "Selected: ok");

        let outbound = WordSearch::handle(&mut session, WordInput::Confirm)
            .unwrap()
            .unwrap();
        assert_eq!(outbound.request.path(), "wordsearch/select-word");
        assert_eq!(WordSearch::status(&session), "Found 0/1");
    }
}
