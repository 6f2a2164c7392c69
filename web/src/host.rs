use std::rc::Rc;

use gamehub_core::*;
use gloo::timers::callback::{Interval, Timeout};
use web_time::Instant;
use yew::prelude::*;

use crate::boards::BoardView;
use crate::config::ClientConfig;
use crate::transport;

type Reply = core::result::Result<ApiResponse, TransportError>;

pub(crate) enum Msg<G: BoardView> {
    Started { generation: u64, reply: Reply },
    Input(G::Input),
    Responded {
        generation: u64,
        ticket: Ticket,
        reply: Reply,
    },
    Fire { generation: u64, id: TaskId },
    UpdateTime,
    NewGame,
}

#[derive(Properties, PartialEq)]
pub(crate) struct HostProps {
    pub config: Rc<ClientConfig>,
}

/// Owns one game session together with the browser resources driving it.
/// Dropping the component drops every timer and closes the session.
pub(crate) struct GameHost<G: BoardView> {
    session: Option<Session<G>>,
    pending: Option<PendingStart<G>>,
    generation: u64,
    error: Option<String>,
    prev_time: u64,
    timeouts: Vec<(TaskId, Timeout)>,
    timer_interval: Option<Interval>,
}

impl<G: BoardView> GameHost<G> {
    fn start(&mut self, ctx: &Context<Self>) {
        self.teardown();
        self.generation += 1;
        self.prev_time = 0;

        let config = &ctx.props().config;
        let params = G::start_params(config);
        let pending = match PendingStart::<G>::begin_with(&config.credentials, &params, config.options) {
            Ok(pending) => pending,
            Err(err) => {
                self.report(err);
                return;
            }
        };

        let api_url = config.api_url.clone();
        let outbound = pending.outbound().clone();
        let generation = self.generation;
        ctx.link().send_future(async move {
            let reply = transport::send(&api_url, &outbound).await;
            Msg::Started { generation, reply }
        });
        self.pending = Some(pending);
    }

    fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
        }
        self.pending = None;
        self.timeouts.clear();
        self.timer_interval = None;
    }

    fn dispatch(&self, ctx: &Context<Self>, outbound: Outbound) {
        let api_url = ctx.props().config.api_url.clone();
        let generation = self.generation;
        ctx.link().send_future(async move {
            let reply = transport::send(&api_url, &outbound).await;
            Msg::Responded {
                generation,
                ticket: outbound.ticket,
                reply,
            }
        });
    }

    fn schedule(&mut self, ctx: &Context<Self>, task: ScheduledTask) {
        let link = ctx.link().clone();
        let (generation, id) = (self.generation, task.id);
        let timeout = Timeout::new(task.delay_millis(), move || {
            link.send_message(Msg::Fire { generation, id })
        });
        self.timeouts.push((id, timeout));
    }

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(1000, move || link.send_message(Msg::UpdateTime))
    }

    fn report(&mut self, err: SyncError) {
        log::error!("{} error: {}", G::KIND, err);
        self.error = Some(match err {
            SyncError::Auth(_) => format!("{err}. Please sign in again."),
            _ => err.to_string(),
        });
    }

    /// Stops the 1 Hz tick once the clock no longer moves.
    fn sync_timer(&mut self, ctx: &Context<Self>) {
        let running = self
            .session
            .as_ref()
            .is_some_and(|session| session.is_clock_running());
        match (running, self.timer_interval.is_some()) {
            (true, false) => self.timer_interval = Some(Self::create_timer(ctx)),
            (false, true) => {
                self.timer_interval = None;
                self.settle_clock(Instant::now());
            }
            _ => {}
        }
    }

    /// The frozen time can be ahead of the last tick.
    fn settle_clock(&mut self, now: Instant) {
        if let Some(session) = &self.session {
            self.prev_time = session.elapsed_secs(now);
        }
    }

    fn on_started(&mut self, generation: u64, reply: Reply) -> bool {
        if generation != self.generation {
            log::debug!("dropping stale start of generation {}", generation);
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };
        match pending.finish(reply, Instant::now()) {
            Ok(session) => {
                self.error = None;
                self.session = Some(session);
            }
            Err(err) => self.report(err),
        }
        true
    }

    fn on_input(&mut self, ctx: &Context<Self>, input: G::Input) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        log::trace!("{} input {:?}", G::KIND, input);
        match G::handle(session, input) {
            Ok(Some(outbound)) => {
                self.error = None;
                self.dispatch(ctx, outbound);
            }
            Ok(None) => {}
            Err(err) => self.report(err),
        }
        true
    }

    fn on_response(&mut self, ctx: &Context<Self>, ticket: Ticket, reply: Reply) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match session.resolve(ticket, reply, Instant::now()) {
            Ok(Resolution::Settled) => {}
            Ok(Resolution::Deferred(task)) => self.schedule(ctx, task),
            Ok(Resolution::Ignored) => return false,
            Err(err) => self.report(err),
        }
        true
    }

    fn on_fire(&mut self, ctx: &Context<Self>, id: TaskId) -> bool {
        self.timeouts.retain(|(pending, _)| *pending != id);
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match session.fire(id, Instant::now()) {
            Fired::Applied => true,
            Fired::Fetch(outbound) => {
                self.dispatch(ctx, outbound);
                false
            }
            Fired::Ignored => false,
        }
    }

    fn on_update_time(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match session.poll_clock(Instant::now()) {
            Some(secs) => {
                self.prev_time = secs;
                true
            }
            None => false,
        }
    }
}

fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

impl<G: BoardView> Component for GameHost<G> {
    type Message = Msg<G>;
    type Properties = HostProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut host = Self {
            session: None,
            pending: None,
            generation: 0,
            error: None,
            prev_time: 0,
            timeouts: Vec::new(),
            timer_interval: None,
        };
        host.start(ctx);
        host
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            Started { generation, reply } => self.on_started(generation, reply),
            Input(input) => self.on_input(ctx, input),
            Responded { generation, .. } | Fire { generation, .. }
                if generation != self.generation =>
            {
                log::debug!("dropping message from generation {}", generation);
                false
            }
            Responded { ticket, reply, .. } => self.on_response(ctx, ticket, reply),
            Fire { id, .. } => self.on_fire(ctx, id),
            UpdateTime => self.on_update_time(),
            NewGame => {
                self.start(ctx);
                true
            }
        };
        self.sync_timer(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::NewGame
        });
        let onaction = ctx.link().callback(Msg::Input);

        let (status, board) = match &self.session {
            Some(session) => (G::status(session), G::render(session, &onaction)),
            None if self.pending.is_some() => ("Starting...".to_string(), Html::default()),
            None => (String::new(), Html::default()),
        };
        let game_class = self.session.as_ref().map(|session| {
            if session.is_end_of_game() {
                "finished"
            } else if session.is_busy() {
                "busy"
            } else {
                "in-progress"
            }
        });

        html! {
            <div class={classes!("gamehub", G::KIND.slug(), game_class)}>
                <nav>
                    <strong>{G::KIND.title()}</strong>
                    <span><button onclick={cb_new_game}>{"New game"}</button></span>
                    <aside>{format_time(self.prev_time)}</aside>
                </nav>
                <p class="status">{status}</p>
                {
                    for self.error.iter().map(|error| html! {
                        <p class="error">{error.clone()}</p>
                    })
                }
                {board}
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        log::debug!("{} view destroyed", G::KIND);
        self.teardown();
    }
}
