use core::marker::PhantomData;
use core::time::Duration;

use gamehub_protocol::{ApiRequest, ApiResponse, GameKind};
use web_time::Instant;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub reveal_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            reveal_delay: REVEAL_DELAY,
        }
    }
}

/// A start request waiting for its response. No session exists yet.
#[derive(Debug)]
pub struct PendingStart<G: Game> {
    outbound: Outbound,
    options: SessionOptions,
    _game: PhantomData<G>,
}

impl<G: Game> PendingStart<G> {
    /// Refuses without producing any request when no token is available.
    pub fn begin(credentials: &Credentials, params: &G::StartParams) -> Result<Self> {
        Self::begin_with(credentials, params, SessionOptions::default())
    }

    pub fn begin_with(
        credentials: &Credentials,
        params: &G::StartParams,
        options: SessionOptions,
    ) -> Result<Self> {
        let authorization = credentials.authorization()?;
        log::debug!("starting {} with {:?}", G::KIND, params);

        Ok(Self {
            outbound: Outbound {
                ticket: Ticket(0),
                request: G::start_request(params),
                authorization,
            },
            options,
            _game: PhantomData,
        })
    }

    pub fn outbound(&self) -> &Outbound {
        &self.outbound
    }

    /// Builds the session from the start response. The play clock starts at `now`.
    pub fn finish(
        self,
        result: core::result::Result<ApiResponse, TransportError>,
        now: Instant,
    ) -> Result<Session<G>> {
        let body = classify(result)?;
        let state = G::decode(&body)?;
        log::debug!("{} started", G::KIND);

        let mut session = Session {
            authorization: self.outbound.authorization,
            options: self.options,
            state,
            provisional: None,
            local: G::Local::default(),
            clock: ElapsedTracker::started(now),
            scheduler: RevealScheduler::new(),
            in_flight: None,
            next_ticket: 1,
            closed: false,
        };
        if session.state.is_end_of_game() {
            session.clock.freeze(now);
        }
        Ok(session)
    }
}

/// Work queued for the second phase of a two-phase turn.
#[derive(Clone, Debug)]
pub enum SecondPhase<G> {
    Apply(G),
    Fetch(ApiRequest),
}

#[derive(Clone, Debug)]
enum InFlight<G: Game> {
    Action {
        ticket: Ticket,
        action: G::Action,
        follow_up: FollowUp,
    },
    /// Waiting for the reveal timer; the guard stays held.
    Waiting { task: TaskId },
    Refetch { ticket: Ticket },
}

impl<G: Game> InFlight<G> {
    fn ticket(&self) -> Option<Ticket> {
        match self {
            Self::Action { ticket, .. } | Self::Refetch { ticket } => Some(*ticket),
            Self::Waiting { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The authoritative state was updated and the session accepts moves again.
    Settled,
    /// The second phase must run once `ScheduledTask` fires; moves stay blocked.
    Deferred(ScheduledTask),
    /// The response belonged to nothing current and was dropped.
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fired {
    Applied,
    Fetch(Outbound),
    Ignored,
}

/// Client-side view of one authoritative game.
///
/// Holds the last state the server sent, an optional provisional view shown
/// while a move is outstanding, and the single-flight guard: at most one
/// mutating request (including its delayed second phase) runs at a time.
#[derive(Debug)]
pub struct Session<G: Game> {
    authorization: AuthToken,
    options: SessionOptions,
    state: G,
    provisional: Option<G>,
    local: G::Local,
    clock: ElapsedTracker,
    scheduler: RevealScheduler<SecondPhase<G>>,
    in_flight: Option<InFlight<G>>,
    next_ticket: u64,
    closed: bool,
}

impl<G: Game> Session<G> {
    pub fn kind(&self) -> GameKind {
        G::KIND
    }

    /// Last authoritative state.
    pub fn state(&self) -> &G {
        &self.state
    }

    /// What should be on screen: the provisional view if any, else the state.
    pub fn view(&self) -> &G {
        self.provisional.as_ref().unwrap_or(&self.state)
    }

    pub fn local(&self) -> &G::Local {
        &self.local
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_end_of_game(&self) -> bool {
        self.state.is_end_of_game()
    }

    pub fn is_playable(&self) -> bool {
        !self.closed && !self.is_busy() && !self.is_end_of_game()
    }

    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        self.clock.elapsed_secs(now)
    }

    pub fn poll_clock(&mut self, now: Instant) -> Option<u64> {
        self.clock.poll(now)
    }

    pub fn is_clock_running(&self) -> bool {
        !self.closed && !self.clock.is_frozen()
    }

    pub fn submit(&mut self, action: G::Action) -> Result<Outbound> {
        self.ensure_idle()?;
        if self.state.is_end_of_game() {
            return Err(MoveRejection::GameOver.into());
        }

        let Plan {
            request,
            provisional,
            follow_up,
        } = self.state.plan(&action)?;
        log::debug!("{} submit {:?}", G::KIND, action);

        let outbound = self.outbound(request);
        self.provisional = provisional;
        self.in_flight = Some(InFlight::Action {
            ticket: outbound.ticket,
            action,
            follow_up,
        });
        Ok(outbound)
    }

    pub fn resolve(
        &mut self,
        ticket: Ticket,
        result: core::result::Result<ApiResponse, TransportError>,
        now: Instant,
    ) -> Result<Resolution> {
        if self.closed {
            log::debug!("{} closed, dropping response {:?}", G::KIND, ticket);
            return Ok(Resolution::Ignored);
        }

        let in_flight = match self.in_flight.take() {
            Some(in_flight) if in_flight.ticket() == Some(ticket) => in_flight,
            other => {
                log::debug!("{} dropping stale response {:?}", G::KIND, ticket);
                self.in_flight = other;
                return Ok(Resolution::Ignored);
            }
        };
        // rolled back on every failure path below
        let provisional = self.provisional.take();

        let body = classify(result).inspect_err(|err| {
            log::error!("{} request failed: {}", G::KIND, err);
        })?;

        match in_flight {
            InFlight::Action {
                action, follow_up, ..
            } => {
                let next = self
                    .state
                    .apply_response(&action, &body)
                    .inspect_err(|err| log::error!("{} response rejected: {}", G::KIND, err))?;

                match follow_up {
                    FollowUp::DeferApply => {
                        self.provisional = provisional;
                        Ok(self.defer(SecondPhase::Apply(next)))
                    }
                    FollowUp::Refetch(request) if !next.is_end_of_game() => {
                        self.commit(next, now);
                        Ok(self.defer(SecondPhase::Fetch(request)))
                    }
                    FollowUp::Refetch(_) | FollowUp::None => {
                        self.commit(next, now);
                        Ok(Resolution::Settled)
                    }
                }
            }
            InFlight::Refetch { .. } => {
                let incoming = G::decode(&body)?;
                let next = self.state.reconcile(incoming)?;
                self.commit(next, now);
                Ok(Resolution::Settled)
            }
            InFlight::Waiting { .. } => Ok(Resolution::Ignored),
        }
    }

    /// Runs the second phase of `id`, at most once.
    pub fn fire(&mut self, id: TaskId, now: Instant) -> Fired {
        if self.closed {
            return Fired::Ignored;
        }
        let Some(phase) = self.scheduler.take(id) else {
            log::debug!("{} ignoring stale timer {:?}", G::KIND, id);
            return Fired::Ignored;
        };
        if !matches!(self.in_flight, Some(InFlight::Waiting { task }) if task == id) {
            log::warn!("{} timer {:?} fired outside its window", G::KIND, id);
            return Fired::Ignored;
        }

        match phase {
            SecondPhase::Apply(next) => {
                self.in_flight = None;
                self.provisional = None;
                self.commit(next, now);
                Fired::Applied
            }
            SecondPhase::Fetch(request) => {
                let outbound = self.outbound(request);
                self.in_flight = Some(InFlight::Refetch {
                    ticket: outbound.ticket,
                });
                Fired::Fetch(outbound)
            }
        }
    }

    /// Tears the session down: pending timers are cancelled and every later
    /// response or timer is ignored.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.scheduler.cancel_all();
        self.in_flight = None;
        self.provisional = None;
        log::debug!("{} session closed", G::KIND);
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.closed {
            Err(SyncError::Closed)
        } else if self.in_flight.is_some() {
            Err(SyncError::Busy)
        } else {
            Ok(())
        }
    }

    fn outbound(&mut self, request: ApiRequest) -> Outbound {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        Outbound {
            ticket,
            request,
            authorization: self.authorization.clone(),
        }
    }

    fn defer(&mut self, phase: SecondPhase<G>) -> Resolution {
        let task = self.scheduler.schedule(self.options.reveal_delay, phase);
        self.in_flight = Some(InFlight::Waiting { task: task.id });
        Resolution::Deferred(task)
    }

    fn commit(&mut self, next: G, now: Instant) {
        self.state = next;
        if self.state.is_end_of_game() {
            self.clock.freeze(now);
        }
    }
}

impl Session<WordSearch> {
    pub fn selection(&self) -> &PathSelection {
        &self.local
    }

    pub fn tap(&mut self, coords: Coord2) -> TapOutcome {
        if self.closed || self.state.is_end_of_game() {
            return TapOutcome::Ignored(IgnoreReason::GameOver);
        }
        self.local.tap(coords, &self.state)
    }

    pub fn cancel_selection(&mut self) -> bool {
        let had_selection = !self.local.is_idle();
        self.local.clear();
        had_selection
    }

    /// Sends the selected word. The path is cleared whenever the request is
    /// actually attempted, whatever the server later says about the word.
    pub fn confirm(&mut self) -> Result<Outbound> {
        self.ensure_idle()?;
        if self.local.is_idle() {
            return Err(MoveRejection::EmptySelection.into());
        }

        let word = self.local.take_word();
        self.submit(WordSearchAction::SelectWord(word))
    }
}
