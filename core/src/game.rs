use core::fmt;

use gamehub_protocol::{ApiRequest, GameKind};

use crate::*;

/// What the host should do once the first response of an action is in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FollowUp {
    /// The response settles the action.
    None,
    /// Hold the response and apply it only after the reveal delay.
    DeferApply,
    /// Apply the response, then fetch the settled state after the reveal delay.
    Refetch(ApiRequest),
}

/// Locally validated action, ready to be sent.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan<G> {
    pub request: ApiRequest,
    /// Provisional view shown while the request is outstanding.
    pub provisional: Option<G>,
    pub follow_up: FollowUp,
}

impl<G> Plan<G> {
    pub fn send(request: ApiRequest) -> Self {
        Self {
            request,
            provisional: None,
            follow_up: FollowUp::None,
        }
    }

    pub fn with_provisional(mut self, provisional: G) -> Self {
        self.provisional = Some(provisional);
        self
    }

    pub fn then(mut self, follow_up: FollowUp) -> Self {
        self.follow_up = follow_up;
        self
    }
}

/// Merges a freshly decoded authoritative state into the one on screen.
///
/// The default is a wholesale replace; games with client-visible invariants
/// across updates override it.
pub trait Reconcile: Sized {
    fn reconcile(&self, incoming: Self) -> Result<Self> {
        Ok(incoming)
    }
}

/// One game's slice of the server contract and its local move checks.
pub trait Game: Clone + fmt::Debug + Reconcile {
    const KIND: GameKind;

    type Action: Clone + fmt::Debug;
    type StartParams: Clone + fmt::Debug + Default;
    /// Client-only view state that survives reconciliation.
    type Local: Default + fmt::Debug;

    fn start_request(params: &Self::StartParams) -> ApiRequest;

    /// Parses a full authoritative state.
    fn decode(body: &str) -> Result<Self>;

    fn is_end_of_game(&self) -> bool;

    /// Rejects obviously illegal moves and describes how to send the rest.
    fn plan(&self, action: &Self::Action) -> Result<Plan<Self>>;

    /// Computes the next authoritative state from an action's response body.
    fn apply_response(&self, _action: &Self::Action, body: &str) -> Result<Self> {
        self.reconcile(Self::decode(body)?)
    }
}
