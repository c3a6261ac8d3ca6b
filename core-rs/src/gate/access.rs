//! Access Gate state machine
//!
//! Two forms share the same rules:
//! - [`evaluate`] decides a single request from scratch
//! - [`AccessGate`] keeps the decision for one mounted view and only asks the
//!   store again when the session or the required permission changes
//!
//! Rules, in order:
//! 1. `loading` session -> Pending
//! 2. `unauthenticated` session, or `authenticated` without a user id ->
//!    Denied(Unauthenticated)
//! 3. no required permission -> Denied(NoPermissionRequired)
//! 4. otherwise the lookup decides: Granted, Denied(Unauthorized) or
//!    Denied(LookupFailure)
//!
//! Lookups issued by an [`AccessGate`] carry the id of the gate and the
//! generation that issued them. A result from another gate, or whose
//! generation and inputs are no longer current, is dropped, so a slow answer
//! for an old permission can never overwrite a newer decision.

use tracing::{debug, info};
use uuid::Uuid;

use crate::gate::decision::{AccessDecision, DenialReason};
use crate::rbac::{LookupOutcome, Permission, PermissionLookup};
use crate::session::{Session, SessionKey, SessionStatus, UserId};

/// Decide everything that does not need the store
fn precheck(
    session: &Session,
    required: Option<Permission>,
) -> std::result::Result<(UserId, Permission), AccessDecision> {
    match session.status {
        SessionStatus::Loading => return Err(AccessDecision::Pending),
        SessionStatus::Unauthenticated => {
            return Err(AccessDecision::Denied(DenialReason::Unauthenticated))
        }
        SessionStatus::Authenticated => {}
    }

    let user_id = session
        .authenticated_user()
        .ok_or(AccessDecision::Denied(DenialReason::Unauthenticated))?;

    let permission = required.ok_or(AccessDecision::Denied(DenialReason::NoPermissionRequired))?;

    Ok((user_id.clone(), permission))
}

/// Evaluate one request against the role store
///
/// # Example
/// ```no_run
/// # use schoolgate::gate::evaluate;
/// # use schoolgate::rbac::{MemoryStore, Permission, PermissionLookup};
/// # use schoolgate::session::{Session, UserId};
/// # use std::sync::Arc;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let lookup = PermissionLookup::new(Arc::new(MemoryStore::new()));
/// let session = Session::authenticated(UserId::new("u1")?);
/// let decision = evaluate(&session, Some(Permission::SystemSettings), &lookup).await;
/// # Ok(())
/// # }
/// ```
pub async fn evaluate(
    session: &Session,
    required: Option<Permission>,
    lookup: &PermissionLookup,
) -> AccessDecision {
    match precheck(session, required) {
        Err(decision) => decision,
        Ok((user_id, permission)) => {
            AccessDecision::from_outcome(&lookup.check(&user_id, permission).await)
        }
    }
}

/// A lookup the gate is waiting on
///
/// Consumed by [`AccessGate::complete`], so one ticket resolves at most once.
#[derive(Debug)]
pub struct LookupTicket {
    gate: Uuid,
    generation: u64,
    user_id: UserId,
    permission: Permission,
}

impl LookupTicket {
    /// Id of the gate that issued this ticket
    pub fn gate_id(&self) -> Uuid {
        self.gate
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }
}

/// What the caller has to do after [`AccessGate::begin`]
#[derive(Debug)]
pub enum GateStep {
    /// The decision is known without asking the store
    Settled(AccessDecision),
    /// Run this lookup and hand the outcome back to `complete`
    Lookup(LookupTicket),
}

/// Per-mount access gate
#[derive(Debug)]
pub struct AccessGate {
    id: Uuid,
    generation: u64,
    inputs: Option<(SessionKey, Option<Permission>)>,
    decision: AccessDecision,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessGate {
    pub fn new() -> Self {
        AccessGate {
            id: Uuid::new_v4(),
            generation: 0,
            inputs: None,
            decision: AccessDecision::Pending,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn decision(&self) -> AccessDecision {
        self.decision
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a render cycle for `session` and `required`
    ///
    /// Unchanged inputs keep the current decision (including a Pending one
    /// whose lookup is still in flight) and issue no lookup. Changed inputs
    /// start a new generation and drop the old decision.
    pub fn begin(&mut self, session: &Session, required: Option<Permission>) -> GateStep {
        let inputs = (session.key(), required);
        if self.inputs.as_ref() == Some(&inputs) {
            return GateStep::Settled(self.decision);
        }

        self.generation += 1;
        self.inputs = Some(inputs);

        match precheck(session, required) {
            Err(decision) => {
                debug!(
                    gate = %self.id,
                    generation = self.generation,
                    status = session.status.as_str(),
                    %decision,
                    "gate settled without lookup"
                );
                self.decision = decision;
                GateStep::Settled(decision)
            }
            Ok((user_id, permission)) => {
                debug!(
                    gate = %self.id,
                    generation = self.generation,
                    user = %user_id,
                    %permission,
                    "gate waiting on permission lookup"
                );
                self.decision = AccessDecision::Pending;
                GateStep::Lookup(LookupTicket {
                    gate: self.id,
                    generation: self.generation,
                    user_id,
                    permission,
                })
            }
        }
    }

    /// Apply a lookup result
    ///
    /// Returns false when the ticket was issued by another gate, belongs to an
    /// older generation, or no longer matches the current session and
    /// permission; the outcome is then discarded and the current decision is
    /// untouched.
    pub fn complete(&mut self, ticket: LookupTicket, outcome: LookupOutcome) -> bool {
        if !self.is_current(&ticket) {
            info!(
                gate = %self.id,
                ticket_gate = %ticket.gate,
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                permission = %ticket.permission,
                "discarding stale permission lookup"
            );
            return false;
        }

        self.decision = AccessDecision::from_outcome(&outcome);
        debug!(
            gate = %self.id,
            generation = self.generation,
            user = %ticket.user_id,
            permission = %ticket.permission,
            decision = %self.decision,
            "gate resolved"
        );
        true
    }

    fn is_current(&self, ticket: &LookupTicket) -> bool {
        if ticket.gate != self.id || ticket.generation != self.generation {
            return false;
        }
        match &self.inputs {
            Some((key, required)) => {
                key.user_id() == Some(&ticket.user_id) && *required == Some(ticket.permission)
            }
            None => false,
        }
    }

    /// Begin a cycle and, if needed, run the lookup to completion
    pub async fn refresh(
        &mut self,
        session: &Session,
        required: Option<Permission>,
        lookup: &PermissionLookup,
    ) -> AccessDecision {
        match self.begin(session, required) {
            GateStep::Settled(decision) => decision,
            GateStep::Lookup(ticket) => {
                let outcome = lookup.check(ticket.user_id(), ticket.permission()).await;
                self.complete(ticket, outcome);
                self.decision
            }
        }
    }

    /// Forget the inputs and any decision, e.g. on sign-out or unmount
    ///
    /// Lookups still in flight become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.inputs = None;
        self.decision = AccessDecision::Pending;
    }
}
