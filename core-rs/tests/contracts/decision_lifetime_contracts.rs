// Decision Lifetime Contract Tests
//
// A decision belongs to the session and permission that produced it. These
// tests pin down when a gate must forget a decision and which lookup results
// it is allowed to apply.

use schoolgate::{
    AccessDecision, AccessGate, DenialReason, GateStep, LookupOutcome, Permission, Session, UserId,
};

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

fn expect_lookup(step: GateStep) -> schoolgate::LookupTicket {
    match step {
        GateStep::Lookup(ticket) => ticket,
        GateStep::Settled(decision) => panic!("expected a lookup, gate settled as {}", decision),
    }
}

/// WHY: A grant never survives a session change
/// REASON: Sign-out or account switch must drop every earlier decision
/// BREAKS: The next viewer on a shared machine inherits admin access
#[test]
fn grant_is_dropped_when_session_changes() {
    let mut gate = AccessGate::new();
    let admin = Session::authenticated(user("admin-1"));

    let ticket = expect_lookup(gate.begin(&admin, Some(Permission::UsersManage)));
    assert!(gate.complete(ticket, LookupOutcome::Granted));
    assert!(gate.decision().is_granted());

    let visitor = Session::authenticated(user("parent-7"));
    let _ticket = expect_lookup(gate.begin(&visitor, Some(Permission::UsersManage)));
    assert_eq!(gate.decision(), AccessDecision::Pending);

    match gate.begin(&Session::unauthenticated(), Some(Permission::UsersManage)) {
        GateStep::Settled(decision) => assert_eq!(
            decision,
            AccessDecision::Denied(DenialReason::Unauthenticated)
        ),
        GateStep::Lookup(_) => panic!("signed-out session must not reach the store"),
    }
}

/// WHY: Changing the required permission re-runs the lookup
/// REASON: A decision for one permission says nothing about another
/// BREAKS: Navigating from the blog editor to payments would reuse the blog grant
#[test]
fn permission_change_starts_new_generation() {
    let mut gate = AccessGate::new();
    let session = Session::authenticated(user("u1"));

    let first = expect_lookup(gate.begin(&session, Some(Permission::BlogManage)));
    gate.complete(first, LookupOutcome::Granted);
    let generation = gate.generation();

    let second = expect_lookup(gate.begin(&session, Some(Permission::PaymentsView)));
    assert_eq!(second.permission(), Permission::PaymentsView);
    assert_eq!(second.generation(), generation + 1);
    assert_eq!(gate.decision(), AccessDecision::Pending);
}

/// WHY: Out-of-date lookup results are discarded
/// REASON: A slow answer for an old permission can arrive after a fast newer one
/// BREAKS: A stale grant overwrites the current denial
#[test]
fn stale_lookup_cannot_overwrite_current_decision() {
    let mut gate = AccessGate::new();
    let session = Session::authenticated(user("u1"));

    let slow = expect_lookup(gate.begin(&session, Some(Permission::SystemSettings)));
    let fast = expect_lookup(gate.begin(&session, Some(Permission::UsersManage)));

    assert!(gate.complete(fast, LookupOutcome::NotGranted));
    assert!(!gate.complete(slow, LookupOutcome::Granted));

    assert_eq!(
        gate.decision(),
        AccessDecision::Denied(DenialReason::Unauthorized)
    );
}

/// WHY: Re-rendering with the same inputs does not hit the store again
/// REASON: Decisions are terminal until the session or permission changes
/// BREAKS: Every re-render would fire a network lookup
#[test]
fn unchanged_inputs_reuse_decision() {
    let mut gate = AccessGate::new();
    let session = Session::authenticated(user("u1"));

    let ticket = expect_lookup(gate.begin(&session, Some(Permission::GalleryManage)));
    gate.complete(ticket, LookupOutcome::NotGranted);

    for _ in 0..3 {
        match gate.begin(&session, Some(Permission::GalleryManage)) {
            GateStep::Settled(decision) => assert_eq!(
                decision,
                AccessDecision::Denied(DenialReason::Unauthorized)
            ),
            GateStep::Lookup(_) => panic!("unchanged inputs issued a new lookup"),
        }
    }
    assert_eq!(gate.generation(), 1);
}

/// WHY: A lookup result only applies to the gate that asked for it
/// REASON: A view can unmount and remount while its lookup is in flight,
/// and every fresh gate starts counting generations from the same point
/// BREAKS: An admin's grant lands on a parent's gate and opens the users page
#[test]
fn lookup_result_cannot_cross_gates() {
    let mut admin_gate = AccessGate::new();
    let mut parent_gate = AccessGate::new();

    let admin_ticket = expect_lookup(admin_gate.begin(
        &Session::authenticated(user("admin-1")),
        Some(Permission::SystemSettings),
    ));
    let _parent_ticket = expect_lookup(parent_gate.begin(
        &Session::authenticated(user("parent-7")),
        Some(Permission::UsersManage),
    ));

    assert!(!parent_gate.complete(admin_ticket, LookupOutcome::Granted));
    assert_eq!(parent_gate.decision(), AccessDecision::Pending);
}
