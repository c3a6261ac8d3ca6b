// Presentation Contract Tests
//
// The hard gate protects whole pages and may navigate. The soft gate hides
// sections of pages the viewer can already see and must never navigate.

use schoolgate::{
    AccessDecision, DenialReason, GateView, HardGate, RecordingNavigator, SoftGate,
};
use std::cell::Cell;

fn all_decisions() -> Vec<AccessDecision> {
    vec![
        AccessDecision::Pending,
        AccessDecision::Granted,
        AccessDecision::Denied(DenialReason::Unauthenticated),
        AccessDecision::Denied(DenialReason::Unauthorized),
        AccessDecision::Denied(DenialReason::LookupFailure),
        AccessDecision::Denied(DenialReason::NoPermissionRequired),
    ]
}

/// WHY: Protected content is only produced for a granted decision
/// REASON: Building the view may already read protected data
/// BREAKS: Student records are fetched for viewers who get redirected anyway
#[test]
fn hard_gate_builds_content_only_when_granted() {
    let gate = HardGate::default();

    for decision in all_decisions() {
        let nav = RecordingNavigator::new();
        let built = Cell::new(false);
        let view = gate.present(&decision, &nav, || built.set(true));

        assert_eq!(built.get(), decision.is_granted(), "decision {}", decision);
        assert_eq!(
            matches!(view, GateView::Content(())),
            decision.is_granted()
        );
    }
}

/// WHY: Signed-out viewers go to the public page, everyone else to /unauthorized
/// REASON: Only a signed-out viewer can fix the problem by signing in
/// BREAKS: Signed-in staff land on the marketing page with no explanation
#[test]
fn hard_gate_redirect_destinations() {
    let gate = HardGate::default();

    for decision in all_decisions() {
        let nav = RecordingNavigator::new();
        gate.present(&decision, &nav, || ());

        let expected: Vec<String> = match decision {
            AccessDecision::Denied(DenialReason::Unauthenticated) => vec!["/".to_string()],
            AccessDecision::Denied(_) => vec!["/unauthorized".to_string()],
            AccessDecision::Pending | AccessDecision::Granted => vec![],
        };
        assert_eq!(nav.visits(), expected, "decision {}", decision);
    }
}

/// WHY: The soft gate renders nothing until granted
/// REASON: It guards a fragment of a page the viewer is allowed to be on,
/// so it takes no navigator and can only omit
/// BREAKS: Admin widgets flash on shared pages while the lookup is pending
#[test]
fn soft_gate_renders_only_when_granted() {
    let gate = SoftGate;

    for decision in all_decisions() {
        let rendered = gate.present(&decision, || "financial summary");
        assert_eq!(rendered.is_some(), decision.is_granted(), "decision {}", decision);
    }
}
