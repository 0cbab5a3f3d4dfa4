//! Session state machine: tracks where the candidate is in the flow.

use serde::{Deserialize, Serialize};

/// The states of an onboarding session.
///
/// Verification resolves `Verifying` into `Invalid`, `Expired` or `Ready`.
/// Submission moves `Ready` → `Submitting` → `Submitted` | `Failed`, and a
/// `Failed` session may submit again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Verifying,
    Invalid,
    Expired,
    Ready,
    Submitting,
    Submitted,
    Failed,
}

impl SessionState {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            (Verifying, Invalid)
                | (Verifying, Expired)
                | (Verifying, Ready)
                | (Ready, Submitting)
                | (Failed, Submitting)
                | (Submitting, Submitted)
                | (Submitting, Failed)
        )
    }

    /// Whether this state is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Invalid | Self::Expired | Self::Submitted)
    }

    /// Whether form fields and documents may be changed in this state.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    /// Whether a submit action may start a submission from this state.
    pub fn can_submit(&self) -> bool {
        self.can_transition_to(Self::Submitting)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Verifying
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Verifying => "verifying",
            Self::Invalid => "invalid",
            Self::Expired => "expired",
            Self::Ready => "ready",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SessionState; 7] = [
        SessionState::Verifying,
        SessionState::Invalid,
        SessionState::Expired,
        SessionState::Ready,
        SessionState::Submitting,
        SessionState::Submitted,
        SessionState::Failed,
    ];

    #[test]
    fn valid_transitions() {
        use SessionState::*;
        let transitions = [
            (Verifying, Invalid),
            (Verifying, Expired),
            (Verifying, Ready),
            (Ready, Submitting),
            (Submitting, Submitted),
            (Submitting, Failed),
            (Failed, Submitting),
        ];
        for (from, to) in transitions {
            assert!(
                from.can_transition_to(to),
                "{from} should transition to {to}"
            );
        }
    }

    #[test]
    fn invalid_transitions() {
        use SessionState::*;
        // Skip verification
        assert!(!Verifying.can_transition_to(Submitting));
        // Skip the in-flight state
        assert!(!Ready.can_transition_to(Submitted));
        assert!(!Ready.can_transition_to(Failed));
        // Re-entrant submit
        assert!(!Submitting.can_transition_to(Submitting));
        // Terminal states go nowhere
        for target in ALL {
            assert!(!Submitted.can_transition_to(target));
            assert!(!Invalid.can_transition_to(target));
            assert!(!Expired.can_transition_to(target));
        }
        // Back to verification
        assert!(!Ready.can_transition_to(Verifying));
    }

    #[test]
    fn terminal_states_have_no_outgoing_transitions() {
        for from in ALL {
            let has_outgoing = ALL.iter().any(|to| from.can_transition_to(*to));
            assert_eq!(from.is_terminal(), !has_outgoing, "{from}");
        }
    }

    #[test]
    fn only_ready_and_failed_are_editable() {
        let editable: Vec<_> = ALL.into_iter().filter(|s| s.is_editable()).collect();
        assert_eq!(editable, vec![SessionState::Ready, SessionState::Failed]);
        assert!(SessionState::Ready.can_submit());
        assert!(SessionState::Failed.can_submit());
        assert!(!SessionState::Submitting.can_submit());
    }

    #[test]
    fn display_matches_serde() {
        for state in ALL {
            let display = format!("{state}");
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(
                format!("\"{display}\""),
                json,
                "Display and serde should match for {state:?}"
            );
        }
    }

    #[test]
    fn default_is_verifying() {
        assert_eq!(SessionState::default(), SessionState::Verifying);
    }
}
