use super::pin::OwnerAccessToken;

/// Where the owner-access gate stands for the current account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateState {
    /// PIN existence not checked yet
    Unknown,
    /// The account has no owner PIN
    NoPinConfigured,
    /// PIN exists, no verified unlock token held
    PinConfiguredLocked,
    /// PIN exists and the held unlock token passed re-validation
    PinConfiguredUnlocked,
}

impl GateState {
    pub fn is_unlocked(self) -> bool {
        self == Self::PinConfiguredUnlocked
    }
}

/// Backend's answer on a held unlock token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Rejected,
}

/// Inputs to the gate; queries produce these, the gate only reacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    /// Token read back from storage at startup
    Restored(OwnerAccessToken),
    /// PIN-existence answer, plus the verdict on the held token if one was checked
    Probed {
        pin_exists: bool,
        verdict: Option<Verdict>,
    },
    /// Passive re-check of the held token
    Revalidated(Verdict),
    /// New token from PIN entry or PIN creation
    Issued(OwnerAccessToken),
    /// User turned owner access off
    Disabled,
}

/// Result of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GateState,
    pub to: GateState,
    pub token_changed: bool,
}

/// Owner-access state machine, free of IO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateMachine {
    state: GateState,
    token: OwnerAccessToken,
}

impl Default for GateMachine {
    fn default() -> Self {
        Self {
            state: GateState::Unknown,
            token: OwnerAccessToken::LOCKED,
        }
    }
}

impl GateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn token(&self) -> OwnerAccessToken {
        self.token
    }

    pub fn apply(&mut self, event: GateEvent) -> Transition {
        use GateState::*;

        let from = self.state;
        let held = self.token;
        let (state, token) = match event {
            GateEvent::Restored(token) => (Unknown, token),

            // A missing PIN cannot back a live unlock
            GateEvent::Probed {
                pin_exists: false, ..
            } => (NoPinConfigured, OwnerAccessToken::LOCKED),
            GateEvent::Probed {
                pin_exists: true, ..
            } if !held.is_unlocked() => (PinConfiguredLocked, held),
            GateEvent::Probed {
                pin_exists: true,
                verdict: Some(Verdict::Valid),
            } => (PinConfiguredUnlocked, held),
            // Unchecked counts as rejected
            GateEvent::Probed {
                pin_exists: true,
                verdict: Some(Verdict::Rejected) | None,
            } => (PinConfiguredLocked, OwnerAccessToken::LOCKED),

            GateEvent::Revalidated(Verdict::Valid) if held.is_unlocked() => {
                (PinConfiguredUnlocked, held)
            }
            GateEvent::Revalidated(Verdict::Valid) => (from, held),
            GateEvent::Revalidated(Verdict::Rejected) => match from {
                NoPinConfigured => (NoPinConfigured, OwnerAccessToken::LOCKED),
                _ => (PinConfiguredLocked, OwnerAccessToken::LOCKED),
            },

            GateEvent::Issued(token) if token.is_unlocked() => (PinConfiguredUnlocked, token),
            GateEvent::Issued(_) => (PinConfiguredLocked, OwnerAccessToken::LOCKED),

            GateEvent::Disabled => match from {
                PinConfiguredUnlocked => (PinConfiguredLocked, OwnerAccessToken::LOCKED),
                other => (other, OwnerAccessToken::LOCKED),
            },
        };

        self.state = state;
        self.token = token;
        Transition {
            from,
            to: state,
            token_changed: token != held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GateState::*;

    fn machine(state: GateState, token: i64) -> GateMachine {
        GateMachine {
            state,
            token: OwnerAccessToken::new(token),
        }
    }

    #[test]
    fn test_starts_unknown_and_locked() {
        let gate = GateMachine::new();
        assert_eq!(gate.state(), Unknown);
        assert!(!gate.token().is_unlocked());
    }

    #[test]
    fn test_restore_keeps_state_unknown() {
        let mut gate = GateMachine::new();
        let t = gate.apply(GateEvent::Restored(OwnerAccessToken::new(77)));
        assert_eq!(gate.state(), Unknown);
        assert_eq!(gate.token().value(), 77);
        assert!(t.token_changed);
    }

    #[test]
    fn test_probe_without_pin_revokes_held_token() {
        let mut gate = machine(Unknown, 77);
        let t = gate.apply(GateEvent::Probed {
            pin_exists: false,
            verdict: None,
        });
        assert_eq!(gate.state(), NoPinConfigured);
        assert!(!gate.token().is_unlocked());
        assert!(t.token_changed);
    }

    #[test]
    fn test_probe_with_pin_and_no_token_locks() {
        let mut gate = machine(Unknown, 0);
        let t = gate.apply(GateEvent::Probed {
            pin_exists: true,
            verdict: None,
        });
        assert_eq!(gate.state(), PinConfiguredLocked);
        assert!(!t.token_changed);
    }

    #[test]
    fn test_probe_outcomes_with_held_token() {
        let mut valid = machine(Unknown, 77);
        valid.apply(GateEvent::Probed {
            pin_exists: true,
            verdict: Some(Verdict::Valid),
        });
        assert_eq!(valid.state(), PinConfiguredUnlocked);
        assert_eq!(valid.token().value(), 77);

        for verdict in [Some(Verdict::Rejected), None] {
            let mut gate = machine(Unknown, 77);
            gate.apply(GateEvent::Probed {
                pin_exists: true,
                verdict,
            });
            assert_eq!(gate.state(), PinConfiguredLocked);
            assert!(!gate.token().is_unlocked());
        }
    }

    #[test]
    fn test_rejected_revalidation_locks() {
        for from in [Unknown, PinConfiguredUnlocked, PinConfiguredLocked] {
            let mut gate = machine(from, 77);
            let t = gate.apply(GateEvent::Revalidated(Verdict::Rejected));
            assert_eq!(gate.state(), PinConfiguredLocked);
            assert!(!gate.token().is_unlocked());
            assert!(t.token_changed);
        }
    }

    #[test]
    fn test_valid_revalidation_needs_a_token() {
        let mut held = machine(Unknown, 77);
        held.apply(GateEvent::Revalidated(Verdict::Valid));
        assert_eq!(held.state(), PinConfiguredUnlocked);

        let mut empty = machine(PinConfiguredLocked, 0);
        empty.apply(GateEvent::Revalidated(Verdict::Valid));
        assert_eq!(empty.state(), PinConfiguredLocked);
    }

    #[test]
    fn test_issued_token_unlocks_from_any_state() {
        for from in [Unknown, NoPinConfigured, PinConfiguredLocked, PinConfiguredUnlocked] {
            let mut gate = machine(from, 0);
            gate.apply(GateEvent::Issued(OwnerAccessToken::new(77)));
            assert_eq!(gate.state(), PinConfiguredUnlocked);
            assert_eq!(gate.token().value(), 77);
        }
    }

    #[test]
    fn test_issued_without_token_stays_locked() {
        let mut gate = machine(NoPinConfigured, 0);
        gate.apply(GateEvent::Issued(OwnerAccessToken::LOCKED));
        assert_eq!(gate.state(), PinConfiguredLocked);
    }

    #[test]
    fn test_disable() {
        let mut unlocked = machine(PinConfiguredUnlocked, 77);
        let t = unlocked.apply(GateEvent::Disabled);
        assert_eq!(t.from, PinConfiguredUnlocked);
        assert_eq!(t.to, PinConfiguredLocked);
        assert!(!unlocked.token().is_unlocked());

        let mut no_pin = machine(NoPinConfigured, 0);
        let t = no_pin.apply(GateEvent::Disabled);
        assert_eq!(no_pin.state(), NoPinConfigured);
        assert!(!t.token_changed);
    }
}
