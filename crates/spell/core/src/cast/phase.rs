/// Stage of an orchestrated cast.
///
/// ```text
/// Idle -> Validating -> Rejected
///                    -> Preparing -> Executing -> Succeeded -> Restored
///                                              -> Failed    -> Restored
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastPhase {
    Idle,
    Validating,
    Rejected,
    Preparing,
    Executing,
    Succeeded,
    Failed,
    Restored,
}

impl CastPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CastPhase::Idle => "idle",
            CastPhase::Validating => "validating",
            CastPhase::Rejected => "rejected",
            CastPhase::Preparing => "preparing",
            CastPhase::Executing => "executing",
            CastPhase::Succeeded => "succeeded",
            CastPhase::Failed => "failed",
            CastPhase::Restored => "restored",
        }
    }

    /// Whether no further transition can follow.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, CastPhase::Rejected | CastPhase::Restored)
    }

    pub const fn can_transition_to(&self, next: CastPhase) -> bool {
        use CastPhase::*;
        matches!(
            (*self, next),
            (Idle, Validating)
                | (Validating, Rejected)
                | (Validating, Preparing)
                | (Preparing, Executing)
                | (Executing, Succeeded)
                | (Executing, Failed)
                | (Succeeded, Restored)
                | (Failed, Restored)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_connected() {
        let path = [
            CastPhase::Idle,
            CastPhase::Validating,
            CastPhase::Preparing,
            CastPhase::Executing,
            CastPhase::Succeeded,
            CastPhase::Restored,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?}", pair);
        }
        assert!(CastPhase::Restored.is_terminal());
    }

    #[test]
    fn rejection_skips_restoration() {
        assert!(CastPhase::Validating.can_transition_to(CastPhase::Rejected));
        assert!(!CastPhase::Rejected.can_transition_to(CastPhase::Restored));
        assert!(!CastPhase::Validating.can_transition_to(CastPhase::Executing));
    }
}
