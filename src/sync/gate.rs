/// Hands out increasing sequence numbers and remembers the newest one applied.
///
/// A response may be applied only if nothing issued after it has been applied
/// already.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SequenceGate {
    issued: u64,
    applied: u64,
}

impl SequenceGate {
    pub(crate) fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Returns `false` for a stale response.
    pub(crate) fn try_apply(&mut self, seq: u64) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        true
    }

    /// Make every response issued so far stale.
    pub(crate) fn fence(&mut self) {
        self.applied = self.issued;
    }

    pub(crate) fn applied(&self) -> u64 {
        self.applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_response_wins() {
        let mut gate = SequenceGate::default();
        let a = gate.issue();
        let b = gate.issue();
        assert!(gate.try_apply(b));
        assert!(!gate.try_apply(a));
        assert_eq!(gate.applied(), b);
    }

    #[test]
    fn in_order_responses_both_apply() {
        let mut gate = SequenceGate::default();
        let a = gate.issue();
        let b = gate.issue();
        assert!(gate.try_apply(a));
        assert!(gate.try_apply(b));
    }

    #[test]
    fn fence_drops_everything_in_flight() {
        let mut gate = SequenceGate::default();
        let a = gate.issue();
        gate.fence();
        assert!(!gate.try_apply(a));
        let b = gate.issue();
        assert!(gate.try_apply(b));
    }
}
