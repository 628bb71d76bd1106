//! Generated names for diagram elements.
//!
//! Every element that later statements refer to by name (participants,
//! frames, comments) gets a name from the diagram's [`IdGenerator`]. Names
//! come from a single counter, so they stay unique across kinds and the
//! sequence depends only on call order.

/// The kind of element a generated name is issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Participant,
    Frame,
    Comment,
}

impl IdKind {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Participant => "O",
            Self::Frame => "F",
            Self::Comment => "C",
        }
    }
}

/// Monotonic name source owned by one diagram.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh name such as `O_0`, `F_1` or `C_2`.
    pub fn next(&mut self, kind: IdKind) -> String {
        let name = format!("{}_{}", kind.prefix(), self.next);
        self.next += 1;
        name
    }

    /// Number of names issued so far.
    pub const fn issued(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generator_has_issued_nothing() {
        assert_eq!(IdGenerator::new().issued(), 0);
    }

    #[test]
    fn test_names_carry_kind_prefix_and_shared_counter() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next(IdKind::Participant), "O_0");
        assert_eq!(ids.next(IdKind::Frame), "F_1");
        assert_eq!(ids.next(IdKind::Comment), "C_2");
        assert_eq!(ids.next(IdKind::Participant), "O_3");
        assert_eq!(ids.issued(), 4);
    }

    #[test]
    fn test_sequence_is_deterministic() {
        let mut a = IdGenerator::new();
        let mut b = IdGenerator::new();
        let kinds = [IdKind::Frame, IdKind::Participant, IdKind::Comment];
        for kind in kinds {
            assert_eq!(a.next(kind), b.next(kind));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashSet;

        fn kind() -> impl Strategy<Value = IdKind> {
            prop_oneof![
                Just(IdKind::Participant),
                Just(IdKind::Frame),
                Just(IdKind::Comment),
            ]
        }

        proptest! {
            #[test]
            fn names_are_pairwise_distinct(kinds in proptest::collection::vec(kind(), 0..500)) {
                let mut ids = IdGenerator::new();
                let mut seen = HashSet::new();
                for kind in &kinds {
                    prop_assert!(seen.insert(ids.next(*kind)));
                }
                prop_assert_eq!(ids.issued(), kinds.len() as u64);
            }
        }
    }
}
