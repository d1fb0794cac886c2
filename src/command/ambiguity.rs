//! Registration-time ambiguity detection.
//!
//! Patterns are tried in registration order, so a new pattern is rejected when
//! an earlier one already accepts every token sequence the new one accepts:
//! the new pattern could never be selected. Partial overlap is allowed and is
//! settled at dispatch time by order.
//!
//! Coverage between single slots:
//!
//! ```text
//! STRING   covers everything
//! WORD     covers INTEGER, URL, USER, CHANNEL, single-word literals and custom types
//! TYPE     covers a literal iff the literal coerces to TYPE
//! 'lit'    covers only an equal literal
//! INTEGER, URL, USER, CHANNEL are pairwise disjoint
//! custom   never covers STRING; otherwise CustomArgument::covers and
//!          CustomArgument::is_within decide, both false unless declared
//! ```

use super::pattern::Pattern;
use super::spec::{ArgumentSpec, eq_caseless};
use chatcmd_syntax::ArgumentType;

/// Index of the first pattern in `existing` that shadows `candidate`.
pub(crate) fn find_shadowing(existing: &[Pattern], candidate: &[ArgumentSpec]) -> Option<usize> {
    existing
        .iter()
        .position(|pattern| covers(pattern.args(), candidate))
}

/// Whether every token sequence accepted by `later` is accepted by `earlier`.
pub(crate) fn covers(earlier: &[ArgumentSpec], later: &[ArgumentSpec]) -> bool {
    let e = Shape::of(earlier);
    let n = Shape::of(later);

    let lengths_covered = match (e.tail, n.tail) {
        (None, None) => e.fixed.len() == n.fixed.len(),
        (Some(_), None) => n.fixed.len() >= e.min_len(),
        // a bounded pattern never accepts every length of an unbounded one
        (None, Some(_)) => false,
        (Some(_), Some(_)) => n.min_len() >= e.min_len(),
    };
    if !lengths_covered {
        return false;
    }

    // Past the longer fixed prefix both sides repeat their element type, so
    // one extra position decides the rest.
    let positions = match n.tail {
        None => n.fixed.len(),
        Some(_) => n.fixed.len().max(e.fixed.len()) + 1,
    };

    (0..positions).all(|i| match (e.slot_at(i), n.slot_at(i)) {
        (Some(a), Some(b)) => slot_covers(a, b),
        _ => false,
    })
}

#[derive(Clone, Copy)]
enum Slot<'a> {
    Literal(&'a str),
    Type(&'a ArgumentType),
}

struct Shape<'a> {
    fixed: &'a [ArgumentSpec],
    tail: Option<(&'a ArgumentType, bool)>,
}

impl<'a> Shape<'a> {
    fn of(args: &'a [ArgumentSpec]) -> Self {
        match args.split_last() {
            Some((ArgumentSpec::Variadic { ty, at_least_one }, fixed)) => Self {
                fixed,
                tail: Some((ty, *at_least_one)),
            },
            _ => Self {
                fixed: args,
                tail: None,
            },
        }
    }

    fn min_len(&self) -> usize {
        self.fixed.len() + self.tail.map_or(0, |(_, one)| usize::from(one))
    }

    fn slot_at(&self, i: usize) -> Option<Slot<'a>> {
        match self.fixed.get(i) {
            Some(ArgumentSpec::Literal(text)) => Some(Slot::Literal(text)),
            Some(ArgumentSpec::Typed(ty)) | Some(ArgumentSpec::Variadic { ty, .. }) => {
                Some(Slot::Type(ty))
            }
            None => self.tail.map(|(ty, _)| Slot::Type(ty)),
        }
    }
}

fn slot_covers(earlier: Slot<'_>, later: Slot<'_>) -> bool {
    match (earlier, later) {
        (Slot::Literal(a), Slot::Literal(b)) => eq_caseless(a, b),
        (Slot::Literal(_), Slot::Type(_)) => false,
        (Slot::Type(ty), Slot::Literal(text)) => ty.accepts(text),
        (Slot::Type(a), Slot::Type(b)) => type_covers(a, b),
    }
}

fn type_covers(earlier: &ArgumentType, later: &ArgumentType) -> bool {
    use ArgumentType as T;

    if earlier == later {
        return true;
    }
    match (earlier, later) {
        (T::String, _) => true,
        (T::Word, T::Custom(custom)) => custom.is_single_word(),
        (T::Custom(_), T::String) => false,
        (T::Custom(a), T::Custom(b)) => a.covers(later) || b.is_within(earlier),
        (T::Custom(custom), other) => custom.covers(other),
        (other, T::Custom(custom)) => custom.is_within(other),
        (_, T::String) => false,
        (T::Word, _) => true,
        _ => false,
    }
}
