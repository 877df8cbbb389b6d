pub mod simple;
pub mod substitution_map;
pub mod adapters;

use std::fmt::Debug;
use std::ops::Add;

use num::Zero;

pub use simple::{ConstantScorer, LevenshteinScorer, SimpleScorer};
pub use substitution_map::SubstitutionMapScorer;
pub use adapters::{ConsumptionGatingScorer, ConsumptionGatingWeight, ConsumptionLimits, WideningScorer};

/// Edge weight type.
///
/// The backtracker adds weights along a path and keeps the largest sum, so the only
/// requirements are a total order over the values in use, addition and an additive identity.
pub trait Weight: Copy + Debug + PartialOrd + Add<Output=Self> + Zero {
    fn is_finite(&self) -> bool;
}

macro_rules! impl_float_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                #[inline(always)]
                fn is_finite(&self) -> bool {
                    <$t>::is_finite(*self)
                }
            }
        )*
    }
}

macro_rules! impl_int_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                #[inline(always)]
                fn is_finite(&self) -> bool {
                    true
                }
            }
        )*
    }
}

impl_float_weight!(f32, f64);
impl_int_weight!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Computes the weight of an edge in an alignment graph.
///
/// `down` and `right` are the sequence elements consumed by the edge. Edges that don't consume
/// anything (freerides) get `None` for both.
pub trait Scorer<E, D, R, W> {
    fn score(&self, edge: &E, down: Option<&D>, right: Option<&R>) -> W;
}

impl<F, E, D, R, W> Scorer<E, D, R, W> for F
    where F: Fn(&E, Option<&D>, Option<&R>) -> W
{
    #[inline]
    fn score(&self, edge: &E, down: Option<&D>, right: Option<&R>) -> W {
        self(edge, down, right)
    }
}

#[cfg(test)]
mod tests {
    use super::{Scorer, Weight};

    #[test]
    fn test_weight_finite() {
        assert!(1.0f64.is_finite());
        assert!(!f64::NAN.is_finite());
        assert!(!Weight::is_finite(&f32::INFINITY));
        assert!(Weight::is_finite(&i32::MIN));
    }

    #[test]
    fn test_closure_scorer() {
        let scorer = |_: &(), d: Option<&u8>, r: Option<&u8>| match (d, r) {
            (Some(a), Some(b)) if a == b => 2i32,
            (Some(_), Some(_)) => -1,
            _ => -3,
        };

        assert_eq!(scorer.score(&(), Some(&b'A'), Some(&b'A')), 2);
        assert_eq!(scorer.score(&(), Some(&b'A'), Some(&b'C')), -1);
        assert_eq!(scorer.score(&(), None, Some(&b'C')), -3);
    }
}
