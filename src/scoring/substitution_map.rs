use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::scoring::{Scorer, Weight};

/// Table driven scorer, e.g., for substitution matrices.
///
/// Keys are the consumed element combination; `(Some(d), None)` scores a gap in the right
/// sequence, `(None, None)` a freeride. Combinations missing from the table get the default
/// weight.
#[derive(Clone, Debug)]
pub struct SubstitutionMapScorer<D, R, W> {
    table: FxHashMap<(Option<D>, Option<R>), W>,
    default_weight: W,
}

impl<D, R, W> SubstitutionMapScorer<D, R, W>
where
    D: Clone + Eq + Hash,
    R: Clone + Eq + Hash,
    W: Weight,
{
    pub fn new(default_weight: W) -> Self {
        Self {
            table: FxHashMap::default(),
            default_weight,
        }
    }

    pub fn with_entries<I>(default_weight: W, entries: I) -> Self
        where I: IntoIterator<Item=((Option<D>, Option<R>), W)>
    {
        Self {
            table: entries.into_iter().collect(),
            default_weight,
        }
    }

    pub fn insert(&mut self, down: Option<D>, right: Option<R>, weight: W) -> Option<W> {
        self.table.insert((down, right), weight)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<E, D, R, W> Scorer<E, D, R, W> for SubstitutionMapScorer<D, R, W>
where
    D: Clone + Eq + Hash,
    R: Clone + Eq + Hash,
    W: Weight,
{
    fn score(&self, _: &E, down: Option<&D>, right: Option<&R>) -> W {
        self.table.get(&(down.cloned(), right.cloned()))
            .copied()
            .unwrap_or(self.default_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::SubstitutionMapScorer;
    use crate::scoring::Scorer;

    #[test]
    fn test_lookup() {
        let mut scorer = SubstitutionMapScorer::with_entries(-4, [
            ((Some(b'A'), Some(b'A')), 5),
            ((Some(b'A'), Some(b'G')), -1),
            ((None, None), 0),
        ]);
        scorer.insert(Some(b'G'), None, -8);

        assert_eq!(scorer.len(), 4);
        assert_eq!(Scorer::<(), u8, u8, i32>::score(&scorer, &(), Some(&b'A'), Some(&b'A')), 5);
        assert_eq!(Scorer::<(), u8, u8, i32>::score(&scorer, &(), Some(&b'A'), Some(&b'G')), -1);
        assert_eq!(Scorer::<(), u8, u8, i32>::score(&scorer, &(), Some(&b'G'), None), -8);
        assert_eq!(Scorer::<(), u8, u8, i32>::score(&scorer, &(), Some(&b'T'), Some(&b'C')), -4);
        assert_eq!(Scorer::<(), u8, u8, i32>::score(&scorer, &(), None, None), 0);
    }
}
