use std::fmt::Display;

use itertools::Itertools;

use crate::graph::ElementOffsets;

/// Render an alignment as two rows, the down sequence stacked on top of the right sequence.
///
/// Gaps are rendered as `gap`, freerides as `freeride` in both rows. Every element is padded
/// with `padding` to the width of the widest rendered element, so columns line up when elements
/// render to strings of different lengths. Elements are joined with `separator`.
///
/// ```text
/// h-ello-
/// -mellow
/// ```
///
/// Offsets in `pairs` must lie within `down` and `right`. Pairs pointing past the end of a
/// sequence trip a debug assertion and are left out in release builds.
pub fn alignment_to_stacked_string<D, R>(
    down: &[D],
    right: &[R],
    pairs: &[Option<ElementOffsets>],
    separator: &str,
    gap: &str,
    freeride: &str,
    padding: char,
) -> String
where
    D: Display,
    R: Display,
{
    let element = |d: Option<usize>, r: Option<usize>| {
        let down_elem = d.map(|i| down.get(i));
        let right_elem = r.map(|i| right.get(i));
        debug_assert!(
            !matches!(down_elem, Some(None)) && !matches!(right_elem, Some(None)),
            "Element offsets ({d:?}, {r:?}) out of bounds"
        );

        match (down_elem, right_elem) {
            (Some(None), _) | (_, Some(None)) => None,
            (down_elem, right_elem) => Some((
                down_elem.flatten().map_or_else(|| gap.to_string(), ToString::to_string),
                right_elem.flatten().map_or_else(|| gap.to_string(), ToString::to_string),
            )),
        }
    };

    let (down_elems, right_elems): (Vec<String>, Vec<String>) = pairs.iter()
        .filter_map(|pair| match *pair {
            Some((None, None)) => {
                debug_assert!(false, "Edge consuming no elements should be a freeride");
                None
            },
            Some((d, r)) => element(d, r),
            None => Some((freeride.to_string(), freeride.to_string())),
        })
        .unzip();

    let width = down_elems.iter()
        .chain(right_elems.iter())
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0);

    let pad = |s: &String| {
        let fill = width - s.chars().count();
        format!("{s}{}", std::iter::repeat(padding).take(fill).collect::<String>())
    };

    format!(
        "{}\n{}",
        down_elems.iter().map(pad).join(separator),
        right_elems.iter().map(pad).join(separator),
    )
}

#[cfg(test)]
mod tests {
    use super::alignment_to_stacked_string;

    #[test]
    fn test_stacked_string() {
        let down = ['h', 'e', 'l', 'l', 'o'];
        let right = ['m', 'e', 'l', 'l', 'o', 'w'];
        let pairs = vec![
            Some((Some(0), None)),
            Some((None, Some(0))),
            Some((Some(1), Some(1))),
            Some((Some(2), Some(2))),
            Some((Some(3), Some(3))),
            Some((Some(4), Some(4))),
            Some((None, Some(5))),
        ];

        assert_eq!(
            alignment_to_stacked_string(&down, &right, &pairs, "", "-", "~", ' '),
            "h-ello-\n-mellow"
        );
    }

    #[test]
    fn test_freerides_and_padding() {
        let down = [1, 20, 300];
        let right = [20, 4];
        let pairs = vec![
            None,
            Some((Some(1), Some(0))),
            Some((Some(2), Some(1))),
            None,
        ];

        assert_eq!(
            alignment_to_stacked_string(&down, &right, &pairs, "|", "-", "*", '.'),
            "*..|20.|300|*..\n*..|20.|4..|*.."
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of bounds")]
    fn test_offset_past_end() {
        let down = ['a', 'c'];
        let right = ['a'];
        let pairs = vec![Some((Some(0), Some(0))), Some((Some(2), None))];

        alignment_to_stacked_string(&down, &right, &pairs, "", "-", "-", ' ');
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_offset_past_end_skipped() {
        let down = ['a', 'c'];
        let right = ['a'];
        let pairs = vec![Some((Some(0), Some(0))), Some((Some(2), None)), Some((Some(1), None))];

        assert_eq!(alignment_to_stacked_string(&down, &right, &pairs, "", "-", "-", ' '), "ac\na-");
    }

    #[test]
    fn test_empty() {
        let empty: [u8; 0] = [];
        assert_eq!(alignment_to_stacked_string(&empty, &empty, &[], "", "-", "-", ' '), "\n");
    }
}
