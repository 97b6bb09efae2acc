use core::cmp::Ordering;

/// Compares two sequences element by element.
///
/// The first differing element decides. If one sequence runs out first, it is
/// a prefix of the other and sorts first; sequences of equal length and
/// content are equal. This is the order every [`CountTree`](crate::CountTree)
/// keeps its keys in.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use ngram_counter::compare_sequences;
///
/// assert_eq!(compare_sequences(b"abc", b"abd"), Ordering::Less);
/// assert_eq!(compare_sequences(b"ab", b"abc"), Ordering::Less);
/// assert_eq!(compare_sequences(&['x', 'y'], &['x', 'y']), Ordering::Equal);
/// ```
#[inline]
pub fn compare_sequences<T: Ord>(a: &[T], b: &[T]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.cmp(y) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
    }

    a.len().cmp(&b.len())
}
