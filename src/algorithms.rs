//! Boyer-Moore majority vote, instrumented through an [`OperationTracker`].
//!
//! The **majority element** of a sequence is the value that appears more
//! than ⌊n/2⌋ times, where `n` is the length of the sequence.
//!
//! The search runs in two passes. The voting pass picks a candidate by
//! cancelling out pairs of different elements. The verification pass counts
//! the candidate's occurrences and records its first and last position. The
//! second pass is required: the voting pass always produces a candidate,
//! even when no majority exists.
//!
//! Every primitive step is charged to the tracker with fixed constants:
//! - reading the first element costs one array access;
//! - each later element in the voting pass costs one array access, plus one
//!   comparison when the running count is zero (candidate replaced) or two
//!   comparisons otherwise (zero check and equality test);
//! - each element in the verification pass costs one array access and one
//!   comparison, and the final threshold test costs one comparison.
//!
//! A sequence of length `n >= 2` is therefore always charged `2n` array
//! accesses. No auxiliary memory is allocated, so the memory allocation
//! counter stays at zero.

use std::fmt;

use log::{debug, trace};
use num::PrimInt;
use serde::Serialize;

use crate::tracker::OperationTracker;
use crate::{Error, Result};

/// The majority element of a sequence with its occurrence count and the
/// smallest and largest index at which it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MajorityResult<T> {
    element: T,
    count: usize,
    first_position: usize,
    last_position: usize,
}

impl<T: Copy> MajorityResult<T> {
    pub fn element(&self) -> T {
        self.element
    }

    /// Number of occurrences, always greater than half the sequence length.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn first_position(&self) -> usize {
        self.first_position
    }

    pub fn last_position(&self) -> usize {
        self.last_position
    }
}

impl<T: fmt::Display> fmt::Display for MajorityResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Majority: {} (count={}, first@{}, last@{})",
            self.element, self.count, self.first_position, self.last_position
        )
    }
}

/// Finds the majority element of `sequence`, charging every step to
/// `tracker`.
///
/// `None` stands for an absent sequence and is rejected with
/// [`Error::InvalidInput`]. An empty sequence is valid and has no majority.
///
/// The tracker is reset and its timer brackets the whole search, so the
/// counters read afterwards describe this call only.
///
/// # Examples
/// ```
/// use majority::{find_majority, OperationTracker};
///
/// let mut tracker = OperationTracker::new();
/// let nums = [1, 2, 3, 3, 3, 2, 3];
///
/// let result = find_majority(Some(&nums[..]), &mut tracker).unwrap().unwrap();
/// assert_eq!(result.element(), 3);
/// assert_eq!(result.count(), 4);
/// assert_eq!((result.first_position(), result.last_position()), (2, 6));
/// assert_eq!(tracker.array_accesses(), 14);
///
/// let nums = [1, 1, 2, 2];
/// assert_eq!(find_majority(Some(&nums[..]), &mut tracker).unwrap(), None);
///
/// assert!(find_majority::<i32>(None, &mut tracker).is_err());
/// ```
pub fn find_majority<T: PrimInt>(
    sequence: Option<&[T]>,
    tracker: &mut OperationTracker,
) -> Result<Option<MajorityResult<T>>> {
    let sequence = sequence
        .ok_or_else(|| Error::InvalidInput("sequence cannot be absent".to_string()))?;
    Ok(majority(sequence, tracker))
}

/// Like [`find_majority`] but returns only the element.
pub fn find_majority_element<T: PrimInt>(
    sequence: Option<&[T]>,
    tracker: &mut OperationTracker,
) -> Result<Option<T>> {
    Ok(find_majority(sequence, tracker)?.map(|r| r.element()))
}

/// Infallible form of [`find_majority`] for a sequence that is known to be
/// present.
pub fn majority<T: PrimInt>(a: &[T], tracker: &mut OperationTracker) -> Option<MajorityResult<T>> {
    tracker.reset();
    tracker.start_timer();

    let result = match a {
        [] => None,
        [only] => {
            // A single element is trivially the majority.
            tracker.increment_array_accesses();
            Some(MajorityResult {
                element: *only,
                count: 1,
                first_position: 0,
                last_position: 0,
            })
        }
        _ => select_candidate(a, tracker).and_then(|c| verify_candidate(a, c, tracker)),
    };

    tracker.stop_timer();

    debug!(
        "majority scan: n={}, found={}, comparisons={}, array_accesses={}, time={}ns",
        a.len(),
        result.is_some(),
        tracker.comparisons(),
        tracker.array_accesses(),
        tracker.execution_time_ns()
    );

    result
}

/// Voting pass. Returns `None` only for an empty slice.
fn select_candidate<T: PrimInt>(a: &[T], tracker: &mut OperationTracker) -> Option<T> {
    let (&first, rest) = a.split_first()?;
    let mut candidate = first;
    let mut count: isize = 1;
    tracker.increment_array_accesses();

    for (i, &x) in rest.iter().enumerate() {
        tracker.increment_array_accesses();

        if count == 0 {
            trace!("candidate replaced at position {}", i + 1);
            candidate = x;
            count = 1;
            tracker.increment_comparisons();
        } else {
            tracker.add_comparisons(2);
            if x == candidate {
                count += 1;
            } else {
                count -= 1;
            }
        }
    }

    Some(candidate)
}

/// Verification pass over the whole slice.
fn verify_candidate<T: PrimInt>(
    a: &[T],
    candidate: T,
    tracker: &mut OperationTracker,
) -> Option<MajorityResult<T>> {
    let mut count = 0;
    let mut positions: Option<(usize, usize)> = None;

    for (i, &x) in a.iter().enumerate() {
        tracker.increment_array_accesses();
        tracker.increment_comparisons();

        if x == candidate {
            count += 1;
            positions = Some(match positions {
                Some((first, _)) => (first, i),
                None => (i, i),
            });
        }
    }

    // count > n / 2
    tracker.increment_comparisons();

    match positions {
        Some((first_position, last_position)) if count > a.len() / 2 => Some(MajorityResult {
            element: candidate,
            count,
            first_position,
            last_position,
        }),
        _ => None,
    }
}

/// Majority finder owning the tracker it reports to.
///
/// Each call resets the tracker, so its counters always describe the most
/// recent search. The snapshot history is left to the caller.
#[derive(Debug, Default, Clone)]
pub struct MajorityVote {
    tracker: OperationTracker,
}

impl MajorityVote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracker(tracker: OperationTracker) -> Self {
        Self { tracker }
    }

    pub fn find_majority<T: PrimInt>(
        &mut self,
        sequence: Option<&[T]>,
    ) -> Result<Option<MajorityResult<T>>> {
        find_majority(sequence, &mut self.tracker)
    }

    pub fn find_majority_element<T: PrimInt>(&mut self, sequence: Option<&[T]>) -> Result<Option<T>> {
        find_majority_element(sequence, &mut self.tracker)
    }

    pub fn majority<T: PrimInt>(&mut self, a: &[T]) -> Option<MajorityResult<T>> {
        majority(a, &mut self.tracker)
    }

    pub fn tracker(&self) -> &OperationTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut OperationTracker {
        &mut self.tracker
    }

    pub fn into_tracker(self) -> OperationTracker {
        self.tracker
    }

    /// Report of the last search, printable with `{}`.
    pub fn statistics(&self) -> Statistics<'_> {
        Statistics {
            tracker: &self.tracker,
        }
    }
}

pub struct Statistics<'a> {
    tracker: &'a OperationTracker,
}

impl fmt::Display for Statistics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Boyer-Moore Majority Vote Statistics ===")?;
        writeln!(f, "Execution Time: {} ns", self.tracker.execution_time_ns())?;
        writeln!(f, "Array Accesses: {}", self.tracker.array_accesses())?;
        writeln!(f, "Comparisons: {}", self.tracker.comparisons())?;
        writeln!(f, "Theoretical Complexity: Θ(n)")?;
        write!(f, "Space Complexity: Θ(1)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn run(a: &[i32]) -> Option<MajorityResult<i32>> {
        let mut tracker = OperationTracker::new();
        majority(a, &mut tracker)
    }

    fn element(a: &[i32]) -> Option<i32> {
        run(a).map(|r| r.element())
    }

    /// Counting oracle: (element, count, first, last) of the majority, if any.
    fn oracle(a: &[i32]) -> Option<(i32, usize, usize, usize)> {
        let mut seen: HashMap<i32, (usize, usize, usize)> = HashMap::new();
        for (i, &x) in a.iter().enumerate() {
            seen.entry(x)
                .and_modify(|(count, _, last)| {
                    *count += 1;
                    *last = i;
                })
                .or_insert((1, i, i));
        }
        seen.into_iter()
            .find(|&(_, (count, _, _))| count > a.len() / 2)
            .map(|(x, (count, first, last))| (x, count, first, last))
    }

    #[test]
    fn empty_has_no_majority() {
        let mut tracker = OperationTracker::new();
        let a: [i32; 0] = [];
        assert_eq!(find_majority(Some(&a[..]), &mut tracker).unwrap(), None);
        assert_eq!(tracker.comparisons(), 0);
        assert_eq!(tracker.array_accesses(), 0);
        assert!(!tracker.is_running());
    }

    #[test]
    fn absent_sequence_is_invalid_input() {
        let mut tracker = OperationTracker::new();
        let err = find_majority::<i32>(None, &mut tracker).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = find_majority_element::<u8>(None, &mut tracker).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn single_element_is_majority() {
        let mut tracker = OperationTracker::new();
        let result = majority(&[42], &mut tracker).unwrap();
        assert_eq!(result.element(), 42);
        assert_eq!(result.count(), 1);
        assert_eq!(result.first_position(), 0);
        assert_eq!(result.last_position(), 0);
        assert_eq!(tracker.comparisons(), 0);
        assert_eq!(tracker.array_accesses(), 1);
    }

    #[test]
    fn two_elements() {
        assert_eq!(element(&[5, 5]), Some(5));
        assert_eq!(element(&[3, 7]), None);
    }

    #[test]
    fn typical_majority_exists() {
        assert_eq!(element(&[1, 1, 1, 1, 1]), Some(1));
        assert_eq!(element(&[4, 4, 4, 2, 1]), Some(4));
        assert_eq!(element(&[1, 2, 3, 3, 3]), Some(3));
        assert_eq!(element(&[2, 1, 2, 3, 2, 4, 2]), Some(2));
        assert_eq!(element(&[1, 2, 1, 2, 1, 2, 1]), Some(1));
    }

    #[test]
    fn no_majority() {
        assert_eq!(element(&[1, 2, 3, 4, 5]), None);
        assert_eq!(element(&[1, 2, 3]), None);
    }

    #[test]
    fn exactly_half_is_not_majority() {
        assert_eq!(run(&[1, 1, 2, 2]), None);
        assert_eq!(run(&[2, 1, 2, 1, 3, 2]), None);
    }

    #[test]
    fn just_over_half_is_majority() {
        let result = run(&[1, 1, 1, 2, 2]).unwrap();
        assert_eq!(result.element(), 1);
        assert_eq!(result.count(), 3);
        assert!(result.count() > 5 / 2);
    }

    #[test]
    fn negative_and_zero_values() {
        assert_eq!(element(&[-3, -3, -3, 1, 2]), Some(-3));
        assert_eq!(element(&[0, 0, 0, 1, 2]), Some(0));
        assert_eq!(element(&[-1, 2, -1, 3, -1, 4, -1]), Some(-1));
    }

    #[test]
    fn other_integer_types() {
        let mut tracker = OperationTracker::new();
        assert_eq!(majority(&[7u8, 1, 7], &mut tracker).map(|r| r.element()), Some(7));
        assert_eq!(
            majority(&[u64::MAX, 0, u64::MAX], &mut tracker).map(|r| r.element()),
            Some(u64::MAX)
        );
        assert_eq!(
            majority(&[i64::MIN, i64::MIN, 0, 1], &mut tracker),
            None
        );
    }

    #[test]
    fn position_tracking() {
        let result = run(&[1, 2, 3, 3, 3, 2, 3]).unwrap();
        assert_eq!(result.element(), 3);
        assert_eq!(result.count(), 4);
        assert_eq!(result.first_position(), 2);
        assert_eq!(result.last_position(), 6);
        assert_eq!(result.to_string(), "Majority: 3 (count=4, first@2, last@6)");

        let result = run(&[7, 7, 7, 7]).unwrap();
        assert_eq!(result.first_position(), 0);
        assert_eq!(result.last_position(), 3);
        assert_eq!(result.count(), 4);
    }

    #[test]
    fn result_serializes_verified_fields() {
        let result = run(&[1, 2, 3, 3, 3, 2, 3]).unwrap();
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "element": 3,
                "count": 4,
                "first_position": 2,
                "last_position": 6,
            })
        );
    }

    #[test]
    fn charges_for_uniform_input() {
        // Voting: 3 x 2 comparisons. Verification: 4 + 1.
        let mut tracker = OperationTracker::new();
        majority(&[7, 7, 7, 7], &mut tracker);
        assert_eq!(tracker.comparisons(), 11);
        assert_eq!(tracker.array_accesses(), 8);
        assert_eq!(tracker.swaps(), 0);
        assert_eq!(tracker.memory_allocations(), 0);
    }

    #[test]
    fn charges_for_candidate_replacement() {
        // [1, 2, 3]: the count drops to zero at 2, so 3 replaces the
        // candidate with a single comparison. 2 + 1 in voting, 3 + 1 in
        // verification, which then rejects 3.
        let mut tracker = OperationTracker::new();
        assert_eq!(majority(&[1, 2, 3], &mut tracker), None);
        assert_eq!(tracker.comparisons(), 7);
        assert_eq!(tracker.array_accesses(), 6);
    }

    #[test]
    fn tracker_is_reset_between_calls() {
        let mut tracker = OperationTracker::new();
        tracker.add_swaps(9);
        majority(&[1, 1, 2], &mut tracker);
        let first = (tracker.comparisons(), tracker.array_accesses());
        majority(&[1, 1, 2], &mut tracker);
        assert_eq!((tracker.comparisons(), tracker.array_accesses()), first);
        assert_eq!(tracker.swaps(), 0);
        assert!(!tracker.is_running());
    }

    #[test]
    fn large_input_majority() {
        let mut v: Vec<i32> = vec![1; 5001];
        v.extend((5001..10001).map(|i| i % 100));
        assert_eq!(element(&v), Some(1));

        let v: Vec<i32> = (0..10_000).map(|i| i % 100).collect();
        assert_eq!(element(&v), None);
    }

    #[test]
    fn adversarial_alternating_then_burst() {
        let mut v: Vec<i32> = (0..1001).map(|i| if i < 501 { 1 } else { i % 2 }).collect();
        assert_eq!(element(&v), Some(1));

        v.clear();
        for _ in 0..5000 {
            v.push(1);
            v.push(2);
        }
        v.extend(std::iter::repeat(2).take(5001));
        assert_eq!(element(&v), Some(2));
    }

    #[test]
    fn all_same_property() {
        for size in 1..=100 {
            let v = vec![size as i32 * 7 % 1000; size];
            let result = run(&v).unwrap();
            assert_eq!(result.element(), v[0], "failed for size {size}");
            assert_eq!(result.count(), size);
            assert_eq!(result.last_position(), size - 1);
        }
    }

    #[test]
    fn operations_scale_linearly() {
        let sizes = [100usize, 200, 400, 800];
        let mut vote = MajorityVote::new();
        let operations: Vec<u64> = sizes
            .iter()
            .map(|&n| {
                let v: Vec<i32> = (0..n)
                    .map(|j| if j < n / 2 + 1 { 1 } else { j as i32 })
                    .collect();
                vote.find_majority_element(Some(&v[..])).unwrap();
                vote.tracker().comparisons() + vote.tracker().array_accesses()
            })
            .collect();

        for i in 0..sizes.len() - 1 {
            let op_ratio = operations[i + 1] as f64 / operations[i] as f64;
            let size_ratio = sizes[i + 1] as f64 / sizes[i] as f64;
            assert!(
                (op_ratio - size_ratio).abs() < 0.5,
                "operations not scaling linearly at size {}",
                sizes[i]
            );
        }
    }

    #[test]
    fn memory_allocations_independent_of_size() {
        let mut vote = MajorityVote::new();
        vote.majority(&vec![1; 100]);
        let small = vote.tracker().memory_allocations();
        vote.majority(&vec![1; 10_000]);
        let large = vote.tracker().memory_allocations();
        assert_eq!(small, large);
    }

    #[test]
    fn majority_vote_wrapper() {
        let mut tracker = OperationTracker::new();
        tracker.save_snapshot(0);
        let mut vote = MajorityVote::with_tracker(tracker);

        assert_eq!(vote.find_majority_element(Some(&[9, 9, 1][..])).unwrap(), Some(9));
        vote.tracker_mut().save_snapshot(3);

        let stats = vote.statistics().to_string();
        assert!(stats.contains("Array Accesses: 6"));
        assert!(stats.contains("Space Complexity: Θ(1)"));

        let tracker = vote.into_tracker();
        assert_eq!(tracker.snapshots().len(), 2);
        assert_eq!(tracker.snapshots()[1].input_size, 3);
    }

    proptest! {
        #[test]
        fn prop_matches_counting_oracle(v in prop::collection::vec(0i32..3, 0..100)) {
            let mut tracker = OperationTracker::new();
            let found = majority(&v, &mut tracker)
                .map(|r| (r.element(), r.count(), r.first_position(), r.last_position()));
            prop_assert_eq!(found, oracle(&v));
            if let Some((_, count, first, last)) = found {
                prop_assert!(count > v.len() / 2);
                prop_assert!(first <= last);
            }
        }

        #[test]
        fn prop_planted_majority_is_found(
            value in any::<i64>(),
            noise in prop::collection::vec(any::<i64>(), 0..50),
            extra in 1usize..10,
            seed in any::<u64>(),
        ) {
            use rand::seq::SliceRandom;
            use rand::SeedableRng;

            let noise: Vec<i64> = noise.into_iter().filter(|&x| x != value).collect();
            let mut v = vec![value; noise.len() + extra];
            v.extend(noise);
            v.shuffle(&mut rand::rngs::StdRng::seed_from_u64(seed));

            let mut tracker = OperationTracker::new();
            let result = majority(&v, &mut tracker).unwrap();
            prop_assert_eq!(result.element(), value);
            prop_assert_eq!(result.count(), v.iter().filter(|&&x| x == value).count());
            prop_assert_eq!(Some(result.first_position()), v.iter().position(|&x| x == value));
            prop_assert_eq!(Some(result.last_position()), v.iter().rposition(|&x| x == value));
            prop_assert_eq!(tracker.array_accesses(), if v.len() == 1 { 1 } else { 2 * v.len() as u64 });
        }
    }
}
