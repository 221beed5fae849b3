//! Myers diff algorithm.

use std::ops::{Index, IndexMut};

use super::optimization::{
    coalesce_operations, common_affixes, common_prefix_len, common_suffix_len,
};
use crate::diff::{DiffAlgorithm, DiffOp};

/// Myers diff algorithm over lines.
///
/// Common leading and trailing lines are stripped before the edit graph is
/// searched. The search itself runs in `O((N + M) D)` time and `O(N + M)`
/// space, so large inputs with many scattered changes stay cheap to hold.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyersDiff;

impl MyersDiff {
    /// Creates new instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DiffAlgorithm for MyersDiff {
    fn diff(&self, base: &[&str], target: &[&str]) -> Vec<DiffOp> {
        if base.is_empty() && target.is_empty() {
            return Vec::new();
        }

        let (prefix, suffix) = common_affixes(base, target);
        let (base_end, target_end) = (base.len() - suffix, target.len() - suffix);

        let mut ops = Vec::new();
        if prefix > 0 {
            ops.push(DiffOp::Equal {
                old_start: 0,
                old_end: prefix,
                new_start: 0,
                new_end: prefix,
            });
        }

        let ses = compute_ses(&base[prefix..base_end], &target[prefix..target_end]);
        ops.extend(convert_ses_to_diff_ops(&ses, prefix, prefix));

        if suffix > 0 {
            ops.push(DiffOp::Equal {
                old_start: base_end,
                old_end: base.len(),
                new_start: target_end,
                new_end: target.len(),
            });
        }

        coalesce_operations(&mut ops);
        ops
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditOp {
    Insert,
    Delete,
    Keep,
}

/// Computes the shortest edit script between two line sequences.
///
/// Uses the linear space refinement: the middle snake of the edit graph is
/// found with a forward and a backward search, then both halves are solved
/// recursively. Only two frontiers of `O(N + M)` entries are kept alive.
pub(crate) fn compute_ses(base: &[&str], target: &[&str]) -> Vec<EditOp> {
    let mut ses = Vec::with_capacity(base.len() + target.len());
    let max_d = max_d(base.len(), target.len());
    let mut forward = Frontier::new(max_d);
    let mut backward = Frontier::new(max_d);
    conquer(base, target, &mut forward, &mut backward, &mut ses);
    ses
}

/// Upper bound on the rounds the middle snake search needs.
const fn max_d(n: usize, m: usize) -> usize {
    (n + m).div_ceil(2) + 1
}

/// Furthest x reached on each diagonal `k`, indexable by negative `k`.
#[derive(Debug)]
struct Frontier {
    offset: isize,
    v: Vec<usize>,
}

impl Frontier {
    #[allow(clippy::cast_possible_wrap)]
    fn new(max_d: usize) -> Self {
        Self {
            offset: max_d as isize,
            v: vec![0; 2 * max_d + 1],
        }
    }
}

impl Index<isize> for Frontier {
    type Output = usize;

    #[allow(clippy::cast_sign_loss)]
    fn index(&self, k: isize) -> &usize {
        &self.v[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    #[allow(clippy::cast_sign_loss)]
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.v[(k + self.offset) as usize]
    }
}

fn push_run(ses: &mut Vec<EditOp>, op: EditOp, count: usize) {
    ses.extend(std::iter::repeat_n(op, count));
}

/// Appends the edit script of `base` against `target` to `ses`.
fn conquer(
    base: &[&str],
    target: &[&str],
    forward: &mut Frontier,
    backward: &mut Frontier,
    ses: &mut Vec<EditOp>,
) {
    let (prefix, suffix) = common_affixes(base, target);
    push_run(ses, EditOp::Keep, prefix);
    let base = &base[prefix..base.len() - suffix];
    let target = &target[prefix..target.len() - suffix];

    if base.is_empty() {
        push_run(ses, EditOp::Insert, target.len());
    } else if target.is_empty() {
        push_run(ses, EditOp::Delete, base.len());
    } else {
        match middle_snake(base, target, forward, backward) {
            Some((x, y)) if (x, y) != (0, 0) && (x, y) != (base.len(), target.len()) => {
                conquer(&base[..x], &target[..y], forward, backward, ses);
                conquer(&base[x..], &target[y..], forward, backward, ses);
            }
            // A split at either corner would not shrink the problem.
            _ => {
                push_run(ses, EditOp::Delete, base.len());
                push_run(ses, EditOp::Insert, target.len());
            }
        }
    }

    push_run(ses, EditOp::Keep, suffix);
}

/// Finds a point on an optimal path roughly halfway through the edit graph.
///
/// Both inputs must be non-empty. The forward frontier is indexed by
/// diagonal `k = x - y`, the backward one by the same diagonal measured from
/// the end point, so the two meet where `forward[k] + backward[delta - k]`
/// reaches `n`.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn middle_snake(
    base: &[&str],
    target: &[&str],
    forward: &mut Frontier,
    backward: &mut Frontier,
) -> Option<(usize, usize)> {
    let (n, m) = (base.len(), target.len());
    let delta = n as isize - m as isize;
    let odd = delta & 1 == 1;
    forward[1] = 0;
    backward[1] = 0;

    for d in 0..max_d(n, m) as isize {
        for k in (-d..=d).step_by(2) {
            let mut x = if k == -d || (k != d && forward[k - 1] < forward[k + 1]) {
                forward[k + 1]
            } else {
                forward[k - 1] + 1
            };
            let y = (x as isize - k) as usize;
            let start = (x, y);
            if x < n && y < m {
                x += common_prefix_len(&base[x..], &target[y..]);
            }
            forward[k] = x;
            if odd && (k - delta).abs() < d && forward[k] + backward[delta - k] >= n {
                return Some(start);
            }
        }

        for k in (-d..=d).step_by(2) {
            let mut x = if k == -d || (k != d && backward[k - 1] < backward[k + 1]) {
                backward[k + 1]
            } else {
                backward[k - 1] + 1
            };
            let mut y = (x as isize - k) as usize;
            if x < n && y < m {
                let run = common_suffix_len(&base[..n - x], &target[..m - y]);
                x += run;
                y += run;
            }
            backward[k] = x;
            if !odd && (k - delta).abs() <= d && backward[k] + forward[delta - k] >= n {
                return Some((n - x, m - y));
            }
        }
    }

    None
}

/// Groups an edit script into runs, shifting indices by the trimmed prefix.
pub(crate) fn convert_ses_to_diff_ops(
    ses: &[EditOp],
    base_offset: usize,
    target_offset: usize,
) -> Vec<DiffOp> {
    let (mut ops, mut bi, mut ti) = (Vec::new(), base_offset, target_offset);
    let mut equal_from: Option<(usize, usize)> = None;
    let mut change_from: Option<(usize, usize)> = None;

    for edit in ses {
        match edit {
            EditOp::Keep => {
                if let Some((bs, ts)) = change_from.take() {
                    ops.extend(DiffOp::change(Some((bs, bi)), Some((ts, ti))));
                }
                equal_from.get_or_insert((bi, ti));
                bi += 1;
                ti += 1;
            }
            EditOp::Delete | EditOp::Insert => {
                if let Some((bs, ts)) = equal_from.take() {
                    ops.push(DiffOp::Equal {
                        old_start: bs,
                        old_end: bi,
                        new_start: ts,
                        new_end: ti,
                    });
                }
                change_from.get_or_insert((bi, ti));
                if *edit == EditOp::Delete {
                    bi += 1;
                } else {
                    ti += 1;
                }
            }
        }
    }

    if let Some((bs, ts)) = equal_from {
        ops.push(DiffOp::Equal {
            old_start: bs,
            old_end: bi,
            new_start: ts,
            new_end: ti,
        });
    }
    if let Some((bs, ts)) = change_from {
        ops.extend(DiffOp::change(Some((bs, bi)), Some((ts, ti))));
    }
    ops
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.split_inclusive('\n').collect()
    }

    #[test]
    fn test_identical_is_single_equal() {
        let a = lines("a\nb\nc\n");
        let ops = MyersDiff::new().diff(&a, &a);
        assert_eq!(
            ops,
            vec![DiffOp::Equal {
                old_start: 0,
                old_end: 3,
                new_start: 0,
                new_end: 3,
            }]
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(MyersDiff::new().diff(&[], &[]).is_empty());
        assert_eq!(
            MyersDiff::new().diff(&[], &["x\n"]),
            vec![DiffOp::Insert {
                new_start: 0,
                new_end: 1,
            }]
        );
        assert_eq!(
            MyersDiff::new().diff(&["x\n"], &[]),
            vec![DiffOp::Delete {
                old_start: 0,
                old_end: 1,
            }]
        );
    }

    #[test]
    fn test_substitution_in_middle() {
        let ops = MyersDiff::new().diff(&lines("a\nb\nc\n"), &lines("a\nx\nc\n"));
        assert_eq!(
            ops,
            vec![
                DiffOp::Equal {
                    old_start: 0,
                    old_end: 1,
                    new_start: 0,
                    new_end: 1,
                },
                DiffOp::Replace {
                    old_start: 1,
                    old_end: 2,
                    new_start: 1,
                    new_end: 2,
                },
                DiffOp::Equal {
                    old_start: 2,
                    old_end: 3,
                    new_start: 2,
                    new_end: 3,
                },
            ]
        );
    }

    #[test]
    fn test_inner_common_line_splits_changes() {
        let base = lines("a\nb\nc\nd\ne\n");
        let target = lines("a\nB\nc\nD\ne\n");
        let ops = MyersDiff::new().diff(&base, &target);
        let changes: Vec<_> = ops.iter().filter(|op| op.is_change()).collect();
        assert_eq!(changes.len(), 2);
        assert_eq!(ops.len(), 5);
    }

    #[test]
    fn test_edit_script_covers_both_inputs() {
        let base = lines("one\ntwo\nthree\nfour\n");
        let target = lines("zero\none\nthree\nfive\nfour\n");
        let ses = compute_ses(&base, &target);
        let kept = ses.iter().filter(|e| **e == EditOp::Keep).count();
        let deleted = ses.iter().filter(|e| **e == EditOp::Delete).count();
        let inserted = ses.iter().filter(|e| **e == EditOp::Insert).count();
        assert_eq!(kept + deleted, base.len());
        assert_eq!(kept + inserted, target.len());
        assert_eq!(kept, 3);
    }

    /// Every odd line changes, so the edit graph has no long snakes at all.
    fn alternating(count: usize) -> (Vec<String>, Vec<String>) {
        (0..count)
            .map(|i| {
                if i % 2 == 0 {
                    (format!("keep{i}\n"), format!("keep{i}\n"))
                } else {
                    (format!("old{i}\n"), format!("new{i}\n"))
                }
            })
            .unzip()
    }

    #[test]
    fn test_scattered_changes_in_large_input() {
        let (base, target) = alternating(4000);
        let base: Vec<&str> = base.iter().map(String::as_str).collect();
        let target: Vec<&str> = target.iter().map(String::as_str).collect();

        let ses = compute_ses(&base, &target);
        let kept = ses.iter().filter(|e| **e == EditOp::Keep).count();
        assert_eq!(kept, 2000);
        assert_eq!(ses.len(), 2000 + 2 * 2000);

        let ops = MyersDiff::new().diff(&base, &target);
        assert_eq!(ops.len(), 4000);
        for (i, op) in ops.iter().enumerate() {
            assert_eq!(op.is_change(), i % 2 == 1, "op {i}: {op:?}");
            assert_eq!(op.old_range(), Some((i, i + 1)));
        }
    }

    #[test]
    fn test_frontiers_scale_with_input_length() {
        let forward = Frontier::new(max_d(4000, 4000));
        assert_eq!(forward.v.len(), 2 * 4001 + 1);
    }

    /// Longest common subsequence length by dynamic programming.
    fn lcs_len(base: &[&str], target: &[&str]) -> usize {
        let mut row = vec![0; target.len() + 1];
        for a in base {
            let mut diagonal = 0;
            for (j, b) in target.iter().enumerate() {
                let above = row[j + 1];
                row[j + 1] = if a == b {
                    diagonal + 1
                } else {
                    above.max(row[j])
                };
                diagonal = above;
            }
        }
        row[target.len()]
    }

    proptest! {
        /// Property: the script keeps as many lines as the longest common subsequence.
        #[test]
        fn edit_script_is_shortest(
            base in prop::collection::vec(prop::sample::select(vec!["a\n", "b\n", "c\n"]), 0..24),
            target in prop::collection::vec(prop::sample::select(vec!["a\n", "b\n", "c\n"]), 0..24),
        ) {
            let ses = compute_ses(&base, &target);
            let kept = ses.iter().filter(|e| **e == EditOp::Keep).count();
            let deleted = ses.iter().filter(|e| **e == EditOp::Delete).count();
            let inserted = ses.iter().filter(|e| **e == EditOp::Insert).count();
            prop_assert_eq!(kept + deleted, base.len());
            prop_assert_eq!(kept + inserted, target.len());
            prop_assert_eq!(kept, lcs_len(&base, &target));

            let (mut bi, mut ti) = (0, 0);
            for edit in &ses {
                match edit {
                    EditOp::Keep => {
                        prop_assert_eq!(base[bi], target[ti]);
                        bi += 1;
                        ti += 1;
                    }
                    EditOp::Delete => bi += 1,
                    EditOp::Insert => ti += 1,
                }
            }
        }
    }
}
