//! Myers diff algorithm optimizations.
//!
//! Pre-processing that shrinks the edit graph and post-processing that
//! normalizes the resulting operations.

use crate::diff::DiffOp;

/// Number of leading lines shared by both sequences.
pub(crate) fn common_prefix_len(base: &[&str], target: &[&str]) -> usize {
    base.iter()
        .zip(target)
        .take_while(|(a, b)| a == b)
        .count()
}

/// Number of trailing lines shared by both sequences.
pub(crate) fn common_suffix_len(base: &[&str], target: &[&str]) -> usize {
    base.iter()
        .rev()
        .zip(target.iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Counts the lines shared at the start and at the end of both sequences.
///
/// The suffix never overlaps the prefix.
pub(crate) fn common_affixes(base: &[&str], target: &[&str]) -> (usize, usize) {
    let prefix = common_prefix_len(base, target);
    let suffix = common_suffix_len(&base[prefix..], &target[prefix..]);
    (prefix, suffix)
}

/// Coalesces consecutive operations of the same kind.
///
/// Adjacent `Equal` operations become one `Equal`; any run of adjacent
/// `Insert`/`Delete`/`Replace` operations becomes a single change covering the
/// union of their line ranges.
pub(crate) fn coalesce_operations(ops: &mut Vec<DiffOp>) {
    if ops.len() < 2 {
        return;
    }

    let mut i = 0;
    while i < ops.len() - 1 {
        let merged = match (&ops[i], &ops[i + 1]) {
            (
                DiffOp::Equal {
                    old_start,
                    new_start,
                    ..
                },
                DiffOp::Equal {
                    old_end, new_end, ..
                },
            ) => Some(DiffOp::Equal {
                old_start: *old_start,
                old_end: *old_end,
                new_start: *new_start,
                new_end: *new_end,
            }),
            (a, b) if a.is_change() && b.is_change() => DiffOp::change(
                span(a.old_range(), b.old_range()),
                span(a.new_range(), b.new_range()),
            ),
            _ => None,
        };

        if let Some(op) = merged {
            ops[i] = op;
            ops.remove(i + 1);
        } else {
            i += 1;
        }
    }
}

fn span(first: Option<(usize, usize)>, second: Option<(usize, usize)>) -> Option<(usize, usize)> {
    match (first, second) {
        (Some((start, _)), Some((_, end))) => Some((start, end)),
        (Some(range), None) | (None, Some(range)) => Some(range),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesce_delete_insert_to_replace() {
        let mut ops = vec![
            DiffOp::Delete {
                old_start: 0,
                old_end: 1,
            },
            DiffOp::Insert {
                new_start: 0,
                new_end: 1,
            },
        ];

        coalesce_operations(&mut ops);

        assert_eq!(
            ops,
            vec![DiffOp::Replace {
                old_start: 0,
                old_end: 1,
                new_start: 0,
                new_end: 1
            }]
        );
    }

    #[test]
    fn test_coalesce_insert_then_replace() {
        let mut ops = vec![
            DiffOp::Insert {
                new_start: 2,
                new_end: 3,
            },
            DiffOp::Replace {
                old_start: 2,
                old_end: 4,
                new_start: 3,
                new_end: 4,
            },
        ];

        coalesce_operations(&mut ops);

        assert_eq!(
            ops,
            vec![DiffOp::Replace {
                old_start: 2,
                old_end: 4,
                new_start: 2,
                new_end: 4
            }]
        );
    }

    #[test]
    fn test_equal_runs_merge_but_not_across_changes() {
        let mut ops = vec![
            DiffOp::Equal {
                old_start: 0,
                old_end: 1,
                new_start: 0,
                new_end: 1,
            },
            DiffOp::Equal {
                old_start: 1,
                old_end: 2,
                new_start: 1,
                new_end: 2,
            },
            DiffOp::Delete {
                old_start: 2,
                old_end: 3,
            },
            DiffOp::Equal {
                old_start: 3,
                old_end: 4,
                new_start: 2,
                new_end: 3,
            },
        ];

        coalesce_operations(&mut ops);

        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].old_range(), Some((0, 2)));
    }

    #[test]
    fn test_common_affixes() {
        let base = ["a\n", "b\n", "c\n"];
        let target = ["a\n", "x\n", "c\n"];
        assert_eq!(common_affixes(&base, &target), (1, 1));
        assert_eq!(common_affixes(&base, &base), (3, 0));
        assert_eq!(common_affixes(&["a\n"], &["a\n", "a\n"]), (1, 0));
    }

    #[test]
    fn test_empty_ops() {
        let mut ops: Vec<DiffOp> = vec![];
        coalesce_operations(&mut ops);
        assert!(ops.is_empty());
    }
}
