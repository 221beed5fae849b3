//! Property-based tests for merge session bookkeeping.
//!
//! Random line-based document pairs are loaded into a session and driven
//! through random selections, merges and abandons; region ranges must keep
//! pointing at the text they describe throughout.

use duplex_differ::difference;
use duplex_kernel::{
    DocumentId, MemoryBuffer, MergeSession, Side, TextBuffer,
    session::{Direction, Placeholder},
};
use proptest::prelude::*;

/// Strategy for small documents over a tiny alphabet, so diffs have both
/// shared and changed lines.
fn document_strategy() -> impl Strategy<Value = String> {
    (prop::collection::vec("[abx]{0,3}", 0..8), any::<bool>()).prop_map(|(lines, trailing)| {
        let mut text = lines.join("\n");
        if trailing && !text.is_empty() {
            text.push('\n');
        }
        text
    })
}

#[derive(Debug, Clone)]
enum Op {
    Select(usize),
    Merge(Direction),
    Abandon(Side),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..6).prop_map(Op::Select),
        prop_oneof![Just(Direction::LeftToRight), Just(Direction::RightToLeft)].prop_map(Op::Merge),
        prop_oneof![Just(Side::Left), Just(Side::Right)].prop_map(Op::Abandon),
    ]
}

fn load(left: &str, right: &str) -> MergeSession {
    let mut session = MergeSession::new(
        MemoryBuffer::new(DocumentId::new(1), left),
        MemoryBuffer::new(DocumentId::new(2), right),
    );
    session.load_diff().unwrap();
    session
}

/// Every unresolved region shows either its own text or the placeholder
/// for the other side's text.
fn assert_regions_point_at_text(session: &MergeSession) -> Result<(), TestCaseError> {
    let placeholder = Placeholder::default();
    for region in session.regions() {
        for side in [Side::Left, Side::Right] {
            let shown = session.buffer(side).slice(region.range(side)).unwrap();
            let own = region.content(side);
            let other = region.content(side.opposite());
            prop_assert!(
                shown == own || (own.is_empty() && placeholder.is_filler_for(&shown, other)),
                "region {} {} shows {:?}",
                region.id(),
                side,
                shown
            );
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: loading creates exactly one region per change part.
    #[test]
    fn region_count_matches_change_parts(left in document_strategy(), right in document_strategy()) {
        let changes = difference(&left, &right).iter().filter(|p| p.is_change()).count();
        let session = load(&left, &right);
        prop_assert_eq!(session.regions().len(), changes);
        prop_assert!(session.verify().is_ok());
        assert_regions_point_at_text(&session)?;
    }

    /// Property: ranges stay consistent through any sequence of operations,
    /// and a merge writes identical text on both sides.
    #[test]
    fn offsets_stay_consistent(
        left in document_strategy(),
        right in document_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..12),
    ) {
        let mut session = load(&left, &right);
        for op in ops {
            match op {
                Op::Select(index) => session.select_diff(index),
                Op::Merge(direction) => {
                    let before = session.regions().len();
                    if let Some(merged) = session.merge(direction).unwrap() {
                        prop_assert_eq!(session.regions().len(), before - 1);
                        let content = merged.content(direction.source());
                        prop_assert_eq!(
                            session.buffer(Side::Left).slice(merged.left_range()).unwrap(),
                            content
                        );
                        prop_assert_eq!(
                            session.buffer(Side::Right).slice(merged.right_range()).unwrap(),
                            content
                        );
                    }
                }
                Op::Abandon(side) => {
                    session.abandon_unmerged_diffs(side).unwrap();
                }
            }
            prop_assert!(session.verify().is_ok());
            assert_regions_point_at_text(&session)?;
        }
    }

    /// Property: abandoning right after loading gives back the source text,
    /// and no placeholder is left on that side.
    #[test]
    fn abandon_restores_source(left in document_strategy(), right in document_strategy()) {
        let mut session = load(&left, &right);
        session.abandon_unmerged_diffs(Side::Left).unwrap();
        session.abandon_unmerged_diffs(Side::Right).unwrap();
        prop_assert_eq!(session.buffer(Side::Left).as_str(), left.as_str());
        prop_assert_eq!(session.buffer(Side::Right).as_str(), right.as_str());
        for region in session.regions() {
            for side in [Side::Left, Side::Right] {
                let shown = session.buffer(side).slice(region.range(side)).unwrap();
                prop_assert_eq!(shown.as_str(), region.content(side));
            }
        }
        prop_assert_eq!(session.abandon_unmerged_diffs(Side::Left).unwrap(), 0);
    }

    /// Property: merging every region one way makes both buffers equal to
    /// the source side's document.
    #[test]
    fn merging_everything_converges(left in document_strategy(), right in document_strategy()) {
        let mut session = load(&left, &right);
        while session.merge(Direction::RightToLeft).unwrap().is_some() {}
        prop_assert!(session.regions().is_empty());
        prop_assert_eq!(session.buffer(Side::Left).as_str(), right.as_str());
        prop_assert_eq!(session.buffer(Side::Right).as_str(), right.as_str());
    }
}
