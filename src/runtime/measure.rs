//! Measurement adapter: runs the clamp primitive and moves the toggle affordance
//! onto the clamped last line.
//!
//! After a successful pass the target ends with:
//!
//! ```text
//! <target>
//!   ...remaining content...
//!   <wrapper>
//!     <last-line marker/>
//!     <affordance/>
//!   </wrapper>
//! </target>
//! ```
//!
//! The affordance node is moved, never copied.

use crate::core::clamp::LineClamp;
use crate::core::node::{NodeId, NodeTree};
use crate::error::ClampError;

pub const TARGET_CLASS: &str = "truncate-multiline--truncation-target";
pub const BUTTON_CLASS: &str = "truncate-multiline--button";
pub const LAST_LINE_CLASS: &str = "truncate-multiline--last-line";
pub const WRAPPER_CLASS: &str = "truncate-multiline--last-line-wrapper";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureOutcome {
    pub did_truncate: bool,
    pub target: NodeId,
    pub marker: NodeId,
    pub wrapper: NodeId,
    pub affordance: NodeId,
}

/// Locate the truncation target at or under `root`.
pub fn find_target(tree: &NodeTree, root: NodeId) -> Result<NodeId, ClampError> {
    if tree.has_class(root, TARGET_CLASS) {
        return Ok(root);
    }
    tree.find_by_class(root, TARGET_CLASS)
        .ok_or(ClampError::MissingTarget {
            class: TARGET_CLASS,
        })
}

pub fn measure(
    tree: &mut NodeTree,
    root: NodeId,
    max_lines: usize,
    clamp: &mut dyn LineClamp,
) -> Result<MeasureOutcome, ClampError> {
    let target = find_target(tree, root)?;
    let affordance =
        tree.find_by_class(target, BUTTON_CLASS)
            .ok_or(ClampError::MissingAffordance {
                target,
                class: BUTTON_CLASS,
            })?;

    tree.detach(affordance)?;
    match clamp_detached(tree, target, max_lines, clamp) {
        Ok((did_truncate, marker)) => {
            let wrapper = tree.create_element(&[WRAPPER_CLASS]);
            tree.append_child(wrapper, marker)?;
            tree.append_child(wrapper, affordance)?;
            tree.append_child(target, wrapper)?;
            Ok(MeasureOutcome {
                did_truncate,
                target,
                marker,
                wrapper,
                affordance,
            })
        }
        Err(err) => {
            // Put the affordance back so the host still sees a complete tree.
            tree.append_child(target, affordance)?;
            Err(err)
        }
    }
}

fn clamp_detached(
    tree: &mut NodeTree,
    target: NodeId,
    max_lines: usize,
    clamp: &mut dyn LineClamp,
) -> Result<(bool, NodeId), ClampError> {
    let mut result = None;
    clamp.clamp(
        tree,
        target,
        max_lines,
        &mut |did_truncate| result = Some(did_truncate),
        LAST_LINE_CLASS,
    )?;
    let did_truncate = result.ok_or(ClampError::NoClampResult { target })?;

    let marker = tree
        .last_child(target)
        .filter(|marker| tree.has_class(*marker, LAST_LINE_CLASS))
        .ok_or_else(|| ClampError::missing_marker(target, LAST_LINE_CLASS))?;
    tree.detach(marker)?;
    Ok((did_truncate, marker))
}

#[cfg(test)]
mod tests {
    use super::{
        measure, BUTTON_CLASS, LAST_LINE_CLASS, TARGET_CLASS, WRAPPER_CLASS,
    };
    use crate::core::clamp::{LineClamp, WrapClamp};
    use crate::core::node::{NodeId, NodeTree};
    use crate::error::ClampError;

    fn fixture(text: &str) -> (NodeTree, NodeId, NodeId) {
        let mut tree = NodeTree::new();
        let target = tree.create_element(&[TARGET_CLASS]);
        let content = tree.create_text(text);
        // Affordance placed before the content on purpose.
        let button = tree.create_element(&[BUTTON_CLASS]);
        let label = tree.create_text(" more");
        tree.append_child(button, label).unwrap();
        tree.append_child(target, button).unwrap();
        tree.append_child(target, content).unwrap();
        (tree, target, button)
    }

    #[test]
    fn affordance_follows_marker_inside_wrapper() {
        let (mut tree, target, button) = fixture("alpha beta gamma delta epsilon zeta");
        let outcome = measure(&mut tree, target, 1, &mut WrapClamp::new(12)).unwrap();

        assert!(outcome.did_truncate);
        assert_eq!(tree.last_child(target), Some(outcome.wrapper));
        assert!(tree.has_class(outcome.wrapper, WRAPPER_CLASS));
        assert_eq!(tree.children(outcome.wrapper), &[outcome.marker, button]);
        assert_eq!(tree.count_class(target, BUTTON_CLASS), 1);
        assert!(tree.text_content(target).ends_with("… more"));
    }

    #[test]
    fn wrapper_is_built_when_content_fits() {
        let (mut tree, target, button) = fixture("fits");
        let outcome = measure(&mut tree, target, 3, &mut WrapClamp::new(40)).unwrap();

        assert!(!outcome.did_truncate);
        assert_eq!(tree.children(outcome.wrapper), &[outcome.marker, button]);
        assert_eq!(tree.text_content(target), "fits more");
    }

    #[test]
    fn missing_affordance_is_an_error() {
        let mut tree = NodeTree::new();
        let target = tree.create_element(&[TARGET_CLASS]);
        let err = measure(&mut tree, target, 3, &mut WrapClamp::new(40)).unwrap_err();
        assert_eq!(
            err,
            ClampError::MissingAffordance {
                target,
                class: BUTTON_CLASS
            }
        );
    }

    #[test]
    fn missing_target_is_an_error() {
        let mut tree = NodeTree::new();
        let root = tree.create_element(&["unrelated"]);
        let err = measure(&mut tree, root, 3, &mut WrapClamp::new(40)).unwrap_err();
        assert!(matches!(err, ClampError::MissingTarget { .. }));
    }

    struct SilentClamp;

    impl LineClamp for SilentClamp {
        fn clamp(
            &mut self,
            tree: &mut NodeTree,
            element: NodeId,
            _max_lines: usize,
            _on_result: &mut dyn FnMut(bool),
            last_line_class: &str,
        ) -> Result<(), ClampError> {
            let marker = tree.create_element(&[last_line_class]);
            tree.append_child(element, marker)
        }
    }

    #[test]
    fn clamp_without_result_restores_affordance() {
        let (mut tree, target, button) = fixture("text");
        let err = measure(&mut tree, target, 3, &mut SilentClamp).unwrap_err();
        assert_eq!(err, ClampError::NoClampResult { target });
        assert_eq!(tree.parent(button), Some(target));
        assert_eq!(tree.count_class(target, LAST_LINE_CLASS), 1);
    }
}
