#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tape_clamp::{ClampError, LineClamp, NodeId, NodeTree};

/// What the clamp saw on one call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClampCall {
    pub max_lines: usize,
    pub text: String,
}

/// Clamp double that reports a scripted overflow result and records each call.
///
/// Content is left untouched; only the marker is appended.
pub struct ScriptedClamp {
    overflow: Rc<Cell<bool>>,
    calls: Rc<RefCell<Vec<ClampCall>>>,
    append_marker: bool,
}

#[derive(Clone)]
pub struct ClampProbe {
    overflow: Rc<Cell<bool>>,
    calls: Rc<RefCell<Vec<ClampCall>>>,
}

impl ClampProbe {
    pub fn calls(&self) -> Vec<ClampCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_text(&self) -> Option<String> {
        self.calls.borrow().last().map(|call| call.text.clone())
    }

    pub fn set_overflow(&self, overflow: bool) {
        self.overflow.set(overflow);
    }
}

impl ScriptedClamp {
    pub fn new(overflow: bool) -> (Self, ClampProbe) {
        let overflow = Rc::new(Cell::new(overflow));
        let calls = Rc::new(RefCell::new(Vec::new()));
        let probe = ClampProbe {
            overflow: Rc::clone(&overflow),
            calls: Rc::clone(&calls),
        };
        (
            Self {
                overflow,
                calls,
                append_marker: true,
            },
            probe,
        )
    }

    /// A clamp that breaks the contract by never appending its marker.
    pub fn without_marker() -> (Self, ClampProbe) {
        let (mut clamp, probe) = Self::new(true);
        clamp.append_marker = false;
        (clamp, probe)
    }
}

impl LineClamp for ScriptedClamp {
    fn clamp(
        &mut self,
        tree: &mut NodeTree,
        element: NodeId,
        max_lines: usize,
        on_result: &mut dyn FnMut(bool),
        last_line_class: &str,
    ) -> Result<(), ClampError> {
        self.calls.borrow_mut().push(ClampCall {
            max_lines,
            text: tree.text_content(element),
        });
        let overflow = self.overflow.get();
        if self.append_marker {
            let marker = tree.create_element(&[last_line_class]);
            if overflow {
                let ellipsis = tree.create_text("…");
                tree.append_child(marker, ellipsis)?;
            }
            tree.append_child(element, marker)?;
        }
        on_result(overflow);
        Ok(())
    }
}
