//! Multi-line truncated text with a see more / see less toggle.
//!
//! Each commit renders widget state into the widget's own [`NodeTree`], then runs the
//! post-render hook and whatever was deferred until after the commit. A measurement
//! pass clamps the rendered tree in place; later commits only patch the toggle label
//! until the next reset forces a fresh, unclamped tree.

use std::cell::Cell;
use std::rc::Rc;

use crate::core::clamp::{LineClamp, WrapClamp};
use crate::core::component::Component;
use crate::core::node::{NodeId, NodeTree};
use crate::core::text::width::visible_width;
use crate::core::text::wrap::{line_count, wrap_words};
use crate::error::ClampError;
use crate::runtime::measure::{self, BUTTON_CLASS, TARGET_CLASS};
use crate::runtime::resize::{ResizeBus, ResizeOptions, ResizeSubscription};
use crate::runtime::truncation::{
    MeasureStats, ToggleDirection, ToggleOutcome, TruncationMachine, TruncationPhase,
};
use crate::widgets::truncate_options::TruncateOptions;

const DEFAULT_WIDTH: usize = 80;
const MAX_COMMITS_PER_RENDER: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
struct ViewKey {
    intent: bool,
    generation: u64,
    content: String,
}

#[derive(Debug)]
struct RenderedView {
    key: ViewKey,
    root: NodeId,
    affordance: NodeId,
    label: NodeId,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// The tree was rebuilt from scratch rather than patched.
    pub rebuilt: bool,
    /// A measurement pass ran after this commit.
    pub measured: bool,
    /// State changed after the commit; another commit is needed.
    pub rerender: bool,
}

pub struct TruncateMultiline<C: LineClamp = WrapClamp> {
    options: TruncateOptions,
    machine: TruncationMachine,
    clamp: C,
    tree: NodeTree,
    view: Option<RenderedView>,
    last_width: Option<usize>,
    pending_resize: Rc<Cell<bool>>,
    resize_subscription: Option<ResizeSubscription>,
}

impl TruncateMultiline<WrapClamp> {
    pub fn new(options: TruncateOptions) -> Self {
        Self::with_clamp(options, WrapClamp::new(DEFAULT_WIDTH))
    }
}

impl<C: LineClamp> TruncateMultiline<C> {
    pub fn with_clamp(options: TruncateOptions, clamp: C) -> Self {
        let mut machine = TruncationMachine::new(options.truncate);
        machine.apply_config_change(options.changes_from(None));
        Self {
            options,
            machine,
            clamp,
            tree: NodeTree::new(),
            view: None,
            last_width: None,
            pending_resize: Rc::new(Cell::new(false)),
            resize_subscription: None,
        }
    }

    pub fn options(&self) -> &TruncateOptions {
        &self.options
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.view.as_ref().map(|view| view.root)
    }

    pub fn clamp(&self) -> &C {
        &self.clamp
    }

    pub fn clamp_mut(&mut self) -> &mut C {
        &mut self.clamp
    }

    /// Whether the last completed pass found overflow. Only authoritative when
    /// [`is_settled`](Self::is_settled) is `true`.
    pub fn is_truncated(&self) -> bool {
        self.machine.is_truncated()
    }

    pub fn is_settled(&self) -> bool {
        self.machine.is_settled()
    }

    pub fn phase(&self) -> TruncationPhase {
        self.machine.phase()
    }

    /// Current truncation intent, including a restoration that has not run yet.
    pub fn is_truncating(&self) -> bool {
        self.machine.logical_intent()
    }

    pub fn should_show_see_more(&self) -> bool {
        self.options.show_button && self.options.show_see_more_button && self.is_truncated()
    }

    pub fn should_show_see_less(&self) -> bool {
        self.options.show_button && self.options.show_see_less_button && self.is_truncated()
    }

    pub fn stats(&self) -> MeasureStats {
        self.machine.stats()
    }

    /// Replace the options wholesale. Returns whether a reset was requested.
    pub fn update(&mut self, options: TruncateOptions) -> bool {
        let change = options.changes_from(Some(&self.options));
        self.options = options;
        self.machine.apply_config_change(change)
    }

    /// User toggle of the see more / see less affordance.
    ///
    /// The direction callback fires first, then `on_toggle_truncate` with the new
    /// intent. Each fires at most once.
    pub fn toggle(&mut self) -> ToggleOutcome {
        let outcome = self.machine.toggle();
        let direction_callback = match outcome.direction {
            ToggleDirection::Expand => self.options.on_expand.as_mut(),
            ToggleDirection::Collapse => self.options.on_collapse.as_mut(),
        };
        if let Some(callback) = direction_callback {
            callback.call(());
        }
        if let Some(callback) = self.options.on_toggle_truncate.as_mut() {
            callback.call(outcome.now_truncated);
        }
        outcome
    }

    pub fn handle_resize(&mut self) -> bool {
        self.machine.resize()
    }

    /// Request a measurement pass for the next commit. No-op when settled.
    pub fn measure(&mut self) -> bool {
        self.machine.measure()
    }

    /// Listen for viewport resizes. Notifications are applied at the start of the
    /// next commit; several notifications before a commit count as one.
    pub fn subscribe_resize(&mut self, bus: &ResizeBus) {
        let pending = Rc::clone(&self.pending_resize);
        self.resize_subscription = Some(bus.subscribe(
            move || pending.set(true),
            ResizeOptions {
                trigger_on_insert: false,
            },
        ));
    }

    /// Stop listening for resizes.
    pub fn deactivate(&mut self) {
        self.resize_subscription = None;
        self.pending_resize.set(false);
    }

    pub fn is_subscribed(&self) -> bool {
        self.resize_subscription
            .as_ref()
            .is_some_and(ResizeSubscription::is_active)
    }

    /// One render commit followed by post-render work.
    pub fn commit(&mut self) -> Result<CommitReport, ClampError> {
        if self.pending_resize.replace(false) {
            self.machine.resize();
        }

        let rendered_intent = self.machine.intent();
        let rebuilt = self.render_view()?;
        self.machine.post_render(rendered_intent);
        let outcome = self.machine.run_deferred();

        let mut report = CommitReport {
            rebuilt,
            measured: false,
            rerender: outcome.rerender,
        };

        if let Some(ticket) = outcome.measure {
            let root = self.root().ok_or(ClampError::MissingTarget {
                class: TARGET_CLASS,
            })?;
            let reserve = self.reserve_cells();
            self.clamp.reserve_trailing(reserve);
            let result = measure::measure(
                &mut self.tree,
                root,
                self.options.effective_max_lines(),
                &mut self.clamp,
            )?;
            report.measured = self.machine.complete_measure(ticket, result.did_truncate);
            report.rerender |= self.affordance_is_stale();
        }

        Ok(report)
    }

    /// Commit until the widget stops requesting renders, then lay out at `width`.
    pub fn try_render(&mut self, width: usize) -> Result<Vec<String>, ClampError> {
        if self.last_width != Some(width) {
            if self.last_width.is_some() {
                self.machine.resize();
            }
            self.clamp.set_available_width(width);
            self.last_width = Some(width);
        }

        let mut settled = false;
        for _ in 0..MAX_COMMITS_PER_RENDER {
            if !self.commit()?.rerender {
                settled = true;
                break;
            }
        }
        if !settled {
            log::warn!("render budget of {MAX_COMMITS_PER_RENDER} commits exhausted");
        }

        Ok(self.lines(width))
    }

    /// Lay out the last committed tree at `width`.
    pub fn lines(&self, width: usize) -> Vec<String> {
        match self.root() {
            Some(root) => wrap_words(&self.tree.text_content(root), width),
            None => Vec::new(),
        }
    }

    fn reserve_cells(&self) -> usize {
        if self.options.show_button && self.options.show_see_more_button {
            visible_width(&format!(" {}", self.options.see_more_text))
        } else {
            0
        }
    }

    fn desired_label(&self) -> Option<String> {
        let label = if self.machine.intent() {
            self.should_show_see_more()
                .then_some(&self.options.see_more_text)
        } else {
            self.should_show_see_less()
                .then_some(&self.options.see_less_text)
        };
        let label = format!(" {}", label?);
        if self.machine.intent() && !self.label_fits(&label) {
            log::trace!("toggle label hidden: no room on the clamped last line");
            return None;
        }
        Some(label)
    }

    /// Whether `label` can follow the clamped content without adding a line. Content
    /// that already overflows on its own is left to the clamp.
    fn label_fits(&self, label: &str) -> bool {
        let (Some(view), Some(width)) = (&self.view, self.last_width) else {
            return true;
        };
        let content: String = self
            .tree
            .text_nodes(view.root)
            .into_iter()
            .filter(|id| *id != view.label)
            .filter_map(|id| self.tree.text(id))
            .collect();
        let max_lines = self.options.effective_max_lines();
        line_count(&content, width) > max_lines
            || line_count(&format!("{content}{label}"), width) <= max_lines
    }

    fn affordance_is_stale(&self) -> bool {
        let Some(view) = &self.view else {
            return false;
        };
        let desired = self.desired_label();
        self.tree.is_hidden(view.affordance) != desired.is_none()
            || self.tree.text(view.label) != Some(desired.as_deref().unwrap_or_default())
    }

    fn patch_affordance(&mut self) -> Result<(), ClampError> {
        if !self.affordance_is_stale() {
            return Ok(());
        }
        let Some(view) = &self.view else {
            return Ok(());
        };
        let (affordance, label) = (view.affordance, view.label);
        let desired = self.desired_label();
        self.tree.set_hidden(affordance, desired.is_none())?;
        self.tree.set_text(label, desired.unwrap_or_default())
    }

    /// Apply the template. Returns whether the tree was rebuilt.
    fn render_view(&mut self) -> Result<bool, ClampError> {
        let key = ViewKey {
            intent: self.machine.intent(),
            generation: self.machine.generation(),
            content: self.options.content_text(),
        };
        if self.view.as_ref().is_some_and(|view| view.key == key) {
            self.patch_affordance()?;
            return Ok(false);
        }

        if let Some(old) = self.view.take() {
            self.tree.remove(old.root)?;
        }
        let root = self.tree.create_element(&[TARGET_CLASS]);
        if !key.content.is_empty() {
            let text = self.tree.create_text(key.content.clone());
            self.tree.append_child(root, text)?;
        }
        let affordance = self.tree.create_element(&[BUTTON_CLASS]);
        let label = self.tree.create_text("");
        self.tree.append_child(affordance, label)?;
        self.tree.append_child(root, affordance)?;
        self.tree.set_hidden(affordance, true)?;

        log::trace!(
            "view rebuilt (intent {}, generation {})",
            key.intent,
            key.generation
        );
        self.view = Some(RenderedView {
            key,
            root,
            affordance,
            label,
        });
        self.patch_affordance()?;
        Ok(true)
    }
}

impl<C: LineClamp> Component for TruncateMultiline<C> {
    fn render(&mut self, width: usize) -> Vec<String> {
        match self.try_render(width) {
            Ok(lines) => lines,
            Err(err) => {
                log::error!("truncation pass failed: {err}");
                panic!("truncation pass failed: {err}");
            }
        }
    }

    fn invalidate(&mut self) {
        if let Some(view) = self.view.take() {
            if let Err(err) = self.tree.remove(view.root) {
                log::warn!("stale view could not be released: {err}");
            }
        }
        self.machine.reset();
    }
}
