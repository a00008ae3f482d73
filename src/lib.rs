//! Line-clamped "see more / see less" text for inline terminal UIs.
//!
//! Invariant: a measurement pass only ever runs against a freshly rendered, unclamped
//! tree. Every change that could move the cut point (content, line limit, truncation
//! flag, viewport width) goes through a reset that forces one unclamped commit first.
//!
//! # Public API Overview
//! - Build a [`TruncateMultiline`] from [`TruncateOptions`] and render it like any other
//!   [`Component`].
//! - Drive commits explicitly with [`TruncateMultiline::commit`] when embedding the
//!   widget in a host that owns its own render loop.
//! - Plug in a different measurement primitive through [`LineClamp`].
//! - Deliver viewport changes with [`ResizeBus`].

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod runtime;
pub mod widgets;

/// Attribute values and change detection.
pub use crate::core::attrs::{attr_changed, AttrValue, RichSpan};
/// Lifecycle callback capability.
pub use crate::core::callback::Callback;
/// Clamp primitive contract and the default cell-width clamp.
pub use crate::core::clamp::{LineClamp, WrapClamp, DEFAULT_ELLIPSIS};
/// Runtime component trait.
pub use crate::core::component::Component;
/// Owned render tree.
pub use crate::core::node::{NodeId, NodeKind, NodeTree};

pub use crate::config::EnvConfig;
pub use crate::error::ClampError;

/// Resize delivery and post-commit deferral.
pub use crate::runtime::resize::{ResizeBus, ResizeOptions, ResizeSubscription};
pub use crate::runtime::scheduler::RenderScheduler;
/// Truncation state machine and measurement adapter.
pub use crate::runtime::measure::{
    MeasureOutcome, BUTTON_CLASS, LAST_LINE_CLASS, TARGET_CLASS, WRAPPER_CLASS,
};
pub use crate::runtime::truncation::{
    CommitOutcome, ConfigChange, MeasureStats, MeasureTicket, ToggleDirection, ToggleOutcome,
    TruncationMachine, TruncationPhase,
};

/// Built-in widgets.
pub use crate::widgets::{CommitReport, TruncateMultiline, TruncateOptions};

/// Visible width helper.
pub use crate::core::text::width::visible_width;
/// Word-wrapping helper.
pub use crate::core::text::wrap::wrap_words;
