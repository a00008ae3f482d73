use thiserror::Error;

use crate::core::node::NodeId;

/// Failures surfaced while a measurement pass is due.
///
/// All variants describe a violated markup contract between the view and the
/// measurement adapter (or a misbehaving clamp primitive). None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClampError {
    #[error("truncation target with class '{class}' is not present in the rendered tree")]
    MissingTarget { class: &'static str },

    #[error("toggle affordance with class '{class}' is not present under node {target}")]
    MissingAffordance { target: NodeId, class: &'static str },

    #[error("clamp primitive did not append a '{class}' marker as the last child of node {target}")]
    MissingMarker { target: NodeId, class: String },

    #[error("clamp primitive returned without reporting a result for node {target}")]
    NoClampResult { target: NodeId },

    #[error("node {0} does not exist in this tree")]
    UnknownNode(NodeId),
}

impl ClampError {
    #[must_use]
    pub fn missing_marker(target: NodeId, class: impl Into<String>) -> Self {
        Self::MissingMarker {
            target,
            class: class.into(),
        }
    }
}
