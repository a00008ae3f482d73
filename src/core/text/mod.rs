//! Text helpers (cell widths and word wrapping).
//!
//! These helpers are pure (string in/lines out) so the clamp primitive and the widget
//! layout agree on where a line breaks.

pub mod width;
pub mod wrap;
