//! Line-clamp primitive contract and the cell-width implementation.

use unicode_segmentation::UnicodeSegmentation;

use crate::config::EnvConfig;
use crate::core::node::{NodeId, NodeTree};
use crate::core::text::width::visible_width;
use crate::core::text::wrap::line_count;
use crate::error::ClampError;

pub const DEFAULT_ELLIPSIS: &str = "…";

/// Trims an element's content until it fits `max_lines` rendered lines.
///
/// Contract:
/// - `on_result` is invoked exactly once per call with whether content was removed.
/// - Exactly one marker element carrying `last_line_class` is appended as the final
///   child of `element`, whether or not truncation occurred.
pub trait LineClamp {
    fn clamp(
        &mut self,
        tree: &mut NodeTree,
        element: NodeId,
        max_lines: usize,
        on_result: &mut dyn FnMut(bool),
        last_line_class: &str,
    ) -> Result<(), ClampError>;

    /// Width hint from the host viewport, in cells.
    fn set_available_width(&mut self, _width: usize) {}

    /// Room to keep free after the ellipsis on the last line, in cells.
    fn reserve_trailing(&mut self, _cells: usize) {}
}

/// Clamp measured in terminal cells at a fixed wrap width.
///
/// `reserve` keeps room (in cells) on the last line for whatever the caller places
/// after the ellipsis, such as a toggle label.
#[derive(Clone, Debug)]
pub struct WrapClamp {
    width: usize,
    ellipsis: String,
    reserve: usize,
}

impl WrapClamp {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
            reserve: 0,
        }
    }

    pub fn from_env_config(config: &EnvConfig, width: usize) -> Self {
        let clamp = Self::new(width);
        match &config.ellipsis {
            Some(ellipsis) => clamp.with_ellipsis(ellipsis.clone()),
            None => clamp,
        }
    }

    pub fn with_ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    pub fn with_reserve(mut self, reserve: usize) -> Self {
        self.reserve = reserve;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width.max(1);
    }

    pub fn set_reserve(&mut self, reserve: usize) {
        self.reserve = reserve;
    }

    pub fn ellipsis(&self) -> &str {
        &self.ellipsis
    }

    /// Trailing runs to try after the cut, widest first. The last one is empty so
    /// some cut always fits.
    fn suffix_candidates(&self) -> Vec<String> {
        let mut candidates = Vec::with_capacity(3);
        if self.reserve > 0 {
            // The reserved run is measured as a single word.
            candidates.push(format!(
                "{} {}",
                self.ellipsis,
                "0".repeat(self.reserve.saturating_sub(1))
            ));
        }
        candidates.push(self.ellipsis.clone());
        candidates.push(String::new());
        candidates
    }

    fn fits(&self, prefix: &str, suffix: &str, max_lines: usize) -> bool {
        let mut probe = String::with_capacity(prefix.len() + suffix.len());
        probe.push_str(prefix.trim_end());
        probe.push_str(suffix);
        line_count(&probe, self.width) <= max_lines
    }

    /// Cut the element's text to the longest grapheme prefix that fits with a
    /// trailing run. Returns whether the ellipsis is kept.
    fn trim_to_fit(
        &self,
        tree: &mut NodeTree,
        element: NodeId,
        max_lines: usize,
    ) -> Result<bool, ClampError> {
        let mut full = String::new();
        let mut spans = Vec::new();
        for id in tree.text_nodes(element) {
            let start = full.len();
            full.push_str(tree.text(id).unwrap_or_default());
            spans.push((id, start, full.len()));
        }

        let mut boundaries: Vec<usize> =
            full.grapheme_indices(true).map(|(idx, _)| idx).collect();
        boundaries.push(full.len());

        let candidates = self.suffix_candidates();
        let suffix = candidates
            .iter()
            .find(|suffix| self.fits("", suffix, max_lines))
            .map(String::as_str)
            .unwrap_or_default();
        if suffix.len() != candidates[0].len() {
            log::debug!(
                "clamp width {} too narrow for trailing run {:?}",
                self.width,
                candidates[0]
            );
        }

        // fits(lo) holds, fits(hi) does not.
        let (mut lo, mut hi) = (0, boundaries.len() - 1);
        if self.fits(&full, suffix, max_lines) {
            lo = hi;
        }
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.fits(&full[..boundaries[mid]], suffix, max_lines) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let cut = full[..boundaries[lo]].trim_end().len();

        for (id, start, end) in spans {
            let kept_end = end.min(cut);
            if kept_end <= start {
                tree.remove(id)?;
            } else {
                tree.set_text(id, &full[start..kept_end])?;
            }
        }
        Ok(!suffix.is_empty())
    }
}

impl LineClamp for WrapClamp {
    fn clamp(
        &mut self,
        tree: &mut NodeTree,
        element: NodeId,
        max_lines: usize,
        on_result: &mut dyn FnMut(bool),
        last_line_class: &str,
    ) -> Result<(), ClampError> {
        if !tree.contains(element) {
            return Err(ClampError::UnknownNode(element));
        }
        let max_lines = max_lines.max(1);
        let full = tree.text_content(element);
        let did_truncate = line_count(&full, self.width) > max_lines;

        let keep_ellipsis = did_truncate && self.trim_to_fit(tree, element, max_lines)?;

        let marker = tree.create_element(&[last_line_class]);
        if keep_ellipsis {
            let ellipsis = tree.create_text(self.ellipsis.clone());
            tree.append_child(marker, ellipsis)?;
        }
        tree.append_child(element, marker)?;

        log::trace!(
            "clamp width={} max_lines={max_lines} full_width={} truncated={did_truncate}",
            self.width,
            visible_width(&full)
        );
        on_result(did_truncate);
        Ok(())
    }

    fn set_available_width(&mut self, width: usize) {
        self.set_width(width);
    }

    fn reserve_trailing(&mut self, cells: usize) {
        self.set_reserve(cells);
    }
}
