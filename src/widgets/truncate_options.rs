//! Declarative options for [`TruncateMultiline`](super::TruncateMultiline).

use crate::core::attrs::{attr_changed, AttrValue};
use crate::core::callback::Callback;
use crate::runtime::truncation::ConfigChange;

pub const DEFAULT_MAX_LINES: usize = 3;
pub const DEFAULT_SEE_MORE_TEXT: &str = "See More";
pub const DEFAULT_SEE_LESS_TEXT: &str = "See Less";

#[derive(Debug)]
pub struct TruncateOptions {
    pub content: Option<AttrValue>,
    pub max_lines: usize,
    pub truncate: bool,
    pub show_button: bool,
    pub show_see_more_button: bool,
    pub show_see_less_button: bool,
    pub see_more_text: String,
    pub see_less_text: String,
    pub on_expand: Option<Callback<()>>,
    pub on_collapse: Option<Callback<()>>,
    pub on_toggle_truncate: Option<Callback<bool>>,
}

impl Default for TruncateOptions {
    fn default() -> Self {
        Self {
            content: None,
            max_lines: DEFAULT_MAX_LINES,
            truncate: true,
            show_button: true,
            show_see_more_button: true,
            show_see_less_button: true,
            see_more_text: DEFAULT_SEE_MORE_TEXT.to_string(),
            see_less_text: DEFAULT_SEE_LESS_TEXT.to_string(),
            on_expand: None,
            on_collapse: None,
            on_toggle_truncate: None,
        }
    }
}

impl TruncateOptions {
    pub fn new(content: impl Into<AttrValue>) -> Self {
        Self::default().content(content)
    }

    pub fn content(mut self, content: impl Into<AttrValue>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Values below 1 are treated as 1.
    pub fn max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines.max(1);
        self
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn show_button(mut self, show: bool) -> Self {
        self.show_button = show;
        self
    }

    pub fn show_see_more_button(mut self, show: bool) -> Self {
        self.show_see_more_button = show;
        self
    }

    pub fn show_see_less_button(mut self, show: bool) -> Self {
        self.show_see_less_button = show;
        self
    }

    pub fn see_more_text(mut self, text: impl Into<String>) -> Self {
        self.see_more_text = text.into();
        self
    }

    pub fn see_less_text(mut self, text: impl Into<String>) -> Self {
        self.see_less_text = text.into();
        self
    }

    pub fn on_expand(mut self, f: impl FnMut(()) + 'static) -> Self {
        self.on_expand = Some(Callback::new(f));
        self
    }

    pub fn on_collapse(mut self, f: impl FnMut(()) + 'static) -> Self {
        self.on_collapse = Some(Callback::new(f));
        self
    }

    pub fn on_toggle_truncate(mut self, f: impl FnMut(bool) + 'static) -> Self {
        self.on_toggle_truncate = Some(Callback::new(f));
        self
    }

    pub fn content_text(&self) -> String {
        self.content
            .as_ref()
            .map(AttrValue::normalize)
            .unwrap_or_default()
    }

    /// Clamped line count actually used for measurement.
    pub fn effective_max_lines(&self) -> usize {
        self.max_lines.max(1)
    }

    /// Watched-option diff. A missing `old` (first mount) counts `max_lines` and
    /// `truncate` as changed, and `content` too when it is set.
    pub fn changes_from(&self, old: Option<&TruncateOptions>) -> ConfigChange {
        let content = attr_changed(old.and_then(|old| old.content.as_ref()), self.content.as_ref());
        let old_lines = old.map(|old| AttrValue::Int(old.effective_max_lines() as i64));
        let new_lines = AttrValue::Int(self.effective_max_lines() as i64);
        let old_truncate = old.map(|old| AttrValue::Bool(old.truncate));
        let new_truncate = AttrValue::Bool(self.truncate);

        ConfigChange {
            content,
            max_lines: attr_changed(old_lines.as_ref(), Some(&new_lines)),
            truncate: attr_changed(old_truncate.as_ref(), Some(&new_truncate))
                .then_some(self.truncate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TruncateOptions, DEFAULT_MAX_LINES, DEFAULT_SEE_MORE_TEXT};
    use crate::core::attrs::{AttrValue, RichSpan};

    #[test]
    fn defaults() {
        let options = TruncateOptions::default();
        assert_eq!(options.max_lines, DEFAULT_MAX_LINES);
        assert!(options.truncate);
        assert!(options.show_button);
        assert!(options.show_see_more_button);
        assert!(options.show_see_less_button);
        assert_eq!(options.see_more_text, DEFAULT_SEE_MORE_TEXT);
        assert_eq!(options.content_text(), "");
    }

    #[test]
    fn first_mount_counts_as_changed() {
        let change = TruncateOptions::new("hello").changes_from(None);
        assert!(change.content);
        assert!(change.max_lines);
        assert_eq!(change.truncate, Some(true));
    }

    #[test]
    fn equal_values_after_normalization_are_unchanged() {
        let old = TruncateOptions::new("Hello world");
        let new = TruncateOptions::new(AttrValue::boxed(AttrValue::from(vec![
            RichSpan::emphasized("Hello"),
            RichSpan::plain(" world"),
        ])));
        assert!(!new.changes_from(Some(&old)).any());
    }

    #[test]
    fn label_and_button_changes_are_not_watched() {
        let old = TruncateOptions::new("a");
        let new = TruncateOptions::new("a")
            .see_more_text("more")
            .show_button(false);
        assert!(!new.changes_from(Some(&old)).any());
    }

    #[test]
    fn individual_watched_changes() {
        let old = TruncateOptions::new("a");
        let change = TruncateOptions::new("a").max_lines(5).changes_from(Some(&old));
        assert!(change.max_lines && !change.content && change.truncate.is_none());

        let change = TruncateOptions::new("a").truncate(false).changes_from(Some(&old));
        assert_eq!(change.truncate, Some(false));

        let change = TruncateOptions::new("b").changes_from(Some(&old));
        assert!(change.content);
    }

    #[test]
    fn zero_max_lines_is_clamped_to_one() {
        assert_eq!(TruncateOptions::default().max_lines(0).max_lines, 1);
    }
}
