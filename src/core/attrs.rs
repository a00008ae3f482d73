//! Attribute values and change detection.
//!
//! Every watched option goes through one normalization: unwrap boxed values,
//! stringify, then compare. Rich text compares by its plain text.

use std::fmt;

/// One styled run of rich-text content.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RichSpan {
    pub text: String,
    pub emphasis: bool,
}

impl RichSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: false,
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasis: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Text(String),
    Rich(Vec<RichSpan>),
    Bool(bool),
    Int(i64),
    /// A value wrapped by the host (for example a bound or mutable cell).
    Boxed(Box<AttrValue>),
}

impl AttrValue {
    pub fn boxed(inner: AttrValue) -> Self {
        Self::Boxed(Box::new(inner))
    }

    /// Innermost value with every box removed.
    pub fn unwrap_boxed(&self) -> &AttrValue {
        let mut value = self;
        while let AttrValue::Boxed(inner) = value {
            value = inner;
        }
        value
    }

    pub fn normalize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unwrap_boxed() {
            AttrValue::Text(text) => f.write_str(text),
            AttrValue::Rich(spans) => spans.iter().try_for_each(|span| f.write_str(&span.text)),
            AttrValue::Bool(value) => write!(f, "{value}"),
            AttrValue::Int(value) => write!(f, "{value}"),
            AttrValue::Boxed(_) => Ok(()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<RichSpan>> for AttrValue {
    fn from(value: Vec<RichSpan>) -> Self {
        Self::Rich(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Both absent is unchanged, exactly one absent is changed, otherwise compare the
/// normalized forms.
pub fn attr_changed(old: Option<&AttrValue>, new: Option<&AttrValue>) -> bool {
    match (old, new) {
        (None, None) => false,
        (Some(_), None) | (None, Some(_)) => true,
        (Some(old), Some(new)) => old.normalize() != new.normalize(),
    }
}
