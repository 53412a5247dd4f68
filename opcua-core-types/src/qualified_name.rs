//! Minimal stand-ins for `async-opcua-types::qualified_name::QualifiedName`
//! and `async-opcua-types::localized_text::LocalizedText` — trimmed to a
//! namespace index + string, since no encoding is done in this core.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QualifiedName {
    pub namespace_index: u16,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }
}

/// Localized text with locale-less fallback, matching the
/// `LocalizedText { locale, text }` shape used across the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalizedText {
    pub locale: Option<String>,
    pub text: String,
}

impl LocalizedText {
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            text: text.into(),
        }
    }

    pub fn new_without_locale(text: impl Into<String>) -> Self {
        Self {
            locale: None,
            text: text.into(),
        }
    }
}
