//! Config field path used to label diagnostics.

/// Dotted path of a `tufted.toml` field, e.g. `build.template`.
///
/// Sections expose their paths as associated constants so diagnostics
/// never carry hand-typed field names:
///
/// ```ignore
/// diag.error(BuildSectionConfig::TEMPLATE, "required");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}
