use std::fmt;

/// Pack-wide severity tier, totally ordered by risk.
///
/// The derived `Ord` follows declaration order, so the worst of several
/// signals is simply their `max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// All signals inside their normal bands.
    #[default]
    Normal,
    /// At least one signal outside its normal band but not yet critical.
    Warning,
    /// At least one signal at a critical level; severe limitation expected.
    Critical,
    /// A cell voltage or temperature outside its physical range.
    Fault,
}

impl Severity {
    /// All tiers from least to most severe.
    pub const ALL: [Severity; 4] = [
        Severity::Normal,
        Severity::Warning,
        Severity::Critical,
        Severity::Fault,
    ];

    /// Stable upper-case label used in logs and CSV output.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Normal => "NORMAL",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Fault => "FAULT",
        }
    }

    /// Position in [`Severity::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
