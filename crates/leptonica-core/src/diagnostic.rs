//! Structured diagnostics for recoverable parameter anomalies
//!
//! Several conversions accept out-of-range parameters and substitute a safe
//! default instead of failing: a non-positive gamma becomes 1.0, a binary
//! colormap removal on a non-binary image falls back to source-based
//! removal, and so on. Those corrections are returned to the caller as
//! [`Diagnostic`] values attached to the result, never printed.
//!
//! # Examples
//!
//! ```
//! use leptonica_core::{Diagnosed, Severity};
//!
//! let mut out = Diagnosed::clean(1.0_f32);
//! out.warn("gamma_trc", "gamma must be > 0.0; using 1.0");
//! assert!(out.has_warnings());
//! assert_eq!(out.diagnostics()[0].severity, Severity::Warning);
//! assert_eq!(out.into_value(), 1.0);
//! ```

use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note; the result is exactly what was asked for
    Info,
    /// A parameter was corrected or a fallback path was taken
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => f.write_str("info"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A single structured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of the event
    pub severity: Severity,
    /// Name of the operation that produced it
    pub operation: &'static str,
    /// Human-readable description
    pub message: String,
}

impl Diagnostic {
    /// Create a warning.
    pub fn warning(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            operation,
            message: message.into(),
        }
    }

    /// Create an informational note.
    pub fn info(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            operation,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}: {}", self.severity, self.operation, self.message)
    }
}

/// A value together with the diagnostics produced while computing it.
#[derive(Debug, Clone)]
pub struct Diagnosed<T> {
    /// The computed value
    pub value: T,
    diagnostics: Vec<Diagnostic>,
}

impl<T> Diagnosed<T> {
    /// Wrap a value with no diagnostics.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Wrap a value with a single warning.
    pub fn warned(value: T, operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            value,
            diagnostics: vec![Diagnostic::warning(operation, message)],
        }
    }

    /// Record a warning.
    pub fn warn(&mut self, operation: &'static str, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::warning(operation, message));
    }

    /// Record an arbitrary diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Move the diagnostics of `other` into `self` and return its value.
    ///
    /// Used when one operation delegates to another and must surface the
    /// nested diagnostics to its own caller.
    pub fn absorb<U>(&mut self, other: Diagnosed<U>) -> U {
        self.diagnostics.extend(other.diagnostics);
        other.value
    }

    /// All diagnostics, in the order they were recorded.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True if no diagnostic was recorded.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// True if at least one warning was recorded.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    /// Transform the value, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Diagnosed<U> {
        Diagnosed {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Discard the diagnostics and return the value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Split into the value and its diagnostics.
    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}

impl<T> From<T> for Diagnosed<T> {
    fn from(value: T) -> Self {
        Self::clean(value)
    }
}
