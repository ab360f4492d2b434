//! Formula error types

use crate::{ErrorCode, SourceLocation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - evaluation cannot proceed
    Error,
    /// Warning - potential issue but can continue
    Warning,
    /// Information - informational message
    Info,
    /// Hint - suggestion for improvement
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

/// A diagnostic message with location and context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Source location
    pub location: Option<SourceLocation>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main formula error type
#[derive(Debug, Clone, Error)]
pub enum FormulaError {
    /// Parse error (token stream does not match the grammar)
    #[error("{code}: {message}")]
    Parse {
        code: ErrorCode,
        message: String,
        formula: String,
        location: Option<SourceLocation>,
    },

    /// Evaluation error (unknown function, unknown operator, limits)
    #[error("{code}: {message}")]
    Evaluation {
        code: ErrorCode,
        message: String,
        formula: String,
        location: Option<SourceLocation>,
    },

    /// Configuration error (invalid rule, rule set or options)
    #[error("{code}: {message}")]
    Configuration {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// System error
    #[error("{code}: {message}")]
    System {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },
}

impl FormulaError {
    /// Create a parse error
    pub fn parse(code: ErrorCode, message: impl Into<String>, formula: impl Into<String>) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            formula: formula.into(),
            location: None,
        }
    }

    /// Create an evaluation error
    pub fn evaluation(
        code: ErrorCode,
        message: impl Into<String>,
        formula: impl Into<String>,
    ) -> Self {
        Self::Evaluation {
            code,
            message: message.into(),
            formula: formula.into(),
            location: None,
        }
    }

    /// Create a configuration error
    pub fn configuration(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Configuration {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Create a system error
    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Attach context to configuration and system errors
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        match &mut self {
            Self::Configuration { context, .. } | Self::System { context, .. } => {
                *context = Some(ctx.into());
            }
            _ => {}
        }
        self
    }

    /// Attach a location to parse and evaluation errors
    pub fn with_location(mut self, loc: SourceLocation) -> Self {
        match &mut self {
            Self::Parse { location, .. } | Self::Evaluation { location, .. } => {
                *location = Some(loc);
            }
            _ => {}
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse { code, .. }
            | Self::Evaluation { code, .. }
            | Self::Configuration { code, .. }
            | Self::System { code, .. } => *code,
        }
    }

    /// Get the message without the code prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Parse { message, .. }
            | Self::Evaluation { message, .. }
            | Self::Configuration { message, .. }
            | Self::System { message, .. } => message,
        }
    }

    /// Get the location if available
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Parse { location, .. } | Self::Evaluation { location, .. } => location.as_ref(),
            _ => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code(), self.message());
        if let Some(loc) = self.location() {
            diag = diag.with_location(loc.clone());
        }
        match self {
            Self::Configuration { context: Some(ctx), .. } | Self::System { context: Some(ctx), .. } => {
                diag.with_help(ctx.clone())
            }
            _ => match self.code().info().help {
                Some(help) => diag.with_help(help),
                None => diag,
            },
        }
    }
}
