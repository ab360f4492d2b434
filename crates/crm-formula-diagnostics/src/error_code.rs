//! Formula error codes following a structured numbering system
//!
//! Error code ranges:
//! - FML0001-FML0099: Lexical and parse errors
//! - FML0100-FML0199: Evaluation errors (runtime)
//! - FML0200-FML0299: Configuration errors (rule sets, engine options)
//! - FML0300-FML0399: System errors (I/O)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a parse error (0001-0099)
    pub const fn is_parse_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is an evaluation error (0100-0199)
    pub const fn is_evaluation_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a configuration error (0200-0299)
    pub const fn is_configuration_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a system error (0300-0399)
    pub const fn is_system_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FML{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Parse errors (0001-0099)
    map.insert(1, ErrorInfo::new("Unexpected token"));
    map.insert(2, ErrorInfo::new("Expected token mismatch")
        .with_help("Check for a missing ')' or ',' in a function call"));
    map.insert(3, ErrorInfo::new("Formula too long"));

    // Evaluation errors (0100-0199)
    map.insert(100, ErrorInfo::new("Evaluation failed"));
    map.insert(101, ErrorInfo::new("Unknown function")
        .with_help("Function names are case-insensitive; check the spelling against the built-in library"));
    map.insert(102, ErrorInfo::new("Unknown operator"));
    map.insert(103, ErrorInfo::new("Maximum nesting depth exceeded"));
    map.insert(104, ErrorInfo::new("Function failed"));

    // Configuration errors (0200-0299)
    map.insert(200, ErrorInfo::new("Invalid validation rule")
        .with_help("The rule formula could not be evaluated; fix the formula and save the rule again"));
    map.insert(201, ErrorInfo::new("Invalid rule set"));
    map.insert(202, ErrorInfo::new("Invalid engine options"));

    // System errors (0300-0399)
    map.insert(300, ErrorInfo::new("Internal error"));
    map.insert(301, ErrorInfo::new("I/O error"));
    map.insert(302, ErrorInfo::new("Invalid format"));

    map
});

// Parse errors
pub const FML0001: ErrorCode = ErrorCode::new(1);
pub const FML0002: ErrorCode = ErrorCode::new(2);
pub const FML0003: ErrorCode = ErrorCode::new(3);

// Evaluation errors
pub const FML0100: ErrorCode = ErrorCode::new(100);
pub const FML0101: ErrorCode = ErrorCode::new(101);
pub const FML0102: ErrorCode = ErrorCode::new(102);
pub const FML0103: ErrorCode = ErrorCode::new(103);
pub const FML0104: ErrorCode = ErrorCode::new(104);

// Configuration errors
pub const FML0200: ErrorCode = ErrorCode::new(200);
pub const FML0201: ErrorCode = ErrorCode::new(201);
pub const FML0202: ErrorCode = ErrorCode::new(202);

// System errors
pub const FML0300: ErrorCode = ErrorCode::new(300);
pub const FML0301: ErrorCode = ErrorCode::new(301);
pub const FML0302: ErrorCode = ErrorCode::new(302);
