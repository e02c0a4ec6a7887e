//! Page layouts built from captured views.

/// Two-by-two sketch sheet.
pub mod sheet;
