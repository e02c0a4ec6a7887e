//! Color tokens found in vector artwork.

/// Token classification and CSS color resolution.
pub mod color;
/// Frequency-ranked palette extraction.
pub mod extract;
/// Token-targeted substitution.
pub mod rewrite;
