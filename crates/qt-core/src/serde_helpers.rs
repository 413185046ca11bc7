//! Shared serde default functions for the settings table.

/// Serde default function that returns `true`.
///
/// Used for boolean settings that are enabled unless turned off.
pub fn default_true() -> bool {
    true
}
