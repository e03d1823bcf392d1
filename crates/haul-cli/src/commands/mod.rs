//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared loading (config, receipt files, analysis) and the summary command
//! - `merch` - Merchandise breakdown
//! - `gas` - Fuel breakdown
//! - `prices` - Price change tables and item lookup
//! - `export` - JSON/CSV export

pub mod core;
pub mod export;
pub mod gas;
pub mod merch;
pub mod prices;

// Re-export command functions for main.rs
pub use self::core::*;
pub use export::*;
pub use gas::*;
pub use merch::*;
pub use prices::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
