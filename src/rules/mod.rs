//! Rules applied when a challenge resolves, plus the win condition.
//!
//! This module contains keyword resolution, claim, and victory checks.

pub mod claim;
pub mod keywords;
pub mod victory;

pub use claim::{apply_claim, complete_claim, kill_for_claim};
pub use keywords::apply_keywords;
pub use victory::check_victory;
