//! API Routes
//!
//! Route handlers organized by functionality.

pub mod cursor;
pub mod health;
pub mod popover;
pub mod view;
