//! API Routes
//!
//! Route handlers organized by functionality.

pub mod dates;
pub mod health;
pub mod latest;
pub mod measurements;
pub mod series;
