//! Foundation layer: math types and time management
//!
//! These are the lowest-level building blocks shared by every other module.
//! No module in this crate reaches for nalgebra directly; everything goes
//! through the aliases defined here.

pub mod math;
pub mod time;
