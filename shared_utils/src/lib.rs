//! Small helpers shared by the fundamentals crates.

pub mod env;
