//! Data models for the employee screen.

mod employee;

pub use employee::*;
