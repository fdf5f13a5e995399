//! Step definitions for approval workflow behaviour tests.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
