//! Adapter implementations for the approval workflow ports.

pub mod mail;
pub mod memory;
pub mod postgres;

pub use mail::TracingMailer;
