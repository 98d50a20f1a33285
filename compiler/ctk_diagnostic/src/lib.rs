//! Diagnostic data for the ctk toolkit.
//!
//! Every error the core reports converts into a [`Diagnostic`]:
//! - Error codes for searchability
//! - A message (what went wrong)
//! - Labeled spans (where it went wrong)
//! - Notes (why)
//!
//! Rendering is left to the embedding compiler. `Display` is a plain
//! one-block dump meant for logs and test failures.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
