//! Request validation and input normalization
//!
//! Payload structs derive [`validator::Validate`]; the [`Valid`] extractor
//! parses and validates them before they reach handlers. Field rules that
//! `validator` does not ship live in [`validators`], normalization helpers
//! applied after validation live in [`filters`].

pub mod extractor;
pub mod filters;
pub mod validators;

pub use extractor::Valid;
