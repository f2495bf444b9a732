//! # objective-validation: Validator Library
//!
//! Ready-made [`Validator`](objective_core::Validator) implementations for
//! schema fields:
//!
//! | Validator      | Effect                                               |
//! |----------------|------------------------------------------------------|
//! | [`Identity`]   | returns the value unchanged                          |
//! | [`OneOf`]      | passes listed values, fails others                   |
//! | [`NoneOf`]     | fails listed values, passes others                   |
//! | [`Pattern`]    | text must match a regular expression                 |
//! | [`Email`]      | text must be a syntactically valid e-mail address    |
//! | [`ValueMap`]   | remaps through a table or function, optional default |
//! | [`Chain`]      | runs validators in sequence                          |
//! | [`FieldValue`] | runs another field's deserialize pipeline            |
//!
//! Validators report bare failures; the field pipeline attaches them to the
//! validated node. Any closure with the validator signature can be mixed in.
//!
//! ## Crate Policy
//!
//! - Depends only on `objective-core` among workspace crates.
//! - No I/O: e-mail checks are syntactic.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod chain;
pub mod choice;
pub mod pattern;
pub mod remap;

pub use chain::{Chain, FieldValue};
pub use choice::{Identity, NoneOf, OneOf};
pub use pattern::{Email, Pattern};
pub use remap::ValueMap;
