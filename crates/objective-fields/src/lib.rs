//! # objective-fields: Leaf Field Kinds
//!
//! Concrete [`FieldKind`](objective_core::FieldKind) implementations for
//! scalar values, plus ready-made schema types for them in [`types`]:
//!
//! - [`Number`]: ordered candidate casts (`Number`, `Float`, `Int`).
//! - [`Text`]: text with a configurable byte [`Encoding`].
//! - [`UtcDateTime`]: permissive date/time parsing, normalized to UTC.
//! - [`Bool`]: truthy-token booleans that never fail.
//!
//! Each kind implements only its conversion step. Missing-value policies and
//! validators are applied by the shared pipeline in `objective-core`.
//!
//! ## Crate Policy
//!
//! - Depends only on `objective-core` among workspace crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod boolean;
pub mod datetime;
pub mod number;
pub mod text;
pub mod types;

pub use boolean::{Bool, TRUTHY};
pub use datetime::{from_timestamp, parse_datetime, UtcDateTime};
pub use number::{Number, NumberType};
pub use text::{Encoding, Text};
