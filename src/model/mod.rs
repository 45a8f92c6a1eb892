//! # Pattern Data Model
//!
//! DTOs produced by the parser and consumed by the serializer and by
//! downstream traversals.
//!
//! Design rule: pure data. No I/O, no state, no parser types here.

pub mod pattern;
pub mod property_map;
pub mod subject;
pub mod value;

pub use pattern::Pattern;
pub use property_map::PropertyMap;
pub use subject::{Subject, Symbol};
pub use value::Value;
