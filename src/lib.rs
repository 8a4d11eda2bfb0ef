//! Lossless partial JSON deserialization.
//!
//! A record names the fields it cares about; every other key of the input
//! object is kept verbatim in the record's overflow map and written back out
//! on encode, so documents survive a decode/encode round trip unchanged.
//!
//! ```
//! use overflow_json::{OverflowFields, OverflowMap};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct Person {
//!     name: String,
//!     #[serde(skip)]
//!     overflow: OverflowMap,
//! }
//!
//! impl OverflowFields for Person {
//!     fn overflow(&self) -> &OverflowMap {
//!         &self.overflow
//!     }
//!
//!     fn overflow_mut(&mut self) -> &mut OverflowMap {
//!         &mut self.overflow
//!     }
//! }
//!
//! let input = r#"{"name":"Bert","big":{"n": 99999999999999999999}}"#;
//! let mut person: Person = overflow_json::from_str(input)?;
//! assert_eq!(person.overflow["big"].get(), r#"{"n": 99999999999999999999}"#);
//!
//! person.name = "Ernie".into();
//! assert_eq!(
//!     overflow_json::to_string(&person)?,
//!     r#"{"big":{"n": 99999999999999999999},"name":"Ernie"}"#
//! );
//! # Ok::<_, overflow_json::OverflowError>(())
//! ```
pub mod deserialization;
pub mod error;
pub mod locate;
pub mod lossless;
pub mod serialization;
pub mod types;

pub use deserialization::{from_slice, from_slice_into, from_str};
pub use error::{OverflowError, Result};
pub use locate::{FieldHandle, OverflowFields, locate, overflow_of, validate};
pub use lossless::Lossless;
pub use serialization::{to_map, to_string, to_vec, to_writer};
pub use types::{OverflowMap, RawJson, Shape};
