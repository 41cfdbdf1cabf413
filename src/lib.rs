//! An optional value with an explicit present/absent flag.
//!
//! [`Opt<T>`] distinguishes "present" from "absent" without a sentinel value
//! of `T`, and carries adapters for the boundaries such a value usually
//! crosses:
//!
//! * serde: a present value encodes as the wrapped value, an absent one as
//!   `null` (feature `serde`).
//! * SQL: [`Opt::sql_value`] and [`Opt::scan`] bind and read driver-native
//!   [`SqlValue`]s, and sqlx `Encode`/`Decode` are implemented for any
//!   database (feature `sqlx`).
//! * Tests: [`Opt::equal`] compares payloads structurally through
//!   [`DeepEq`], and [`as_ref`] projects an `Opt` into an `Option<&T>` for
//!   comparison helpers that want a field-by-field view instead.
//!
//! ```
//! use opt_value::Opt;
//!
//! let some = Opt::from_pair(42, true);
//! assert_eq!(format!("{some:?}"), "Opt::present(42)");
//!
//! let none = Opt::<i32>::from_pair(0, false);
//! assert_eq!(format!("{none:?}"), "Opt::<i32>::absent()");
//! assert_eq!(none.unwrap_or(-1), -1);
//! ```

pub mod deep_eq;
pub mod error;
pub mod opt;
#[cfg(feature = "serde")]
mod serialize;
pub mod sql;

pub use deep_eq::DeepEq;
pub use error::{Error, Result};
pub use opt::{as_ref, equal, map, Opt};
pub use sql::{FromSqlValue, SqlValue, ToSqlValue};
