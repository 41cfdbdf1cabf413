use thiserror::Error;

use crate::sql::SqlValue;

pub type Result<T> = core::result::Result<T, Error>;

/// Boxed error produced by a driver or codec underneath an adapter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for the conversion adapters.
///
/// The structured-data adapter reports through the codec's own error type
/// instead, so these variants only come from the SQL side.
#[derive(Debug, Error)]
pub enum Error {
    /// Unsigned integer too large for the native integer type.
    #[error("uint64 value {0} has the high bit set and cannot be stored")]
    IntegerOverflow(u64),

    /// The driver failed to produce a native value.
    #[error("Opt<{type_name}>: failed to convert value from SQL driver: {source}")]
    Conversion {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },

    /// The native value is not of the expected type.
    #[error(
        "Opt<{type_name}>: failed to convert value {value:?} of kind {} to type {type_name}",
        .value.kind()
    )]
    TypeMismatch {
        type_name: &'static str,
        value: SqlValue,
    },
}

impl Error {
    pub(crate) fn conversion<T>(source: impl Into<BoxError>) -> Self {
        Error::Conversion {
            type_name: core::any::type_name::<T>(),
            source: source.into(),
        }
    }
}
