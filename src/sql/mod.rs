//! SQL parameter binding and column scanning.
//!
//! A driver exchanges values through a small native set, [`SqlValue`].
//! Binding converts a Rust value into that set with [`ToSqlValue`]; scanning
//! converts the driver's value into the set and then narrows it to exactly
//! the requested type with [`FromSqlValue`].

#[cfg(feature = "sqlx")]
mod sqlx;

use core::any::type_name;

use chrono::{DateTime, FixedOffset, Utc};

use crate::{
    error::{Error, Result},
    opt::Opt,
};

/// A driver-native value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SqlValue {
    /// Storage null.
    #[default]
    Null,

    Integer(i64),

    Real(f64),

    Bool(bool),

    Text(String),

    Blob(Vec<u8>),

    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    /// Indicates whether the value is the storage null.
    #[inline(always)]
    pub const fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Returns the name of the native type of the value.
    pub const fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Integer(_) => "i64",
            SqlValue::Real(_) => "f64",
            SqlValue::Bool(_) => "bool",
            SqlValue::Text(_) => "String",
            SqlValue::Blob(_) => "Vec<u8>",
            SqlValue::Timestamp(_) => "DateTime<Utc>",
        }
    }
}

/// Trait for values that a driver can convert into a [`SqlValue`].
///
/// Narrow integers are widened to `i64` and `f32` to `f64`, so the
/// conversion loses the original Rust type.
pub trait ToSqlValue {
    /// Converts the value into its driver-native form.
    fn to_sql_value(&self) -> Result<SqlValue>;
}

/// Trait for types that a [`SqlValue`] can be narrowed to.
///
/// Narrowing only succeeds when the value already holds exactly `Self`. On
/// mismatch the value is handed back unchanged.
pub trait FromSqlValue: Sized {
    /// Narrows `value` to `Self`.
    fn from_sql_value(value: SqlValue) -> core::result::Result<Self, SqlValue>;
}

impl ToSqlValue for SqlValue {
    #[inline]
    fn to_sql_value(&self) -> Result<SqlValue> {
        Ok(self.clone())
    }
}

impl FromSqlValue for SqlValue {
    #[inline(always)]
    fn from_sql_value(value: SqlValue) -> core::result::Result<Self, SqlValue> {
        Ok(value)
    }
}

// Implement `ToSqlValue` for types with a lossless conversion into a native
// variant.
macro_rules! to_sql_value {
    ( $variant:ident : $($type:ty),* ) => {
        $(
            impl ToSqlValue for $type {
                #[inline]
                fn to_sql_value(&self) -> Result<SqlValue> {
                    Ok(SqlValue::$variant((*self).into()))
                }
            }
        )*
    };
}

to_sql_value!(Integer: i8, i16, i32, i64, u8, u16, u32);
to_sql_value!(Real: f32, f64);
to_sql_value!(Bool: bool);

// Unsigned values with the high bit set have no native representation.
macro_rules! to_sql_value_unsigned {
    ( $($type:ty),* ) => {
        $(
            impl ToSqlValue for $type {
                fn to_sql_value(&self) -> Result<SqlValue> {
                    i64::try_from(*self)
                        .map(SqlValue::Integer)
                        .map_err(|_| Error::IntegerOverflow(*self as u64))
                }
            }
        )*
    };
}

to_sql_value_unsigned!(u64, usize);

impl ToSqlValue for str {
    #[inline]
    fn to_sql_value(&self) -> Result<SqlValue> {
        Ok(SqlValue::Text(self.to_owned()))
    }
}

impl ToSqlValue for String {
    #[inline]
    fn to_sql_value(&self) -> Result<SqlValue> {
        self.as_str().to_sql_value()
    }
}

impl ToSqlValue for [u8] {
    #[inline]
    fn to_sql_value(&self) -> Result<SqlValue> {
        Ok(SqlValue::Blob(self.to_vec()))
    }
}

impl ToSqlValue for Vec<u8> {
    #[inline]
    fn to_sql_value(&self) -> Result<SqlValue> {
        self.as_slice().to_sql_value()
    }
}

impl ToSqlValue for DateTime<Utc> {
    #[inline]
    fn to_sql_value(&self) -> Result<SqlValue> {
        Ok(SqlValue::Timestamp(*self))
    }
}

impl ToSqlValue for DateTime<FixedOffset> {
    #[inline]
    fn to_sql_value(&self) -> Result<SqlValue> {
        Ok(SqlValue::Timestamp(self.with_timezone(&Utc)))
    }
}

impl<T: ToSqlValue + ?Sized> ToSqlValue for &T {
    #[inline(always)]
    fn to_sql_value(&self) -> Result<SqlValue> {
        (**self).to_sql_value()
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(&self) -> Result<SqlValue> {
        match self {
            Some(value) => value.to_sql_value(),
            None => Ok(SqlValue::Null),
        }
    }
}

impl<T: ToSqlValue> ToSqlValue for Opt<T> {
    #[inline]
    fn to_sql_value(&self) -> Result<SqlValue> {
        self.sql_value()
    }
}

// Implement `FromSqlValue` for the payload of each native variant.
macro_rules! from_sql_value {
    ( $( $variant:ident => $type:ty ),* ) => {
        $(
            impl FromSqlValue for $type {
                #[inline]
                fn from_sql_value(value: SqlValue) -> core::result::Result<Self, SqlValue> {
                    match value {
                        SqlValue::$variant(value) => Ok(value),
                        value => Err(value),
                    }
                }
            }
        )*
    };
}

from_sql_value!(
    Integer => i64,
    Real => f64,
    Bool => bool,
    Text => String,
    Blob => Vec<u8>,
    Timestamp => DateTime<Utc>
);

impl<T> Opt<T> {
    /// Returns the value to bind as a statement parameter.
    ///
    /// A present value is converted as the wrapped value would be on its
    /// own; an absent value binds the storage null.
    pub fn sql_value(&self) -> Result<SqlValue>
    where
        T: ToSqlValue,
    {
        match self.as_ref() {
            Some(value) => value.to_sql_value(),
            None => Ok(SqlValue::Null),
        }
    }
}

impl<T: Default + FromSqlValue> Opt<T> {
    /// Reads a value supplied by the driver.
    ///
    /// `src` is first converted into its native form. The storage null
    /// gives an absent value; anything else must narrow to exactly `T`.
    pub fn scan<S: ToSqlValue + ?Sized>(src: &S) -> Result<Self> {
        let native = src.to_sql_value().map_err(|error| {
            log::debug!("Opt<{}>: driver conversion failed: {error}", type_name::<T>());
            Error::conversion::<T>(error)
        })?;

        if native.is_null() {
            return Ok(Self::absent());
        }

        T::from_sql_value(native).map(Self::present).map_err(|value| {
            log::debug!(
                "Opt<{}>: rejecting {} value from SQL driver",
                type_name::<T>(),
                value.kind()
            );
            Error::TypeMismatch {
                type_name: type_name::<T>(),
                value,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_sql_value() {
        assert_eq!(Opt::present(3.14).sql_value().unwrap(), SqlValue::Real(3.14));
        assert_eq!(Opt::<f64>::absent().sql_value().unwrap(), SqlValue::Null);
        assert_eq!(
            Opt::present("hello").sql_value().unwrap(),
            SqlValue::Text("hello".into())
        );

        let ts = Utc::now();
        assert_eq!(Opt::present(ts).sql_value().unwrap(), SqlValue::Timestamp(ts));
        assert_eq!(Opt::<DateTime<Utc>>::absent().sql_value().unwrap(), SqlValue::Null);
    }

    #[test]
    fn test_sql_value_overflow() {
        let error = Opt::present(u64::MAX).sql_value().unwrap_err();
        assert!(matches!(error, Error::IntegerOverflow(u64::MAX)));

        assert_eq!(
            Opt::present(u64::from(u32::MAX)).sql_value().unwrap(),
            SqlValue::Integer(i64::from(u32::MAX))
        );
    }

    #[test]
    fn test_scan() {
        let opt = Opt::<String>::scan(&SqlValue::Text("hello".into())).unwrap();
        assert_eq!(opt, Opt::present("hello".to_string()));

        let opt = Opt::<String>::scan(&SqlValue::Null).unwrap();
        assert_eq!(opt, Opt::absent());

        let ts = Utc.with_ymd_and_hms(2021, 2, 3, 4, 5, 6).unwrap();
        let opt = Opt::<DateTime<Utc>>::scan(&SqlValue::Timestamp(ts)).unwrap();
        assert_eq!(opt, Opt::present(ts));

        let opt = Opt::<Vec<u8>>::scan(b"world".as_slice()).unwrap();
        assert_eq!(opt, Opt::present(b"world".to_vec()));
    }

    #[test]
    fn test_scan_converts_before_narrowing() {
        // `i32` is widened by the conversion and then narrows to `i64`.
        assert_eq!(Opt::<i64>::scan(&3i32).unwrap(), Opt::present(3));
        assert_eq!(Opt::<i64>::scan(&None::<i32>).unwrap(), Opt::absent());
        assert_eq!(Opt::<i64>::scan(&Opt::<i32>::absent()).unwrap(), Opt::absent());

        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2021, 2, 3, 13, 5, 6).unwrap();
        let opt = Opt::<DateTime<Utc>>::scan(&local).unwrap();
        assert_eq!(opt, Opt::present(Utc.with_ymd_and_hms(2021, 2, 3, 4, 5, 6).unwrap()));
    }

    #[test]
    fn test_scan_type_mismatch() {
        let error = Opt::<String>::scan(&3i64).unwrap_err();
        match &error {
            Error::TypeMismatch { type_name, value } => {
                assert_eq!(*type_name, "alloc::string::String");
                assert_eq!(value, &SqlValue::Integer(3));
            }
            error => panic!("unexpected error: {error}"),
        }
        assert_eq!(
            error.to_string(),
            "Opt<alloc::string::String>: failed to convert value Integer(3) of kind i64 \
             to type alloc::string::String"
        );

        // Narrowing is exact: a real never becomes an integer.
        assert!(matches!(
            Opt::<i64>::scan(&1.0f64),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_scan_conversion_error() {
        let error = Opt::<i64>::scan(&u64::MAX).unwrap_err();
        assert!(matches!(error, Error::Conversion { type_name: "i64", .. }));
        assert!(error.to_string().starts_with("Opt<i64>: failed to convert value from SQL driver"));

        let source = std::error::Error::source(&error).unwrap();
        assert!(source.to_string().contains(&u64::MAX.to_string()));
    }

    #[test]
    fn test_roundtrip() {
        let opt = Opt::present(b"blob".to_vec());
        let bound = opt.sql_value().unwrap();
        assert_eq!(Opt::<Vec<u8>>::scan(&bound).unwrap(), opt);

        let opt = Opt::<bool>::absent();
        let bound = opt.sql_value().unwrap();
        assert_eq!(Opt::<bool>::scan(&bound).unwrap(), opt);
    }
}
