use core::any::type_name;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::opt::Opt;

/// A present value serializes exactly like the wrapped value; an absent
/// value serializes as none (`null` in JSON).
impl<T: Serialize> Serialize for Opt<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_ref().serialize(serializer)
    }
}

/// `null` deserializes to an absent value. Errors from the wrapped type are
/// prefixed with `Opt<T>`.
///
/// Combine with `#[serde(default)]` to also treat a missing field as absent.
impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for Opt<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer)
            .map(Opt::from)
            .map_err(|error| D::Error::custom(format_args!("Opt<{}>: {error}", type_name::<T>())))
    }
}
