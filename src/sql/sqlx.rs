use core::any::type_name;

use sqlx::{
    encode::IsNull, error::BoxDynError, Database, Decode, Encode, Type, ValueRef,
};

use crate::{error::Error, opt::Opt};

impl<DB: Database, T: Type<DB>> Type<DB> for Opt<T> {
    fn type_info() -> DB::TypeInfo {
        T::type_info()
    }

    fn compatible(ty: &DB::TypeInfo) -> bool {
        T::compatible(ty)
    }
}

impl<'q, DB: Database, T: Encode<'q, DB>> Encode<'q, DB> for Opt<T> {
    fn encode_by_ref(
        &self,
        buf: &mut <DB as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self.as_ref() {
            Some(value) => value.encode_by_ref(buf),
            None => Ok(IsNull::Yes),
        }
    }

    fn produces(&self) -> Option<DB::TypeInfo> {
        self.as_ref().and_then(|value| value.produces())
    }

    fn size_hint(&self) -> usize {
        self.as_ref().map_or(0, |value| value.size_hint())
    }
}

impl<'r, DB: Database, T: Decode<'r, DB> + Default> Decode<'r, DB> for Opt<T> {
    fn decode(value: <DB as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return Ok(Self::absent());
        }

        T::decode(value).map(Self::present).map_err(|error| {
            log::debug!("Opt<{}>: driver decode failed: {error}", type_name::<T>());
            Box::new(Error::conversion::<T>(error)) as BoxDynError
        })
    }
}
