//! Structural equality.
//!
//! [`DeepEq`] compares values by content all the way down: pointers are
//! followed, collections are compared element by element, and structs are
//! compared on every field, private ones included. A type's `PartialEq` may
//! be narrower than that (an identity-only comparison, for example), which
//! is why [`Opt::equal`](crate::Opt::equal) goes through this trait instead.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    hash::{BuildHasher, Hash},
    rc::Rc,
    sync::Arc,
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::opt::Opt;

/// Trait for types that can be compared structurally.
pub trait DeepEq {
    /// Indicates whether `self` and `other` have the same content.
    fn deep_eq(&self, other: &Self) -> bool;
}

/// Implements [`DeepEq`] for leaf types through their `PartialEq`.
///
/// Only use this for types whose `PartialEq` already compares the whole
/// value.
#[macro_export]
macro_rules! impl_deep_eq {
    ( $($type:ty),* $(,)? ) => {
        $(
            impl $crate::DeepEq for $type {
                #[inline(always)]
                fn deep_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

/// Implements [`DeepEq`] for a struct by comparing the listed fields.
///
/// The macro expands where it is invoked, so private fields can be listed
/// when it is called from the struct's own module. Tuple struct fields are
/// listed by index.
///
/// ```
/// use opt_value::{deep_eq_fields, Opt};
///
/// struct Nested {
///     value: String,
/// }
///
/// struct Data {
///     value: String,
///     nested: Box<Nested>,
/// }
///
/// deep_eq_fields!(Nested { value });
/// deep_eq_fields!(Data { value, nested });
///
/// let a = Opt::present(Data { value: "a".into(), nested: Box::new(Nested { value: "b".into() }) });
/// let b = Opt::present(Data { value: "a".into(), nested: Box::new(Nested { value: "b".into() }) });
/// assert!(a.equal(&b));
/// ```
#[macro_export]
macro_rules! deep_eq_fields {
    ( $type:ty { $($field:tt),* $(,)? } ) => {
        impl $crate::DeepEq for $type {
            #[allow(unused_variables)]
            fn deep_eq(&self, other: &Self) -> bool {
                true $( && $crate::DeepEq::deep_eq(&self.$field, &other.$field) )*
            }
        }
    };
}

impl_deep_eq!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    str,
    String,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    chrono::Duration,
);

impl<Tz: TimeZone> DeepEq for DateTime<Tz> {
    #[inline(always)]
    fn deep_eq(&self, other: &Self) -> bool {
        self == other
    }
}

// Pointers are followed; two distinct allocations with equal content are equal.
macro_rules! deref_deep_eq {
    ( $($pointer:ident),* ) => {
        $(
            impl<T: DeepEq + ?Sized> DeepEq for $pointer<T> {
                #[inline(always)]
                fn deep_eq(&self, other: &Self) -> bool {
                    (**self).deep_eq(&**other)
                }
            }
        )*
    };
}

deref_deep_eq!(Box, Rc, Arc);

impl<T: DeepEq + ?Sized> DeepEq for &T {
    #[inline(always)]
    fn deep_eq(&self, other: &Self) -> bool {
        (**self).deep_eq(&**other)
    }
}

impl<T: DeepEq + ?Sized> DeepEq for &mut T {
    #[inline(always)]
    fn deep_eq(&self, other: &Self) -> bool {
        (**self).deep_eq(&**other)
    }
}

impl<T: DeepEq> DeepEq for [T] {
    fn deep_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.deep_eq(b))
    }
}

impl<T: DeepEq, const N: usize> DeepEq for [T; N] {
    #[inline(always)]
    fn deep_eq(&self, other: &Self) -> bool {
        self.as_slice().deep_eq(other.as_slice())
    }
}

impl<T: DeepEq> DeepEq for Vec<T> {
    #[inline(always)]
    fn deep_eq(&self, other: &Self) -> bool {
        self.as_slice().deep_eq(other.as_slice())
    }
}

impl<T: DeepEq> DeepEq for VecDeque<T> {
    fn deep_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.deep_eq(b))
    }
}

impl<T: DeepEq> DeepEq for Option<T> {
    fn deep_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.deep_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: DeepEq> DeepEq for Opt<T> {
    #[inline(always)]
    fn deep_eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl<K, V, S> DeepEq for HashMap<K, V, S>
where
    K: Eq + Hash,
    V: DeepEq,
    S: BuildHasher,
{
    fn deep_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| value.deep_eq(v)))
    }
}

impl<K: Ord, V: DeepEq> DeepEq for BTreeMap<K, V> {
    fn deep_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|((ka, va), (kb, vb))| ka == kb && va.deep_eq(vb))
    }
}

// Set members are compared by their own equality, the same relation the set
// uses to tell them apart.
impl<T: Eq + Hash, S: BuildHasher> DeepEq for HashSet<T, S> {
    #[inline(always)]
    fn deep_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: Ord> DeepEq for BTreeSet<T> {
    #[inline(always)]
    fn deep_eq(&self, other: &Self) -> bool {
        self == other
    }
}

macro_rules! tuple_deep_eq {
    ( $( ($($name:ident : $index:tt),+) ),* ) => {
        $(
            impl<$($name: DeepEq),+> DeepEq for ($($name,)+) {
                #[inline(always)]
                fn deep_eq(&self, other: &Self) -> bool {
                    true $( && self.$index.deep_eq(&other.$index) )+
                }
            }
        )*
    };
}

tuple_deep_eq!(
    (A: 0),
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3)
);

#[cfg(test)]
mod tests {
    use super::*;

    /// `PartialEq` only looks at the identifier.
    struct Record {
        id: u32,
        tags: Vec<String>,
        parent: Option<Rc<Record>>,
    }

    impl PartialEq for Record {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    deep_eq_fields!(Record { id, tags, parent });

    struct Pair(u8, Box<str>);

    deep_eq_fields!(Pair { 0, 1 });

    fn record(id: u32, tags: &[&str], parent: Option<Record>) -> Record {
        Record {
            id,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            parent: parent.map(Rc::new),
        }
    }

    #[test]
    fn test_deep_eq_private_fields() {
        let a = record(1, &["a"], None);
        let b = record(1, &["b"], None);

        assert!(a == b);
        assert!(!a.deep_eq(&b));
        assert!(!Opt::present(a).equal(&Opt::present(b)));
    }

    #[test]
    fn test_deep_eq_nested() {
        let a = record(1, &["a"], Some(record(2, &["x"], None)));
        let b = record(1, &["a"], Some(record(2, &["x"], None)));
        let c = record(1, &["a"], Some(record(2, &["y"], None)));

        assert!(a.deep_eq(&b));
        assert!(!a.deep_eq(&c));
        assert!(a.deep_eq(&a));
    }

    #[test]
    fn test_deep_eq_tuple_struct() {
        assert!(Pair(1, "a".into()).deep_eq(&Pair(1, "a".into())));
        assert!(!Pair(1, "a".into()).deep_eq(&Pair(1, "b".into())));
    }

    #[test]
    fn test_deep_eq_collections() {
        assert!(vec![1, 2, 3].deep_eq(&vec![1, 2, 3]));
        assert!(!vec![1, 2, 3].deep_eq(&vec![1, 2]));
        assert!([Some(1), None].deep_eq(&[Some(1), None]));

        let a: HashMap<String, Vec<u8>> = [("foo".into(), vec![1]), ("bar".into(), vec![2])].into();
        let b: HashMap<String, Vec<u8>> = [("bar".into(), vec![2]), ("foo".into(), vec![1])].into();
        let c: HashMap<String, Vec<u8>> = [("bar".into(), vec![2]), ("baz".into(), vec![1])].into();
        assert!(a.deep_eq(&b));
        assert!(!a.deep_eq(&c));

        let a: BTreeMap<u8, &str> = [(1, "a"), (2, "b")].into();
        let b: BTreeMap<u8, &str> = [(1, "a"), (2, "c")].into();
        assert!(!a.deep_eq(&b));

        assert!((1u8, "x", 2.5f64).deep_eq(&(1u8, "x", 2.5f64)));
    }

    #[test]
    fn test_deep_eq_pointers() {
        let a = Arc::new(String::from("value"));
        let b = Arc::new(String::from("value"));
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(a.deep_eq(&b));

        let x = 5;
        let y = 5;
        assert!(<&i32 as DeepEq>::deep_eq(&&x, &&y));
    }

    #[test]
    fn test_deep_eq_nan() {
        // Floats keep IEEE semantics.
        assert!(!f64::NAN.deep_eq(&f64::NAN));
    }
}
