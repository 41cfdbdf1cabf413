use core::{
    any::type_name,
    fmt::{Debug, Display, Formatter},
};

use crate::deep_eq::DeepEq;

/// A value of type `T` that is either present or absent.
///
/// Absence is tracked by an explicit flag rather than a sentinel value of
/// `T`. An absent `Opt<T>` always holds `T::default()`, so the derived
/// `PartialEq` and `Hash` agree with the present/absent distinction and a
/// default-constructed value is a valid absent instance.
///
/// `==` uses `T`'s own `PartialEq`, which may be shallow for some payloads.
/// [`Opt::equal`] compares payloads with [`DeepEq`] instead.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Opt<T> {
    // invariant: !present => value == T::default()
    value: T,
    present: bool,
}

impl<T: Default> Default for Opt<T> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<T> Opt<T> {
    /// Returns a present value holding `value`.
    #[inline(always)]
    pub const fn present(value: T) -> Self {
        Self {
            value,
            present: true,
        }
    }

    /// Indicates whether the value is present.
    #[inline(always)]
    pub const fn is_present(&self) -> bool {
        self.present
    }

    /// Indicates whether the value is absent.
    #[inline(always)]
    pub const fn is_absent(&self) -> bool {
        !self.present
    }

    /// Returns the wrapped value.
    ///
    /// # Panics
    ///
    /// Panics if the value is absent. Check [`Opt::is_present`] first, or use
    /// [`Opt::unwrap_or`] or [`Opt::unwrap_or_default`] when presence is not
    /// guaranteed.
    #[inline]
    #[track_caller]
    pub fn unwrap(self) -> T {
        if !self.present {
            panic!("Opt<{}>::unwrap: unwrapping absent value", type_name::<T>());
        }
        self.value
    }

    /// Returns the wrapped value, or `default` if absent.
    #[inline]
    pub fn unwrap_or(self, default: T) -> T {
        if self.present {
            self.value
        } else {
            default
        }
    }

    /// Returns a reference to the wrapped value as an `Option`.
    #[inline(always)]
    pub fn as_ref(&self) -> Option<&T> {
        if self.present {
            Some(&self.value)
        } else {
            None
        }
    }

    /// Returns a mutable reference to the wrapped value as an `Option`.
    ///
    /// Absent values cannot be mutated in place; replace the whole `Opt`.
    #[inline(always)]
    pub fn as_mut(&mut self) -> Option<&mut T> {
        if self.present {
            Some(&mut self.value)
        } else {
            None
        }
    }

    /// Converts into a std `Option`.
    #[inline]
    pub fn into_option(self) -> Option<T> {
        if self.present {
            Some(self.value)
        } else {
            None
        }
    }

    /// Applies `f` to the wrapped value.
    ///
    /// `f` is not called when the value is absent.
    #[inline]
    pub fn map<U: Default, F>(self, f: F) -> Opt<U>
    where
        F: FnOnce(T) -> U,
    {
        if self.present {
            Opt::present(f(self.value))
        } else {
            Opt::absent()
        }
    }

    /// Compares two values structurally.
    ///
    /// Two absent values are equal, an absent and a present value never are,
    /// and two present values are equal when their payloads are [`DeepEq`].
    pub fn equal(&self, other: &Self) -> bool
    where
        T: DeepEq,
    {
        match (self.as_ref(), other.as_ref()) {
            (Some(a), Some(b)) => a.deep_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Default> Opt<T> {
    /// Returns an absent value.
    #[inline(always)]
    pub fn absent() -> Self {
        Self {
            value: T::default(),
            present: false,
        }
    }

    /// Returns the wrapped value, or `T::default()` if absent.
    #[inline]
    pub fn unwrap_or_default(self) -> T {
        if self.present {
            self.value
        } else {
            T::default()
        }
    }

    /// Creates a value from a reference, cloning the referent.
    ///
    /// `None` gives an absent value.
    #[inline]
    pub fn from_ref(value: Option<&T>) -> Self
    where
        T: Clone,
    {
        match value {
            Some(value) => Self::present(value.clone()),
            None => Self::absent(),
        }
    }

    /// Creates a value from a `(value, ok)` pair.
    ///
    /// The value is discarded when `present` is `false`.
    #[inline]
    pub fn from_pair(value: T, present: bool) -> Self {
        if present {
            Self::present(value)
        } else {
            Self::absent()
        }
    }
}

impl<T: Default> From<Option<T>> for Opt<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::present(value),
            None => Self::absent(),
        }
    }
}

impl<T> From<Opt<T>> for Option<T> {
    fn from(value: Opt<T>) -> Self {
        value.into_option()
    }
}

impl<T: Display> Display for Opt<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self.as_ref() {
            Some(value) => Display::fmt(value, f),
            None => f.pad(""),
        }
    }
}

impl<T: Debug> Debug for Opt<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self.as_ref() {
            Some(value) => f.debug_tuple("Opt::present").field(value).finish(),
            None => write!(f, "Opt::<{}>::absent()", type_name::<T>()),
        }
    }
}

/// Applies `f` to the value of `opt`. See [`Opt::map`].
#[inline]
pub fn map<T, U: Default, F>(opt: Opt<T>, f: F) -> Opt<U>
where
    F: FnOnce(T) -> U,
{
    opt.map(f)
}

/// Returns a reference to the wrapped value of `opt`. See [`Opt::as_ref`].
///
/// A free function so it can be handed to comparison helpers that project a
/// value before diffing it.
#[inline(always)]
pub fn as_ref<T>(opt: &Opt<T>) -> Option<&T> {
    opt.as_ref()
}

/// Structural equality as a free predicate. See [`Opt::equal`].
#[inline]
pub fn equal<T: DeepEq>(a: &Opt<T>, b: &Opt<T>) -> bool {
    a.equal(b)
}
