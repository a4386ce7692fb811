//! Zero-sized tag descriptors
//!
//! A [`Tag<T, N>`] names a lane type and a lane count at the type level. Every
//! operation that has to produce a vector out of nothing (construction, loads,
//! reinterpretation) takes a tag as its first argument; the tag carries no
//! runtime state and compiles away entirely.
//!
//! # Rebinding
//!
//! Rebinds are pure type transformations, exposed both as methods on
//! [`Tag`] and as type aliases over any [`Descriptor`]:
//!
//! ```rust
//! use lanewise_core::tag::{Half, RebindToUnsigned, Repartition, Tag};
//!
//! type D = Tag<f32, 4>;
//! let du: RebindToUnsigned<D> = Tag::<u32, 4>::new();
//! let dh: Half<D> = Tag::<f32, 2>::new();
//! let db: Repartition<u8, D> = Tag::<u8, 16>::new();
//! # let _ = (du, dh, db);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::lane::{HasFloat, Lane, LaneType, Narrow, Widen};
use crate::vector::{Indices, Mask, Vector};

/// Largest vector supported by any backend, in bytes
pub const MAX_VECTOR_BYTES: usize = 16;

/// Type-level token for `N` lanes of `T`
pub struct Tag<T, const N: usize>(PhantomData<T>);

impl<T: Lane, const N: usize> Tag<T, N> {
    pub const LANES: usize = N;
    pub const BYTES: usize = N * std::mem::size_of::<T>();

    /// Create the tag; invalid shapes fail to compile
    #[inline(always)]
    pub const fn new() -> Self {
        const {
            assert!(N.is_power_of_two(), "lane count must be a power of two");
            assert!(
                N * std::mem::size_of::<T>() <= MAX_VECTOR_BYTES,
                "vector exceeds 16 bytes"
            );
        }
        Self(PhantomData)
    }

    /// Number of lanes
    #[inline(always)]
    pub const fn lanes(self) -> usize {
        N
    }

    /// Maximum lane count; equal to [`lanes`](Self::lanes) for fixed-width tags
    #[inline(always)]
    pub const fn max_lanes(self) -> usize {
        N
    }

    /// Width of a vector with this tag, in bytes
    #[inline(always)]
    pub const fn max_bytes(self) -> usize {
        N * std::mem::size_of::<T>()
    }

    #[inline(always)]
    pub const fn lane_type(self) -> LaneType {
        T::TYPE
    }

    /// Same lane count, other lane type
    #[inline(always)]
    pub const fn rebind<U: Lane>(self) -> Tag<U, N> {
        Tag::new()
    }

    #[inline(always)]
    pub const fn to_unsigned(self) -> Tag<T::Unsigned, N> {
        Tag::new()
    }

    #[inline(always)]
    pub const fn to_signed(self) -> Tag<T::Signed, N> {
        Tag::new()
    }

    #[inline(always)]
    pub const fn to_float(self) -> Tag<T::Float, N>
    where
        T: HasFloat,
    {
        Tag::new()
    }

    #[inline(always)]
    pub fn half(self) -> Half<Self>
    where
        Self: Halve,
    {
        Default::default()
    }

    #[inline(always)]
    pub fn twice(self) -> Twice<Self>
    where
        Self: Double,
    {
        Default::default()
    }

    /// Same total width, lanes of `U`
    #[inline(always)]
    pub fn repartition<U: Lane>(self) -> Repartition<U, Self>
    where
        Self: RepartitionTo<U>,
    {
        Default::default()
    }
}

impl<T: Lane, const N: usize> Default for Tag<T, N> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Clone for Tag<T, N> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize> Copy for Tag<T, N> {}

impl<T, const N: usize> PartialEq for Tag<T, N> {
    #[inline(always)]
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T, const N: usize> Eq for Tag<T, N> {}

impl<T, const N: usize> Hash for Tag<T, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        N.hash(state);
    }
}

impl<T: Lane, const N: usize> fmt::Debug for Tag<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag<{}, {}>", T::TYPE.name(), N)
    }
}

/// Anything that behaves like a tag: gives access to the lane type and count
pub trait Descriptor: Copy + Default + fmt::Debug + Send + Sync + 'static {
    type Lane: Lane;
    type Vec: Copy;
    type Mask: Copy;
    type Indices: Copy;
    const LANES: usize;
    const MAX_BYTES: usize;
}

impl<T: Lane, const N: usize> Descriptor for Tag<T, N> {
    type Lane = T;
    type Vec = Vector<T, N>;
    type Mask = Mask<T, N>;
    type Indices = Indices<T, N>;
    const LANES: usize = N;
    const MAX_BYTES: usize = N * std::mem::size_of::<T>();
}

/// Vector type of a descriptor
pub type VFromD<D> = <D as Descriptor>::Vec;
/// Mask type of a descriptor
pub type MFromD<D> = <D as Descriptor>::Mask;
/// Lane type of a descriptor
pub type TFromD<D> = <D as Descriptor>::Lane;

/// Lane-type substitution at a fixed lane count
pub trait RebindTo<U: Lane> {
    type Output: Descriptor<Lane = U>;
}

impl<T: Lane, U: Lane, const N: usize> RebindTo<U> for Tag<T, N> {
    type Output = Tag<U, N>;
}

pub type Rebind<U, D> = <D as RebindTo<U>>::Output;
pub type RebindToUnsigned<D> = Rebind<<TFromD<D> as Lane>::Unsigned, D>;
pub type RebindToSigned<D> = Rebind<<TFromD<D> as Lane>::Signed, D>;
pub type RebindToFloat<D> = Rebind<<TFromD<D> as HasFloat>::Float, D>;

/// Tags with a half-width counterpart
pub trait Halve: Descriptor {
    type Half: Descriptor<Lane = Self::Lane>;
}

/// Tags with a double-width counterpart
pub trait Double: Descriptor {
    type Twice: Descriptor<Lane = Self::Lane>;
}

pub type Half<D> = <D as Halve>::Half;
pub type Twice<D> = <D as Double>::Twice;

macro_rules! impl_halve {
    ($($n:literal => $h:literal),*) => {$(
        impl<T: Lane> Halve for Tag<T, $n> {
            type Half = Tag<T, $h>;
        }

        impl<T: Lane> Double for Tag<T, $h> {
            type Twice = Tag<T, $n>;
        }
    )*};
}

impl_halve!(2 => 1, 4 => 2, 8 => 4, 16 => 8);

/// Lane width markers
pub struct W8;
pub struct W16;
pub struct W32;
pub struct W64;

/// A lane width in bytes, with the full- and half-register tags of that width
pub trait LaneWidth: 'static {
    const BYTES: usize;
    type Full128<T: Lane>: Descriptor<Lane = T>;
    type Full64<T: Lane>: Descriptor<Lane = T>;
}

macro_rules! impl_width {
    ($($w:ty => $bytes:literal, $full:literal, $half:literal;)*) => {$(
        impl LaneWidth for $w {
            const BYTES: usize = $bytes;
            type Full128<T: Lane> = Tag<T, $full>;
            type Full64<T: Lane> = Tag<T, $half>;
        }
    )*};
}

impl_width! {
    W8 => 1, 16, 8;
    W16 => 2, 8, 4;
    W32 => 4, 4, 2;
    W64 => 8, 2, 1;
}

/// Tag filling a 16-byte vector with `T`
pub type Full128<T> = <<T as Lane>::Width as LaneWidth>::Full128<T>;
/// Tag filling 8 bytes with `T`
pub type Full64<T> = <<T as Lane>::Width as LaneWidth>::Full64<T>;

/// Lane-count marker for repartitioning
pub struct Lanes<const N: usize>;

pub trait LaneCount {
    type TagOf<T: Lane>: Descriptor<Lane = T>;
}

impl<const N: usize> LaneCount for Lanes<N> {
    type TagOf<T: Lane> = Tag<T, N>;
}

/// `(from width, lane count)` pairs that can be re-cut into lanes of width `To`
pub trait Resize<To> {
    type Count: LaneCount;
}

macro_rules! impl_resize {
    ($from:ty => $to:ty: $($n:literal => $m:literal),*) => {$(
        impl Resize<$to> for ($from, Lanes<$n>) {
            type Count = Lanes<$m>;
        }
    )*};
}

impl_resize!(W8 => W8: 1 => 1, 2 => 2, 4 => 4, 8 => 8, 16 => 16);
impl_resize!(W8 => W16: 2 => 1, 4 => 2, 8 => 4, 16 => 8);
impl_resize!(W8 => W32: 4 => 1, 8 => 2, 16 => 4);
impl_resize!(W8 => W64: 8 => 1, 16 => 2);
impl_resize!(W16 => W8: 1 => 2, 2 => 4, 4 => 8, 8 => 16);
impl_resize!(W16 => W16: 1 => 1, 2 => 2, 4 => 4, 8 => 8);
impl_resize!(W16 => W32: 2 => 1, 4 => 2, 8 => 4);
impl_resize!(W16 => W64: 4 => 1, 8 => 2);
impl_resize!(W32 => W8: 1 => 4, 2 => 8, 4 => 16);
impl_resize!(W32 => W16: 1 => 2, 2 => 4, 4 => 8);
impl_resize!(W32 => W32: 1 => 1, 2 => 2, 4 => 4);
impl_resize!(W32 => W64: 2 => 1, 4 => 2);
impl_resize!(W64 => W8: 1 => 8, 2 => 16);
impl_resize!(W64 => W16: 1 => 4, 2 => 8);
impl_resize!(W64 => W32: 1 => 2, 2 => 4);
impl_resize!(W64 => W64: 1 => 1, 2 => 2);

/// Same total width, lanes of `U`
pub trait RepartitionTo<U: Lane> {
    type Output: Descriptor<Lane = U>;
}

impl<T: Lane, U: Lane, const N: usize> RepartitionTo<U> for Tag<T, N>
where
    (T::Width, Lanes<N>): Resize<U::Width>,
{
    type Output = <<(T::Width, Lanes<N>) as Resize<U::Width>>::Count as LaneCount>::TagOf<U>;
}

pub type Repartition<U, D> = <D as RepartitionTo<U>>::Output;
pub type RepartitionToWide<D> = Repartition<<TFromD<D> as Widen>::Wide, D>;
pub type RepartitionToNarrow<D> = Repartition<<TFromD<D> as Narrow>::Narrow, D>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::TypeId;

    fn same<A: 'static, B: 'static>() -> bool {
        TypeId::of::<A>() == TypeId::of::<B>()
    }

    #[test]
    fn test_tag_shape() {
        let d = Tag::<u16, 8>::new();
        assert_eq!(d.lanes(), 8);
        assert_eq!(d.max_bytes(), 16);
        assert_eq!(d.lane_type(), LaneType::U16);
        assert_eq!(Tag::<f64, 1>::BYTES, 8);
        assert_eq!(d, Tag::<u16, 8>::default());
    }

    #[test]
    fn test_rebind_aliases() {
        assert!(same::<RebindToUnsigned<Tag<f32, 4>>, Tag<u32, 4>>());
        assert!(same::<RebindToSigned<Tag<u8, 16>>, Tag<i8, 16>>());
        assert!(same::<RebindToFloat<Tag<i64, 2>>, Tag<f64, 2>>());
        assert!(same::<Rebind<i16, Tag<u16, 4>>, Tag<i16, 4>>());
    }

    #[test]
    fn test_half_twice() {
        assert!(same::<Half<Tag<u8, 16>>, Tag<u8, 8>>());
        assert!(same::<Twice<Tag<f32, 2>>, Tag<f32, 4>>());
        assert_eq!(Tag::<i32, 4>::new().half().lanes(), 2);
    }

    #[test]
    fn test_repartition() {
        assert!(same::<Repartition<u8, Tag<u32, 4>>, Tag<u8, 16>>());
        assert!(same::<Repartition<u64, Tag<u16, 8>>, Tag<u64, 2>>());
        assert!(same::<Repartition<u16, Tag<u64, 1>>, Tag<u16, 4>>());
        assert!(same::<RepartitionToWide<Tag<u8, 16>>, Tag<u16, 8>>());
        assert!(same::<RepartitionToNarrow<Tag<i32, 4>>, Tag<i16, 8>>());
        assert_eq!(Tag::<f64, 2>::new().repartition::<u32>().lanes(), 4);
    }

    #[test]
    fn test_full_tags() {
        assert!(same::<Full128<u8>, Tag<u8, 16>>());
        assert!(same::<Full128<f64>, Tag<f64, 2>>());
        assert!(same::<Full64<i16>, Tag<i16, 4>>());
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", Tag::<i8, 16>::new()), "Tag<i8, 16>");
    }
}
