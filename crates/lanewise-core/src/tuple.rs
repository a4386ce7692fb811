//! Groups of 2, 3 or 4 vectors of the same type
//!
//! These are what the interleaved loads return. Elements are read and replaced
//! by a compile-time index, so an out-of-range index fails to build.

use crate::lane::Lane;
use crate::tag::Tag;
use crate::vector::Vector;

macro_rules! define_tuple {
    ($(#[$doc:meta])* $name:ident, $create:ident, $count:literal, [$($field:ident),*]) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq)]
        pub struct $name<T: Lane, const N: usize> {
            parts: [Vector<T, N>; $count],
        }

        impl<T: Lane, const N: usize> $name<T, N> {
            pub const COUNT: usize = $count;

            #[inline(always)]
            pub fn new($($field: Vector<T, N>),*) -> Self {
                Self { parts: [$($field),*] }
            }

            /// Element `K`
            #[inline(always)]
            pub fn get<const K: usize>(&self) -> Vector<T, N> {
                const { assert!(K < $count, "tuple index out of range") }
                self.parts[K]
            }

            /// Copy with element `K` replaced
            #[inline(always)]
            pub fn set<const K: usize>(mut self, v: Vector<T, N>) -> Self {
                const { assert!(K < $count, "tuple index out of range") }
                self.parts[K] = v;
                self
            }

            #[inline(always)]
            pub fn into_array(self) -> [Vector<T, N>; $count] {
                self.parts
            }
        }

        #[inline(always)]
        pub fn $create<T: Lane, const N: usize>(
            _d: Tag<T, N>,
            $($field: Vector<T, N>),*
        ) -> $name<T, N> {
            $name::new($($field),*)
        }
    };
}

define_tuple!(
    /// Two vectors
    Vec2, create2, 2, [v0, v1]
);
define_tuple!(
    /// Three vectors
    Vec3, create3, 3, [v0, v1, v2]
);
define_tuple!(
    /// Four vectors
    Vec4, create4, 4, [v0, v1, v2, v3]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let d = Tag::<u16, 8>::new();
        let a = Vector::splat(1);
        let b = Vector::splat(2);
        let c = Vector::splat(3);
        let t = create3(d, a, b, c);
        assert_eq!(t.get::<0>(), a);
        assert_eq!(t.get::<2>(), c);

        let t = t.set::<1>(c);
        assert_eq!(t.get::<1>(), c);
        assert_eq!(t.into_array(), [a, c, c]);
        assert_eq!(Vec3::<u16, 8>::COUNT, 3);
    }

    #[test]
    fn test_create4() {
        let d = Tag::<f32, 4>::new();
        let vs: Vec<Vector<f32, 4>> = (0..4).map(|i| Vector::splat(i as f32)).collect();
        let t = create4(d, vs[0], vs[1], vs[2], vs[3]);
        assert_eq!(t.get::<3>().to_array(), [3.0; 4]);
        let pair = create2(d, vs[1], vs[0]);
        assert_eq!(pair.get::<1>(), vs[0]);
    }
}
