// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boxes and the scalar abstraction the backends compute with.

use core::cmp::Ordering;
use core::fmt::Debug;
use core::ops::{Add, Mul, Sub};

/// Coordinate type usable in an index.
///
/// Area metrics are computed in a widened accumulator (`f32` → `f64`, `i64` → `i128`)
/// so that split costs compare reliably for large boxes.
pub trait Scalar: Copy + PartialOrd + Debug + Add<Output = Self> + Sub<Output = Self> {
    /// Accumulator used for areas and split costs.
    type Acc: Copy
        + PartialOrd
        + Debug
        + Add<Output = Self::Acc>
        + Sub<Output = Self::Acc>
        + Mul<Output = Self::Acc>;

    /// Additive identity.
    const ZERO: Self;

    /// Midpoint of `a` and `b`, used to order boxes by centroid.
    fn mid(a: Self, b: Self) -> Self;

    /// Widen into the accumulator type.
    fn widen(self) -> Self::Acc;

    /// An entry count as an accumulator weight.
    fn weight(n: usize) -> Self::Acc;
}

impl Scalar for f32 {
    type Acc = f64;

    const ZERO: Self = 0.0;

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn weight(n: usize) -> f64 {
        n as f64
    }
}

impl Scalar for f64 {
    type Acc = Self;

    const ZERO: Self = 0.0;

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(self) -> Self {
        self
    }

    #[inline]
    fn weight(n: usize) -> Self {
        n as Self
    }
}

impl Scalar for i64 {
    type Acc = i128;

    const ZERO: Self = 0;

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Overflow-free floor average.
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(self) -> i128 {
        i128::from(self)
    }

    #[inline]
    fn weight(n: usize) -> i128 {
        n as i128
    }
}

/// Axis-aligned bounding box in 2D, stored as min/max corners.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left).
    pub min_x: T,
    /// Minimum y (top).
    pub min_y: T,
    /// Maximum x (right).
    pub max_x: T,
    /// Maximum y (bottom).
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a box from its min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Scalar> Aabb2D<T> {
    /// Create a box from an origin and a size.
    pub fn from_xywh(x: T, y: T, w: T, h: T) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    /// A degenerate box covering exactly one point.
    pub fn point(x: T, y: T) -> Self {
        Self::new(x, y, x, y)
    }

    /// Extent along x, clamped at zero for inverted boxes.
    pub fn width(&self) -> T {
        clamp_zero(self.max_x - self.min_x)
    }

    /// Extent along y, clamped at zero for inverted boxes.
    pub fn height(&self) -> T {
        clamp_zero(self.max_y - self.min_y)
    }

    /// Area in the widened accumulator.
    pub fn area(&self) -> T::Acc {
        self.width().widen() * self.height().widen()
    }

    /// Whether the point lies inside the box; edges are inclusive.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Whether the two boxes share at least one point (closed intervals).
    pub fn overlaps(&self, other: &Self) -> bool {
        le(self.min_x, other.max_x)
            && le(other.min_x, self.max_x)
            && le(self.min_y, other.max_y)
            && le(other.min_y, self.max_y)
    }

    /// Intersection of two boxes; inverted (see [`Aabb2D::is_empty`]) when disjoint.
    pub fn intersect(&self, other: &Self) -> Self {
        Self::new(
            max_t(self.min_x, other.min_x),
            max_t(self.min_y, other.min_y),
            min_t(self.max_x, other.max_x),
            min_t(self.max_y, other.max_y),
        )
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            min_t(self.min_x, other.min_x),
            min_t(self.min_y, other.min_y),
            max_t(self.max_x, other.max_x),
            max_t(self.max_y, other.max_y),
        )
    }

    /// True if the box is inverted. A zero-width box is not empty; it still covers a line.
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y)
    }

    /// Area growth needed for `self` to also cover `other`.
    pub(crate) fn enlargement(&self, other: &Self) -> T::Acc {
        self.union(other).area() - self.area()
    }

    pub(crate) fn centroid(&self, axis: Axis) -> T {
        match axis {
            Axis::X => T::mid(self.min_x, self.max_x),
            Axis::Y => T::mid(self.min_y, self.max_y),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

/// Total order for possibly-NaN scalars; incomparable values compare equal.
pub(crate) fn cmp_t<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

fn clamp_zero<T: Scalar>(v: T) -> T {
    if lt(v, T::ZERO) { T::ZERO } else { v }
}

fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    if lt(b, a) { b } else { a }
}

fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    if lt(a, b) { b } else { a }
}

fn le<T: PartialOrd>(a: T, b: T) -> bool {
    matches!(a.partial_cmp(&b), Some(Ordering::Less | Ordering::Equal))
}

fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    matches!(a.partial_cmp(&b), Some(Ordering::Less))
}
