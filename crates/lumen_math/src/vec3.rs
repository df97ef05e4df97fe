//! Three-component vector used for points, directions and colors.
//!
//! [`Vec3`] wraps [`glam::Vec3`] and forwards the arithmetic to it. The
//! wrapper adds the pieces glam does not have: a panicking `unit_vector`
//! with a checked twin, color accessors, the `"x y z"` text form and a
//! serde form as a plain `[x, y, z]` array.

use std::fmt;
use std::iter::Sum;
use std::ops::{
    Add, AddAssign, Deref, DerefMut, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub,
    SubAssign,
};
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from vector operations that have a checked variant.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("cannot normalize a zero-length vector")]
    ZeroLength,

    #[error("cannot normalize a vector of non-finite length")]
    NonFiniteLength,
}

/// Errors from parsing the `"x y z"` text form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseVec3Error {
    #[error("expected 3 components, found {0}")]
    ComponentCount(usize),

    #[error("invalid component {index}: {source}")]
    InvalidComponent {
        index: usize,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// A 3D vector of `f32` components.
///
/// Plain value type: copied freely, never required to be unit length. Code
/// that needs a unit vector normalizes explicitly with [`Vec3::unit_vector`].
/// Components are reachable as `v.x`, `v.y` and `v.z` through the inner
/// [`glam::Vec3`].
#[repr(transparent)]
#[derive(Default, Copy, Clone, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vec3(glam::Vec3);

impl Vec3 {
    pub const ZERO: Vec3 = Vec3(glam::Vec3::ZERO);
    pub const ONE: Vec3 = Vec3(glam::Vec3::ONE);
    pub const X: Vec3 = Vec3(glam::Vec3::X);
    pub const Y: Vec3 = Vec3(glam::Vec3::Y);
    pub const Z: Vec3 = Vec3(glam::Vec3::Z);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self(glam::Vec3::new(x, y, z))
    }

    /// A vector with all three components set to `v`.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self(glam::Vec3::splat(v))
    }

    /// Red channel when the vector holds a color.
    #[inline]
    pub fn r(&self) -> f32 {
        self.0.x
    }

    /// Green channel when the vector holds a color.
    #[inline]
    pub fn g(&self) -> f32 {
        self.0.y
    }

    /// Blue channel when the vector holds a color.
    #[inline]
    pub fn b(&self) -> f32 {
        self.0.z
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.0.dot(rhs.0)
    }

    /// Right-handed cross product.
    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3(self.0.cross(rhs.0))
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.0.length()
    }

    /// Squared length; skips the square root for threshold comparisons.
    #[inline]
    pub fn squared_length(self) -> f32 {
        self.0.length_squared()
    }

    /// Returns `self / self.length()`.
    ///
    /// # Panics
    ///
    /// Panics if the length is zero or not finite. That covers NaN or
    /// infinite components as well as a squared length that overflows
    /// `f32`. Use [`Vec3::try_unit_vector`] when the input may be degenerate.
    #[inline]
    pub fn unit_vector(self) -> Vec3 {
        let len = self.length();
        assert!(
            len.is_finite() && len > 0.0,
            "unit_vector needs a finite non-zero length, got {len}"
        );
        self / len
    }

    /// Checked form of [`Vec3::unit_vector`].
    pub fn try_unit_vector(self) -> Result<Vec3, MathError> {
        let len = self.length();
        if !len.is_finite() {
            Err(MathError::NonFiniteLength)
        } else if len > 0.0 {
            Ok(self / len)
        } else {
            Err(MathError::ZeroLength)
        }
    }

    /// Normalizes in place.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Vec3::unit_vector`].
    pub fn make_unit_vector(&mut self) {
        *self = self.unit_vector();
    }

    /// True when no component is NaN or infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        self.0.to_array()
    }
}

/// Free-function form of [`Vec3::dot`].
#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.dot(b)
}

/// Free-function form of [`Vec3::cross`].
#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b)
}

/// Free-function form of [`Vec3::unit_vector`]; panics on zero or non-finite length.
#[inline]
pub fn unit_vector(v: Vec3) -> Vec3 {
    v.unit_vector()
}

impl Deref for Vec3 {
    type Target = glam::Vec3;

    #[inline]
    fn deref(&self) -> &glam::Vec3 {
        &self.0
    }
}

impl DerefMut for Vec3 {
    #[inline]
    fn deref_mut(&mut self) -> &mut glam::Vec3 {
        &mut self.0
    }
}

/// Component access by position.
///
/// # Panics
///
/// Indices other than 0, 1 and 2 are a precondition violation and panic.
impl Index<usize> for Vec3 {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}

impl IndexMut<usize> for Vec3 {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.0[i]
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    #[inline]
    fn neg(self) -> Vec3 {
        Vec3(-self.0)
    }
}

macro_rules! forward_binop {
    ($trait:ident, $fn:ident, $assign_trait:ident, $assign_fn:ident) => {
        impl $trait for Vec3 {
            type Output = Vec3;

            #[inline]
            fn $fn(self, rhs: Vec3) -> Vec3 {
                Vec3(self.0.$fn(rhs.0))
            }
        }

        impl $trait<f32> for Vec3 {
            type Output = Vec3;

            #[inline]
            fn $fn(self, rhs: f32) -> Vec3 {
                Vec3(self.0.$fn(rhs))
            }
        }

        impl $assign_trait for Vec3 {
            #[inline]
            fn $assign_fn(&mut self, rhs: Vec3) {
                self.0.$assign_fn(rhs.0);
            }
        }

        impl $assign_trait<f32> for Vec3 {
            #[inline]
            fn $assign_fn(&mut self, rhs: f32) {
                self.0.$assign_fn(rhs);
            }
        }
    };
}

forward_binop!(Add, add, AddAssign, add_assign);
forward_binop!(Sub, sub, SubAssign, sub_assign);
forward_binop!(Mul, mul, MulAssign, mul_assign);
forward_binop!(Div, div, DivAssign, div_assign);

impl Mul<Vec3> for f32 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        Vec3(self * v.0)
    }
}

impl Sum for Vec3 {
    fn sum<I: Iterator<Item = Vec3>>(iter: I) -> Vec3 {
        Vec3(iter.map(|v| v.0).sum())
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(a: [f32; 3]) -> Self {
        Vec3(glam::Vec3::from_array(a))
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl From<glam::Vec3> for Vec3 {
    fn from(v: glam::Vec3) -> Self {
        Vec3(v)
    }
}

impl From<Vec3> for glam::Vec3 {
    fn from(v: Vec3) -> Self {
        v.0
    }
}

impl fmt::Debug for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.0.x, self.0.y, self.0.z)
    }
}

impl FromStr for Vec3 {
    type Err = ParseVec3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(ParseVec3Error::ComponentCount(parts.len()));
        }

        let mut v = Vec3::ZERO;
        for (index, part) in parts.iter().enumerate() {
            v[index] = part
                .parse()
                .map_err(|source| ParseVec3Error::InvalidComponent { index, source })?;
        }
        Ok(v)
    }
}
