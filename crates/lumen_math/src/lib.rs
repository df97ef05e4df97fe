//! Lumen math - vector algebra shared by the scattering core.
//!
//! [`Vec3`] doubles as point, direction and RGB color. It converts to and
//! from `glam::Vec3` for collaborators that already speak glam.

mod ray;
mod vec3;

pub use ray::Ray;
pub use vec3::{cross, dot, unit_vector, MathError, ParseVec3Error, Vec3};
