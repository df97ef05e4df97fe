//! Geometric optics primitives shared by the materials.

use lumen_math::Vec3;

/// Mirror `v` about the normal `n`.
///
/// `n` should be unit length; otherwise the result is scaled along `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract `v` through a surface with normal `n` using Snell's law.
///
/// `n` must face against `v` and `ni_over_nt` is the ratio of the incident
/// to the transmitted refractive index. Returns `None` on total internal
/// reflection, including the grazing case where the discriminant is exactly 0.
///
/// # Panics
///
/// Panics if `v` has zero or non-finite length.
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.unit_vector();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation of Fresnel reflectance.
///
/// Only meaningful for `cosine` in [0, 1].
#[inline]
pub fn schlick(cosine: f32, ref_idx: f32) -> f32 {
    let r0 = (1.0 - ref_idx) / (1.0 + ref_idx);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
