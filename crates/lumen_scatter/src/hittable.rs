//! Intersection record handed to materials by the geometry layer.

use crate::Material;
use lumen_math::Vec3;

/// Record of a ray-object intersection.
///
/// Produced by the geometry layer and only read by materials.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, pointing out of the surface.
    ///
    /// Unlike a front-face normal it is not flipped toward the incoming ray;
    /// dielectrics use its orientation to tell entering from exiting.
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
}

impl<'a> HitRecord<'a> {
    pub fn new(t: f32, p: Vec3, normal: Vec3, material: &'a Material) -> Self {
        Self {
            t,
            p,
            normal,
            material,
        }
    }
}
