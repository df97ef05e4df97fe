//! Lumen scatter - how light leaves a surface.
//!
//! Given an incoming [`Ray`] and a [`HitRecord`] from the geometry layer, a
//! [`Material`] either absorbs the ray or returns an attenuation color and
//! an outgoing ray for the integrator to follow.
//!
//! Randomness is always passed in as `&mut dyn RngCore`; give each render
//! worker its own generator (see [`sampling::worker_rng`]).
//!
//! # Example
//!
//! ```
//! use lumen_scatter::{Color, HitRecord, Material, Ray, Scatter, Vec3};
//! use rand::SeedableRng;
//!
//! let glass = Material::dielectric(1.5);
//! let rec = HitRecord::new(1.0, Vec3::ZERO, Vec3::Y, &glass);
//! let ray = Ray::new(Vec3::Y, -Vec3::Y);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//!
//! let result = glass.scatter(&ray, &rec, &mut rng).expect("glass never absorbs");
//! assert_eq!(result.attenuation, Color::ONE);
//! ```

mod hittable;
mod library;
mod material;
pub mod optics;
pub mod sampling;

pub use hittable::HitRecord;
pub use library::{LibraryError, LibraryResult, MaterialDesc, MaterialLibrary};
pub use material::{
    Color, Dielectric, Lambertian, Material, Metal, Scatter, ScatterKind, ScatterResult,
};
pub use optics::{reflect, refract, schlick};
pub use sampling::{random_in_unit_sphere, worker_rng};

/// Re-export the math types materials are expressed in
pub use lumen_math::{Ray, Vec3};
