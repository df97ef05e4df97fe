//! Named material libraries loaded from JSON.
//!
//! ```json
//! { "materials": [
//!     { "name": "ground", "type": "lambertian", "albedo": [0.5, 0.5, 0.5] },
//!     { "name": "chrome", "type": "metal", "albedo": [0.8, 0.8, 0.8], "fuzz": 0.1 },
//!     { "name": "glass", "type": "dielectric", "refractive_index": 1.5 } ] }
//! ```
//!
//! Constructors on [`Material`] accept anything. The loader is the one place
//! parameters get checked, since a library usually comes from a user file.

use std::collections::HashMap;
use std::path::Path;

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::material::{Dielectric, Lambertian, Material, Metal};

/// Errors that can occur while building a material library.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter for material '{material}': {reason}")]
    InvalidParameter { material: String, reason: String },

    #[error("Duplicate material name: {0}")]
    DuplicateName(String),
}

pub type LibraryResult<T> = Result<T, LibraryError>;

/// Serialized description of a single material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Lambertian {
        albedo: Vec3,
    },
    Metal {
        albedo: Vec3,
        #[serde(default)]
        fuzz: f32,
    },
    Dielectric {
        refractive_index: f32,
    },
}

impl MaterialDesc {
    /// Check the parameters and build the material.
    ///
    /// `name` is only used for error messages and warnings.
    pub fn build(&self, name: &str) -> LibraryResult<Material> {
        let invalid = |reason: String| LibraryError::InvalidParameter {
            material: name.to_string(),
            reason,
        };

        match *self {
            MaterialDesc::Lambertian { albedo } => {
                check_albedo(albedo).map_err(invalid)?;
                Ok(Lambertian::new(albedo).into())
            }
            MaterialDesc::Metal { albedo, fuzz } => {
                check_albedo(albedo).map_err(invalid)?;
                if !fuzz.is_finite() || fuzz < 0.0 {
                    return Err(invalid(format!("fuzz must be a non-negative number, got {fuzz}")));
                }
                if fuzz > 1.0 {
                    log::warn!("Material '{}': fuzz {} is above 1", name, fuzz);
                }
                Ok(Metal::new(albedo, fuzz).into())
            }
            MaterialDesc::Dielectric { refractive_index } => {
                if !refractive_index.is_finite() || refractive_index <= 0.0 {
                    return Err(invalid(format!(
                        "refractive_index must be positive, got {refractive_index}"
                    )));
                }
                if refractive_index == 1.0 {
                    log::warn!("Material '{}': refractive index 1 does not bend light", name);
                }
                Ok(Dielectric::new(refractive_index).into())
            }
        }
    }
}

impl From<&Material> for MaterialDesc {
    fn from(material: &Material) -> Self {
        match material {
            Material::Lambertian(m) => MaterialDesc::Lambertian { albedo: m.albedo() },
            Material::Metal(m) => MaterialDesc::Metal {
                albedo: m.albedo(),
                fuzz: m.fuzz(),
            },
            Material::Dielectric(m) => MaterialDesc::Dielectric {
                refractive_index: m.refractive_index(),
            },
        }
    }
}

fn check_albedo(albedo: Vec3) -> Result<(), String> {
    if !albedo.is_finite() {
        return Err(format!("albedo has a non-finite component: [{albedo}]"));
    }
    if albedo.x < 0.0 || albedo.y < 0.0 || albedo.z < 0.0 {
        return Err(format!("albedo has a negative component: [{albedo}]"));
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
struct NamedDesc {
    name: String,
    #[serde(flatten)]
    desc: MaterialDesc,
}

#[derive(Debug, Serialize, Deserialize)]
struct LibraryFile {
    materials: Vec<NamedDesc>,
}

/// An ordered collection of named materials.
///
/// Materials are immutable once inserted and can be shared read-only across
/// render workers.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    entries: Vec<(String, Material)>,
    index: HashMap<String, usize>,
}

impl MaterialLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material under a new name.
    pub fn insert(&mut self, name: impl Into<String>, material: Material) -> LibraryResult<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(LibraryError::DuplicateName(name));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, material));
        Ok(())
    }

    /// Parse a library from a JSON string.
    pub fn from_json_str(json: &str) -> LibraryResult<Self> {
        let file: LibraryFile = serde_json::from_str(json)?;

        let mut library = Self::new();
        for entry in &file.materials {
            let material = entry.desc.build(&entry.name)?;
            log::debug!("Material '{}': {:?}", entry.name, material);
            library.insert(entry.name.clone(), material)?;
        }
        Ok(library)
    }

    /// Load a library from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> LibraryResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let library = Self::from_json_str(&json)?;
        log::info!("Loaded {} materials from {}", library.len(), path.display());
        Ok(library)
    }

    /// Serialize back to the JSON library format.
    pub fn to_json_string(&self) -> LibraryResult<String> {
        let file = LibraryFile {
            materials: self
                .entries
                .iter()
                .map(|(name, material)| NamedDesc {
                    name: name.clone(),
                    desc: material.into(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Look up a material by name.
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Material names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, material)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Material)> {
        self.entries.iter().map(|(name, material)| (name.as_str(), material))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
