//! Static geography reference data: districts and their upazilas.
//!
//! Bundled into the binary at compile time; read-only. The original platform
//! shipped this as static JSON rather than a backend API, and nothing here
//! changes between deployments.

use serde::{Deserialize, Serialize};

/// A district with its sub-district (upazila) list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct District {
    pub id: u32,
    pub name: String,
    pub upazilas: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeographyFile {
    districts: Vec<District>,
}

/// The bundled district set
#[derive(Debug)]
pub struct Geography {
    districts: Vec<District>,
}

impl Geography {
    /// The dataset compiled into the library
    pub fn bundled() -> &'static Geography {
        lazy_static::lazy_static! {
            static ref BUNDLED: Geography = Geography::parse(include_str!("../data/districts.json"))
                .expect("Bundled geography data is malformed");
        }
        &BUNDLED
    }

    fn parse(raw: &str) -> serde_json::Result<Self> {
        let file: GeographyFile = serde_json::from_str(raw)?;
        Ok(Self {
            districts: file.districts,
        })
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    /// Look up a district by id
    pub fn district(&self, id: u32) -> Option<&District> {
        self.districts.iter().find(|d| d.id == id)
    }
}
