//! Phong material coefficients and the named preset catalog.
//!
//! Coefficients follow the classic OpenGL material table (ambient, diffuse,
//! specular reflectance plus a normalized shininess), extended with the
//! refractive index of each substance.

use glint_math::Vec3;
use serde::{Deserialize, Serialize};

/// Shininess is stored normalized and scaled by this factor when read.
pub const SHININESS_SCALE: f32 = 128.0;

/// Phong reflectance coefficients of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongCoefficients {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// Normalized shininess (0-1)
    pub shininess: f32,
    /// Index of refraction
    pub ior: f32,
}

impl PhongCoefficients {
    pub const fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32, ior: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
            ior,
        }
    }

    /// Specular exponent used by the lighting model.
    #[inline]
    pub fn exponent(&self) -> f32 {
        self.shininess * SHININESS_SCALE
    }
}

/// How the reflected and refracted contributions of a Phong surface are weighted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FresnelBlend {
    /// Reflect R and refract 1 - R, with R from Schlick's approximation.
    #[default]
    Schlick,
    /// Constant weights regardless of the viewing angle.
    Fixed { reflect: f32, refract: f32 },
}

pub const EMERALD: PhongCoefficients = PhongCoefficients::new(
    Vec3::new(0.0215, 0.1745, 0.0215),
    Vec3::new(0.07568, 0.61424, 0.07568),
    Vec3::new(0.633, 0.727811, 0.633),
    0.6,
    1.58,
);

pub const PEARL: PhongCoefficients = PhongCoefficients::new(
    Vec3::new(0.25, 0.20725, 0.20725),
    Vec3::new(1.0, 0.829, 0.829),
    Vec3::new(0.296648, 0.296648, 0.296648),
    0.088,
    1.61,
);

pub const BRONZE: PhongCoefficients = PhongCoefficients::new(
    Vec3::new(0.2125, 0.1275, 0.054),
    Vec3::new(0.714, 0.4284, 0.18144),
    Vec3::new(0.393548, 0.271906, 0.166721),
    0.2,
    1.18,
);

pub const GOLD: PhongCoefficients = PhongCoefficients::new(
    Vec3::new(0.24725, 0.1995, 0.0745),
    Vec3::new(0.75164, 0.60648, 0.22648),
    Vec3::new(0.628281, 0.555802, 0.366065),
    0.4,
    0.47,
);

pub const CYAN_PLASTIC: PhongCoefficients = PhongCoefficients::new(
    Vec3::new(0.0, 0.1, 0.06),
    Vec3::new(0.0, 0.50980392, 0.50980392),
    Vec3::new(0.50196078, 0.50196078, 0.50196078),
    0.25,
    1.46,
);

pub const RED_PLASTIC: PhongCoefficients = PhongCoefficients::new(
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(0.5, 0.0, 0.0),
    Vec3::new(0.7, 0.6, 0.6),
    0.25,
    1.46,
);

pub const GREEN_RUBBER: PhongCoefficients = PhongCoefficients::new(
    Vec3::new(0.0, 0.05, 0.0),
    Vec3::new(0.4, 0.5, 0.4),
    Vec3::new(0.04, 0.7, 0.04),
    0.078125,
    1.519,
);

pub const YELLOW_RUBBER: PhongCoefficients = PhongCoefficients::new(
    Vec3::new(0.05, 0.05, 0.0),
    Vec3::new(0.5, 0.5, 0.4),
    Vec3::new(0.7, 0.7, 0.04),
    0.078125,
    1.519,
);

pub const GLASS: PhongCoefficients = PhongCoefficients::new(
    Vec3::new(0.1, 0.1, 0.1),
    Vec3::new(0.1, 0.1, 0.1),
    Vec3::new(0.8, 0.8, 0.8),
    0.75,
    1.5,
);

/// Every named preset, in catalog order.
pub const PRESETS: &[(&str, PhongCoefficients)] = &[
    ("emerald", EMERALD),
    ("pearl", PEARL),
    ("bronze", BRONZE),
    ("gold", GOLD),
    ("cyan_plastic", CYAN_PLASTIC),
    ("red_plastic", RED_PLASTIC),
    ("green_rubber", GREEN_RUBBER),
    ("yellow_rubber", YELLOW_RUBBER),
    ("glass", GLASS),
];

/// Look up a preset by name (case-insensitive, `-` and `_` interchangeable).
pub fn find_preset(name: &str) -> Option<PhongCoefficients> {
    let key = name.trim().to_ascii_lowercase().replace('-', "_");
    PRESETS
        .iter()
        .find(|(preset, _)| *preset == key)
        .map(|(_, coefficients)| *coefficients)
}
