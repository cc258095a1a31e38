//! Scene description files.
//!
//! A scene is described in JSON: image size, camera, render settings, and
//! ordered lists of spheres and point lights. Vectors are written as
//! `[x, y, z]` arrays. Every section falls back to the demo defaults when
//! omitted.

use std::path::Path;

use glint_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};
use crate::material::FresnelBlend;

/// Output image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 675,
        }
    }
}

impl ImageSettings {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Look-from/look-at camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub look_from: [f32; 3],
    pub look_at: [f32; 3],
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Overrides the image aspect ratio when set
    pub aspect: Option<f32>,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            look_from: [0.0, 2.0, 3.0],
            look_at: [0.0, 2.0, 2.0],
            up: [0.0, 1.0, 0.0],
            vfov: 90.0,
            aspect: None,
        }
    }
}

/// What a ray that escapes the scene sees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundDescription {
    /// White-to-blue vertical gradient
    #[default]
    Sky,
    /// Constant color
    Solid([f32; 3]),
}

/// Sampling and recursion settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    /// Number of progressive passes, each adding `samples_per_pixel` samples
    pub passes: u32,
    pub background: BackgroundDescription,
    /// Add local shading when a ray leaves a Phong sphere from the inside
    pub shade_on_exit: bool,
    /// Recursion branches carrying less than this weight are not traced
    pub min_weight: f32,
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            samples_per_pixel: 5,
            max_depth: 20,
            passes: 1,
            background: BackgroundDescription::Sky,
            shade_on_exit: false,
            min_weight: 0.0,
            seed: 0,
        }
    }
}

/// Surface description, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDescription {
    Lambertian {
        albedo: [f32; 3],
    },
    Metal {
        albedo: [f32; 3],
    },
    Dielectric {
        ior: f32,
    },
    Phong {
        ambient: [f32; 3],
        diffuse: [f32; 3],
        specular: [f32; 3],
        shininess: f32,
        ior: f32,
        #[serde(default = "default_shade")]
        shade: f32,
        #[serde(default)]
        blend: FresnelBlend,
    },
    /// A catalog preset, optionally overriding its weights.
    Preset {
        name: String,
        #[serde(default)]
        shade: Option<f32>,
        #[serde(default)]
        blend: Option<FresnelBlend>,
    },
}

fn default_shade() -> f32 {
    1.0
}

impl MaterialDescription {
    pub fn preset(name: impl Into<String>) -> Self {
        Self::Preset {
            name: name.into(),
            shade: None,
            blend: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDescription {
    pub center: [f32; 3],
    pub radius: f32,
    pub material: MaterialDescription,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightDescription {
    pub color: [f32; 3],
    pub position: [f32; 3],
}

/// A complete scene file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub image: ImageSettings,
    pub camera: CameraDescription,
    pub render: RenderSettings,
    pub spheres: Vec<SphereDescription>,
    pub lights: Vec<LightDescription>,
}

impl SceneDescription {
    /// Load and validate a scene file.
    pub fn load<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let scene = Self::from_json(&text)?;
        log::info!(
            "Loaded scene {} ({} spheres, {} lights)",
            path.display(),
            scene.spheres.len(),
            scene.lights.len()
        );
        Ok(scene)
    }

    /// Parse and validate a scene from a JSON string.
    pub fn from_json(text: &str) -> SceneResult<Self> {
        let scene: Self = serde_json::from_str(text)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Serialize the scene back to pretty-printed JSON.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the settings that cannot be caught later by geometry constructors.
    pub fn validate(&self) -> SceneResult<()> {
        if self.image.width == 0 || self.image.height == 0 {
            return Err(SceneError::InvalidSettings(format!(
                "image size {}x{} is empty",
                self.image.width, self.image.height
            )));
        }
        if self.render.samples_per_pixel == 0 {
            return Err(SceneError::InvalidSettings(
                "samples_per_pixel must be at least 1".into(),
            ));
        }
        if self.render.min_weight.is_nan() || self.render.min_weight < 0.0 {
            return Err(SceneError::InvalidSettings(
                "min_weight must be non-negative".into(),
            ));
        }
        if self.render.passes == 0 {
            return Err(SceneError::InvalidSettings("passes must be at least 1".into()));
        }
        Ok(())
    }

    /// Aspect ratio used by the camera.
    pub fn aspect_ratio(&self) -> f32 {
        self.camera.aspect.unwrap_or_else(|| self.image.aspect_ratio())
    }

    /// The demo scene: a glass ground with bronze, cyan plastic and emerald
    /// spheres under one white light.
    pub fn demo() -> Self {
        let unit_sphere = |x: f32, preset: &str| SphereDescription {
            center: [x, 1.0, 0.0],
            radius: 1.0,
            material: MaterialDescription::preset(preset),
        };

        Self {
            image: ImageSettings::default(),
            camera: CameraDescription::default(),
            render: RenderSettings {
                background: BackgroundDescription::Solid([0.0, 0.0, 0.0]),
                // The glass ground splits every ray it touches
                min_weight: 1e-3,
                ..Default::default()
            },
            spheres: vec![
                SphereDescription {
                    center: [0.0, -100.0, -5.0],
                    radius: 100.0,
                    material: MaterialDescription::preset("glass"),
                },
                unit_sphere(0.0, "bronze"),
                unit_sphere(2.0, "cyan_plastic"),
                unit_sphere(-2.0, "emerald"),
            ],
            lights: vec![LightDescription {
                color: [1.0, 1.0, 1.0],
                position: [100.0, 100.0, 100.0],
            }],
        }
    }
}

/// Convert a description triple into a vector.
#[inline]
pub fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}
