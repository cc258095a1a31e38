#[derive(Debug, Clone, Copy, PartialEq)]

pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Forward hits along a ray, excluding the self-intersection band.
    pub const FORWARD: Interval = Interval {
        min: crate::FLOAT_EPS,
        max: f32::INFINITY,
    };

    /// Displayable intensity range after gamma mapping.
    pub const INTENSITY: Interval = Interval {
        min: 0.0,
        max: 0.999,
    };
}
