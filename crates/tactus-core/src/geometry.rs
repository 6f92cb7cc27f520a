#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance from `a` to `b`.
    pub fn distance(a: Vec2, b: Vec2) -> f32 {
        Vec2::delta(a, b).length()
    }

    /// Vector pointing from `a` to `b`.
    pub fn delta(a: Vec2, b: Vec2) -> Vec2 {
        Vec2 {
            x: b.x - a.x,
            y: b.y - a.y,
        }
    }

    /// Angle of the `a -> b` vector in radians, as `atan2(dy, dx)`.
    pub fn bearing(a: Vec2, b: Vec2) -> f32 {
        (b.y - a.y).atan2(b.x - a.x)
    }
}
