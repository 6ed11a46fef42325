use cgmath::{Point3, Vector3};

/// An axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Aabb { min, max }
    }

    /// The box spanning `origin .. origin + size`.
    pub fn from_origin(origin: Point3<f32>, size: Vector3<f32>) -> Self {
        Aabb {
            min: origin,
            max: origin + size,
        }
    }

    /// Whether the two boxes overlap. Touching faces count as overlap.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn contains(&self, point: Point3<f32>) -> bool {
        (self.min.x..=self.max.x).contains(&point.x)
            && (self.min.y..=self.max.y).contains(&point.y)
            && (self.min.z..=self.max.z).contains(&point.z)
    }

    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }
}

/// Decides whether a bounding box should be drawn this frame.
pub trait VisibilityTest {
    fn is_visible(&self, aabb: &Aabb) -> bool;
}

impl<F> VisibilityTest for F
where
    F: Fn(&Aabb) -> bool,
{
    fn is_visible(&self, aabb: &Aabb) -> bool {
        self(aabb)
    }
}

/// A box used as a coarse view volume: anything overlapping it is visible.
impl VisibilityTest for Aabb {
    fn is_visible(&self, aabb: &Aabb) -> bool {
        self.intersects(aabb)
    }
}
