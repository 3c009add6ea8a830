//! Geometry primitives: points, triangular faces and axis-aligned bounds

use glam::{Vec2, Vec3};

/// A point in 3D space
pub type Point3 = Vec3;

/// A triangular face with optional per-vertex texture coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Face {
    /// First vertex position
    pub a: Point3,
    /// Second vertex position
    pub b: Point3,
    /// Third vertex position
    pub c: Point3,
    /// Texture coordinate of `a` (z is unused for texturing)
    pub ta: Option<Point3>,
    /// Texture coordinate of `b`
    pub tb: Option<Point3>,
    /// Texture coordinate of `c`
    pub tc: Option<Point3>,
}

impl Face {
    /// Create an untextured face
    pub const fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            a,
            b,
            c,
            ta: None,
            tb: None,
            tc: None,
        }
    }

    /// Attach texture coordinates to the three vertices
    pub fn with_tex_coords(
        mut self,
        ta: Option<Point3>,
        tb: Option<Point3>,
        tc: Option<Point3>,
    ) -> Self {
        self.ta = ta;
        self.tb = tb;
        self.tc = tc;
        self
    }

    /// Vertex positions in winding order
    pub fn vertices(&self) -> [Point3; 3] {
        [self.a, self.b, self.c]
    }

    /// Texture coordinates in winding order, `(0, 0)` where absent
    pub fn tex_coords(&self) -> [Vec2; 3] {
        [self.ta, self.tb, self.tc].map(|t| t.unwrap_or(Vec3::ZERO).truncate())
    }

    /// Check if any vertex carries a texture coordinate
    pub fn is_textured(&self) -> bool {
        self.ta.is_some() || self.tb.is_some() || self.tc.is_some()
    }

    pub fn max_x(&self) -> f32 {
        self.a.x.max(self.b.x).max(self.c.x)
    }

    pub fn max_y(&self) -> f32 {
        self.a.y.max(self.b.y).max(self.c.y)
    }

    pub fn max_z(&self) -> f32 {
        self.a.z.max(self.b.z).max(self.c.z)
    }

    pub fn min_x(&self) -> f32 {
        self.a.x.min(self.b.x).min(self.c.x)
    }

    pub fn min_y(&self) -> f32 {
        self.a.y.min(self.b.y).min(self.c.y)
    }

    pub fn min_z(&self) -> f32 {
        self.a.z.min(self.b.z).min(self.c.z)
    }

    /// Axis-aligned bounds of this face
    pub fn bounds(&self) -> Aabb {
        Aabb {
            min: self.a.min(self.b).min(self.c),
            max: self.a.max(self.b).max(self.c),
        }
    }

    /// Unit face normal, see [`calc_normal`]
    pub fn normal(&self) -> Vec3 {
        calc_normal(self.a, self.b, self.c)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box that any point extends
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Check if no point has been added yet
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend_point(&mut self, point: Point3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn extend_face(&mut self, face: &Face) {
        let bounds = face.bounds();
        self.min = self.min.min(bounds.min);
        self.max = self.max.max(bounds.max);
    }

    /// Midpoint of the box, or the origin for an empty box
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.min + self.max) * 0.5
    }

    /// Edge lengths, zero for an empty box
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Check if two boxes overlap (touching counts)
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.cmple(other.max).all()
            && other.min.cmple(self.max).all()
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl FromIterator<Point3> for Aabb {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        let mut bounds = Self::EMPTY;
        for point in iter {
            bounds.extend_point(point);
        }
        bounds
    }
}

/// Scale a vector to unit length.
///
/// A zero vector is treated as having length 1 and comes back unchanged.
pub fn reduce_to_unit(v: Vec3) -> Vec3 {
    let length = v.length();
    if length == 0.0 { v } else { v / length }
}

/// Unit normal of the triangle `(a, b, c)`.
///
/// Computed as `(a - b) × (b - c)`, which points towards the viewer for a
/// counter-clockwise triangle in a right-handed system. Degenerate triangles
/// yield the zero vector.
pub fn calc_normal(a: Point3, b: Point3, c: Point3) -> Vec3 {
    reduce_to_unit((a - b).cross(b - c))
}
