//! Model normalization.
//!
//! Loaded models arrive in arbitrary units and positions. Before a model is
//! shown it is reoriented, uniformly scaled so its longest axis matches the
//! configured fit size, and recentered at the origin; the camera is then
//! placed far enough that the whole bounding sphere is in view.

use cgmath::{EuclideanSpace, InnerSpace, Point3, Quaternion, Rotation, Vector3};

/// Camera distance as a multiple of the fitted model's bounding-sphere
/// radius. Enough margin that the model never clips the frustum edges.
pub const FRAMING_FACTOR: f32 = 2.5;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// Bounding box of a point set, or `None` if the set is empty.
    pub fn from_points(points: impl IntoIterator<Item = Point3<f32>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for p in points {
            aabb.min.x = aabb.min.x.min(p.x);
            aabb.min.y = aabb.min.y.min(p.y);
            aabb.min.z = aabb.min.z.min(p.z);
            aabb.max.x = aabb.max.x.max(p.x);
            aabb.max.y = aabb.max.y.max(p.y);
            aabb.max.z = aabb.max.z.max(p.z);
        }
        Some(aabb)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f32> {
        Point3::midpoint(self.min, self.max)
    }

    /// Longest edge of the box.
    pub fn max_dim(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }

    /// Radius of the sphere enclosing the box (half the diagonal).
    pub fn bounding_radius(&self) -> f32 {
        self.size().magnitude() / 2.0
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Aabb {
            min: self.min * factor,
            max: self.max * factor,
        }
    }
}

/// The transform that normalizes a model: fixed reorientation, uniform
/// scale, and the translation that moves the scaled box's center to the
/// origin. Applied as translate ∘ rotate ∘ scale, like any instance
/// transform; scale being uniform, rotation and scale commute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub rotation: Quaternion<f32>,
    pub scale: f32,
    pub translation: Vector3<f32>,
}

/// Camera framing for a normalized model: orbit distance from the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFrame {
    pub distance: f32,
}

/// Compute the normalizing placement and camera framing for a model.
///
/// The box is measured after applying `orientation`, so the fit holds for
/// the model as it will actually stand in the scene. A degenerate box
/// (zero, infinite or NaN extent) keeps scale `1.0` and frames the camera
/// as if the radius were one unit; no NaN reaches the transform.
///
/// # Arguments
///
/// * `points` are the model's vertex positions (all meshes)
/// * `orientation` is the viewer's empirical reorientation rotation
/// * `fit_size` is the target length of the longest axis
pub fn fit_placement(
    points: impl IntoIterator<Item = [f32; 3]>,
    orientation: Quaternion<f32>,
    fit_size: f32,
) -> (Placement, CameraFrame) {
    let rotated = points
        .into_iter()
        .map(|p| Point3::from_vec(orientation.rotate_vector(Vector3::from(p))));

    let identity = Placement {
        rotation: orientation,
        scale: 1.0,
        translation: Vector3::new(0.0, 0.0, 0.0),
    };
    let fallback_frame = CameraFrame {
        distance: FRAMING_FACTOR,
    };

    let Some(aabb) = Aabb::from_points(rotated) else {
        return (identity, fallback_frame);
    };

    let max_dim = aabb.max_dim();
    let scale = if max_dim.is_finite() && max_dim > 0.0 {
        fit_size / max_dim
    } else {
        1.0
    };

    let fitted = aabb.scaled(scale);
    let center = fitted.center().to_vec();
    let translation = if center.x.is_finite() && center.y.is_finite() && center.z.is_finite() {
        -center
    } else {
        Vector3::new(0.0, 0.0, 0.0)
    };

    let radius = fitted.bounding_radius();
    let distance = if radius.is_finite() && radius > 0.0 {
        FRAMING_FACTOR * radius
    } else {
        FRAMING_FACTOR
    };

    (
        Placement {
            rotation: orientation,
            scale,
            translation,
        },
        CameraFrame { distance },
    )
}
