use three_d_asset::AxisAlignedBoundingBox;


/// Extra distance beyond an exact fit of the largest dimension
pub const FIT_MARGIN: f32 = 1.5;
/// Far clip plane relative to the camera-to-far-edge distance
pub const FAR_PLANE_FACTOR: f32 = 3.0;
/// Maximum orbit distance relative to the camera-to-far-edge distance
pub const MAX_DISTANCE_FACTOR: f32 = 2.0;


/// Camera placement derived from a model's bounding box.
///
/// This is a heuristic: the largest box dimension is fitted into the vertical
/// field of view, then fixed margins are applied for the camera distance, the
/// far plane and the zoom-out limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    /// Distance at which the largest dimension exactly fills the vertical field of view
    pub fit_distance: f32,
    /// Camera position along the view axis
    pub camera_z: f32,
    /// Estimated distance from the camera to the far side of the model
    pub far_edge: f32,
    pub z_far: f32,
    pub max_distance: f32,
}
impl Framing {
    /// Computes the framing for `bounds` as seen with a vertical field of view of `fov_degrees`.
    /// Returns `None` for an empty or zero-sized box.
    pub fn from_bounds(bounds: &AxisAlignedBoundingBox, fov_degrees: f32) -> Option<Self> {
        if bounds.is_empty() {
            return None;
        }
        let size = bounds.size();
        let max_dim = size.x.max(size.y).max(size.z);
        if max_dim <= 0.0 || !max_dim.is_finite() {
            return None;
        }
        Some(Self::new(max_dim, bounds.min().z, fov_degrees))
    }

    /// Computes the framing from the largest box dimension and the box's minimum z
    pub fn new(max_dim: f32, min_z: f32, fov_degrees: f32) -> Self {
        let fit_distance = fit_distance(max_dim, fov_degrees);
        let far_edge = if min_z < 0.0 {
            -min_z + fit_distance
        } else {
            fit_distance - min_z
        };
        Self {
            fit_distance,
            camera_z: fit_distance * FIT_MARGIN,
            far_edge,
            z_far: far_edge * FAR_PLANE_FACTOR,
            max_distance: far_edge * MAX_DISTANCE_FACTOR,
        }
    }

    /// Far plane to project with, or `None` if the estimate does not lie beyond `z_near`.
    /// A box entirely at positive z beyond the fit distance gives a negative far edge.
    pub fn far_plane(&self, z_near: f32) -> Option<f32> {
        (self.z_far.is_finite() && self.z_far > z_near).then_some(self.z_far)
    }

    /// Maximum orbit distance, or `None` if the estimate is not positive
    pub fn zoom_limit(&self) -> Option<f32> {
        (self.max_distance.is_finite() && self.max_distance > 0.0).then_some(self.max_distance)
    }
}


/// Distance at which an extent of `max_dim` exactly fills a vertical field of view of `fov_degrees`
pub fn fit_distance(max_dim: f32, fov_degrees: f32) -> f32 {
    let fov = fov_degrees.to_radians();
    (max_dim / 2.0 / (fov / 2.0).tan()).abs()
}
