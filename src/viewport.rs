use three_d::*;
use three_d_asset::AxisAlignedBoundingBox;

use crate::controls::OrbitControl;
use crate::framing::Framing;
use crate::settings::{CameraSettings, ControlSettings};
use crate::log; // macro import


/// Camera, orbit control and surface size of the viewer
pub struct ViewportState {
    camera: Camera,
    controls: OrbitControl,
    surface: (u32, u32),
    fov_degrees: f32,
    z_near: f32,
}
impl ViewportState {
    /// Creates the camera and an orbit control around the origin for a surface of `viewport`'s size
    pub fn new(viewport: Viewport, camera: &CameraSettings, controls: &ControlSettings) -> Self {
        let target = vec3(0.0, 0.0, 0.0);
        let cam = Camera::new_perspective(
            viewport,
            camera.initial_position,
            target,
            vec3(0.0, 1.0, 0.0),
            degrees(camera.fov_degrees),
            camera.z_near,
            camera.z_far,
        );
        Self {
            camera: cam,
            controls: OrbitControl::new(target, controls),
            surface: (viewport.width, viewport.height),
            fov_degrees: camera.fov_degrees,
            z_near: camera.z_near,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControl {
        &self.controls
    }

    /// Size of the render surface as of the last resize
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface
    }

    /// Width over height of the camera's viewport
    pub fn aspect(&self) -> f32 {
        self.camera.viewport().aspect()
    }

    /// Adapts the camera projection and the recorded surface size to a new surface size.
    /// A zero width or height is treated as one pixel. Returns true if the size changed.
    pub fn on_resize(&mut self, viewport: Viewport) -> bool {
        let viewport = Viewport {
            width: viewport.width.max(1),
            height: viewport.height.max(1),
            ..viewport
        };
        let changed = self.camera.set_viewport(viewport);
        self.surface = (viewport.width, viewport.height);
        changed
    }

    /// Feeds the frame's input to the orbit control and advances its damping.
    /// Returns true if the camera moved.
    pub fn update_controls(&mut self, events: &mut [Event]) -> bool {
        self.controls.handle_events(&self.camera, events);
        self.controls.update(&mut self.camera)
    }

    /// Places the camera, far plane and zoom limit so that a model with the given
    /// (pre-centering) bounds is in view. The model is expected to be centered at the origin.
    pub fn frame(&mut self, bounds: &AxisAlignedBoundingBox) -> Option<Framing> {
        let Some(framing) = Framing::from_bounds(bounds, self.fov_degrees) else {
            log!("ViewportState::frame(): empty bounding box, keeping the camera as is");
            return None;
        };
        log!("ViewportState::frame(): {:?}", framing);

        let position = *self.camera.position();
        let target = vec3(0.0, 0.0, 0.0);
        match framing.far_plane(self.z_near) {
            Some(z_far) => self.camera.set_perspective_projection(
                degrees(self.fov_degrees),
                self.z_near,
                z_far,
            ),
            None => log!(
                "ViewportState::frame(): far plane {} is not beyond the near plane {}, keeping {}",
                framing.z_far,
                self.z_near,
                self.camera.z_far()
            ),
        }
        self.camera.set_view(
            vec3(position.x, position.y, framing.camera_z),
            target,
            vec3(0.0, 1.0, 0.0),
        );

        match framing.zoom_limit() {
            Some(max_distance) => self.controls.max_distance = max_distance,
            None => log!(
                "ViewportState::frame(): zoom limit {} is not positive, keeping {}",
                framing.max_distance,
                self.controls.max_distance
            ),
        }
        self.controls.target = target;
        self.controls.update(&mut self.camera);

        Some(framing)
    }
}
