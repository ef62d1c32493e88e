use std::f32::consts::PI;
use three_d::*;

use crate::settings::ControlSettings;


const EPS: f32 = 0.000001;
const WORLD_UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };


/// Orbit control with inertial damping, polar-angle limits and a zoom range.
///
/// Input events only accumulate rotation, zoom and pan deltas; [OrbitControl::update]
/// applies them to the camera and must be called once per frame. With damping
/// enabled each update applies a `damping_factor` share of the pending deltas and
/// keeps the rest for the following frames.
pub struct OrbitControl {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    /// Pan in screen space (true) or in the plane orthogonal to the world up axis (false)
    pub screen_space_panning: bool,
    /// Polar angle limits in radians, measured from the world up axis
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    pan_offset: Vec3,
}
impl OrbitControl {
    /// Creates an orbit control around `target`
    pub fn new(target: Vec3, settings: &ControlSettings) -> Self {
        Self {
            target,
            enable_damping: settings.enable_damping,
            damping_factor: settings.damping_factor,
            screen_space_panning: settings.screen_space_panning,
            min_polar_angle: settings.min_polar_angle_degrees.to_radians(),
            max_polar_angle: settings.max_polar_angle_degrees.to_radians(),
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
            rotate_speed: settings.rotate_speed,
            zoom_speed: settings.zoom_speed,
            pan_speed: settings.pan_speed,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_offset: Vec3::zero(),
        }
    }

    /// Accumulates rotation, zoom and pan from the frame's events.
    /// Returns true if any event was consumed.
    pub fn handle_events(&mut self, camera: &Camera, events: &mut [Event]) -> bool {
        let height = camera.viewport().height.max(1) as f32;
        let mut consumed = false;
        for event in events.iter_mut() {
            match event {
                Event::MouseMotion { delta, button, handled, .. } if !*handled => {
                    match button {
                        Some(MouseButton::Left) => {
                            self.rotate_left(2.0 * PI * delta.0 / height * self.rotate_speed);
                            self.rotate_up(2.0 * PI * delta.1 / height * self.rotate_speed);
                        }
                        Some(MouseButton::Right) => {
                            self.pan(camera, delta.0 * self.pan_speed, delta.1 * self.pan_speed);
                        }
                        _ => continue,
                    }
                    *handled = true;
                    consumed = true;
                }
                // two-finger pinch on touch screens is also delivered as a wheel event
                Event::MouseWheel { delta, handled, .. } if !*handled => {
                    self.zoom(delta.1);
                    *handled = true;
                    consumed = true;
                }
                _ => {}
            }
        }
        consumed
    }

    /// Rotates counter-clockwise around the up axis by `angle` radians
    pub fn rotate_left(&mut self, angle: f32) {
        self.theta_delta -= angle;
    }

    /// Rotates towards the up axis by `angle` radians
    pub fn rotate_up(&mut self, angle: f32) {
        self.phi_delta -= angle;
    }

    /// Moves the camera towards the target by `scale` (< 1)
    pub fn dolly_in(&mut self, scale: f32) {
        self.scale *= scale;
    }

    /// Moves the camera away from the target by `scale` (< 1)
    pub fn dolly_out(&mut self, scale: f32) {
        self.scale /= scale;
    }

    fn zoom(&mut self, amount: f32) {
        let scale = 0.95_f32.powf(self.zoom_speed);
        if amount > 0.0 {
            self.dolly_in(scale);
        } else if amount < 0.0 {
            self.dolly_out(scale);
        }
    }

    /// Pans by a pointer movement of (`dx`, `dy`) pixels
    pub fn pan(&mut self, camera: &Camera, dx: f32, dy: f32) {
        let height = camera.viewport().height.max(1) as f32;
        // the projection's [1][1] entry is 1 / tan(fov_y / 2)
        let half_fov_tan = 1.0 / camera.projection()[1][1];
        let target_distance = (*camera.position() - self.target).magnitude() * half_fov_tan;

        let right = camera.right_direction();
        self.pan_offset += right * (-2.0 * dx * target_distance / height);

        let up = if self.screen_space_panning {
            right.cross(camera.view_direction())
        } else {
            WORLD_UP.cross(right)
        };
        self.pan_offset += up * (2.0 * dy * target_distance / height);
    }

    /// Applies the pending deltas to the camera. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let position = *camera.position();
        let offset = position - self.target;

        let mut radius = offset.magnitude();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        let factor = if self.enable_damping { self.damping_factor } else { 1.0 };
        theta += self.theta_delta * factor;
        phi += self.phi_delta * factor;

        phi = phi.max(self.min_polar_angle).min(self.max_polar_angle);
        phi = phi.max(EPS).min(PI - EPS);

        radius *= self.scale;
        radius = radius.max(self.min_distance).min(self.max_distance).max(EPS);

        let previous_target = self.target;
        self.target += self.pan_offset * factor;

        let offset = vec3(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let new_position = self.target + offset;
        camera.set_view(new_position, self.target, WORLD_UP);

        if self.enable_damping {
            self.theta_delta *= 1.0 - self.damping_factor;
            self.phi_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vec3::zero();
        }
        self.scale = 1.0;

        (new_position - position).magnitude2() > EPS
            || (self.target - previous_target).magnitude2() > EPS
    }
}
