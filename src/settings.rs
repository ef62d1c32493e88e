use three_d::prelude::*;


/// Path of the single model asset, relative to the page
pub const ASSET_PATH: &str = "models/our-model.glb";


/// Perspective camera parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Where the camera sits until a model has been framed
    pub initial_position: Vec3,
}
impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            z_near: 0.1,
            z_far: 1000.0,
            initial_position: vec3(0.0, 0.0, 5.0),
        }
    }
}


/// Orbit control parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSettings {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub screen_space_panning: bool,
    pub min_polar_angle_degrees: f32,
    pub max_polar_angle_degrees: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}
impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.25,
            screen_space_panning: false,
            min_polar_angle_degrees: 0.0,
            max_polar_angle_degrees: 90.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
        }
    }
}


/// Scene lighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSettings {
    pub ambient_intensity: f32,
    pub directional_intensity: f32,
    /// Position of the directional light; it shines from here towards the origin
    pub directional_position: Vec3,
}
impl Default for LightSettings {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.6,
            directional_intensity: 0.8,
            directional_position: vec3(0.0, 1.0, 1.0),
        }
    }
}


/// Texts and styles of the status overlay elements
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    pub loading_html: String,
    pub loading_style: String,
    pub error_html: String,
    pub error_style: String,
}
impl Default for OverlaySettings {
    fn default() -> Self {
        const CENTERED: &str = "position: absolute; top: 50%; left: 50%; \
            transform: translate(-50%, -50%); font-size: 20px;";
        Self {
            loading_html: "Loading model...".to_string(),
            loading_style: format!("{} color: black;", CENTERED),
            error_html: "Failed to load the model.<br>\
                Please check your network connection or refresh the page to try again."
                .to_string(),
            error_style: format!("{} color: red; text-align: center;", CENTERED),
        }
    }
}


/// Everything the viewer needs to start
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSettings {
    pub title: String,
    pub asset_path: String,
    /// RGBA clear color of the render surface
    pub clear_color: [f32; 4],
    pub camera: CameraSettings,
    pub controls: ControlSettings,
    pub lights: LightSettings,
    pub overlay: OverlaySettings,
}
impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            title: "glb-viewer".to_string(),
            asset_path: ASSET_PATH.to_string(),
            clear_color: [1.0, 1.0, 1.0, 1.0],
            camera: CameraSettings::default(),
            controls: ControlSettings::default(),
            lights: LightSettings::default(),
            overlay: OverlaySettings::default(),
        }
    }
}
