use three_d::*;

use crate::settings::LightSettings;


/// Root of the scene: the lights plus every model attached to it
pub struct Scene<N> {
    children: Vec<N>,
}
impl<N> Scene<N> {
    pub fn new() -> Self {
        Self { children: Vec::new() }
    }

    /// Attaches a node as a child of the scene root
    pub fn add(&mut self, node: N) {
        self.children.push(node);
    }

    pub fn children(&self) -> &[N] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
impl<N> Default for Scene<N> {
    fn default() -> Self {
        Self::new()
    }
}


/// An ambient light and a directional light shining from above and behind the viewer
pub struct Lighting {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}
impl Lighting {
    pub fn new(context: &Context, settings: &LightSettings) -> Self {
        Self {
            ambient: AmbientLight::new(context, settings.ambient_intensity, Srgba::WHITE),
            directional: DirectionalLight::new(
                context,
                settings.directional_intensity,
                Srgba::WHITE,
                &light_direction(settings.directional_position),
            ),
        }
    }

    pub fn lights(&self) -> [&dyn Light; 2] {
        [&self.ambient, &self.directional]
    }
}


/// Direction of a directional light placed at `position` and aimed at the origin
pub fn light_direction(position: Vec3) -> Vec3 {
    -position.normalize()
}


impl Scene<Model<PhysicalMaterial>> {
    /// Draws every attached model into `target`
    pub fn render(&self, target: &RenderTarget, camera: &Camera, lighting: &Lighting) {
        target.render(
            camera,
            self.children.iter().flat_map(|model| model.iter()),
            &lighting.lights(),
        );
    }
}
