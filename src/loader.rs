use bus::{Bus, BusReader};
use three_d::prelude::*;
use three_d::CpuModel;
use three_d_asset::{io::RawAssets, AxisAlignedBoundingBox, Geometry};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::error::LoadError;
use crate::log; // macro import


const PROGRESS_CAPACITY: usize = 64;


/// Bytes received so far while fetching an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub loaded: u64,
    /// Size announced by the server, if any
    pub total: Option<u64>,
}
impl Progress {
    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some(self.loaded as f64 / total as f64 * 100.0),
            _ => None,
        }
    }
}


/// Where asset bytes come from
#[allow(async_fn_in_trait)]
pub trait AssetSource {
    /// Fetches the whole asset at `path`, reporting progress as bytes arrive
    async fn fetch(
        &self,
        path: &str,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<Vec<u8>, LoadError>;
}


/// Fetches assets relative to the page with the browser's `fetch`, streaming the body
pub struct HttpSource;
impl AssetSource for HttpSource {
    async fn fetch(
        &self,
        path: &str,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<Vec<u8>, LoadError> {
        let win = web_sys::window().ok_or_else(|| LoadError::Fetch("no window".to_string()))?;
        let resp_val = JsFuture::from(win.fetch_with_str(path))
            .await
            .map_err(LoadError::from_js)?;
        let resp: web_sys::Response = resp_val.dyn_into().map_err(LoadError::from_js)?;

        if !resp.ok() {
            return Err(LoadError::Http { status: resp.status(), text: resp.status_text() });
        }

        let total = resp.headers()
            .get("content-length")
            .ok()
            .flatten()
            .and_then(|s| s.parse::<u64>().ok());

        let mut bytes = Vec::<u8>::new();
        let Some(body) = resp.body() else {
            return Ok(bytes);
        };
        let reader: web_sys::ReadableStreamDefaultReader = body.get_reader()
            .dyn_into()
            .map_err(|e| LoadError::from_js(e.into()))?;
        loop {
            let chunk = JsFuture::from(reader.read())
                .await
                .map_err(LoadError::from_js)?;
            let done = js_sys::Reflect::get(&chunk, &JsValue::from_str("done"))
                .map_err(LoadError::from_js)?
                .as_bool()
                .unwrap_or(true);
            if done {
                break;
            }
            let value = js_sys::Reflect::get(&chunk, &JsValue::from_str("value"))
                .map_err(LoadError::from_js)?;
            let array = js_sys::Uint8Array::new(&value);
            let start = bytes.len();
            bytes.resize(start + array.length() as usize, 0);
            array.copy_to(&mut bytes[start..]);
            progress(Progress { loaded: bytes.len() as u64, total });
        }
        Ok(bytes)
    }
}


/// A decoded model, already translated so that its bounding box is centered at the origin
#[derive(Clone)]
pub struct LoadedAsset {
    pub model: CpuModel,
    /// Bounding box of the model before it was centered
    pub bounds: AxisAlignedBoundingBox,
}


pub type LoadOutcome = Result<LoadedAsset, LoadError>;


/// Fetches and decodes binary glTF assets
pub struct ModelLoader<S> {
    source: S,
}
impl<S: AssetSource> ModelLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetches, decodes and centers the model at `path`
    pub async fn load(&self, path: &str, mut on_progress: impl FnMut(Progress)) -> LoadOutcome {
        let bytes = self.source.fetch(path, &mut on_progress).await?;
        log!("ModelLoader::load(): fetched {} bytes from {}", bytes.len(), path);

        let mut model = decode(path, bytes)?;
        let bounds = model_bounds(&model);
        if !bounds.is_empty() {
            center_model(&mut model, bounds.center());
        }
        log!(
            "ModelLoader::load(): {} primitives, bounds min={:?} max={:?}",
            model.geometries.len(),
            bounds.min(),
            bounds.max()
        );
        Ok(LoadedAsset { model, bounds })
    }
}


/// Decodes a glTF asset; `path` selects the format by its extension
pub fn decode(path: &str, bytes: Vec<u8>) -> Result<CpuModel, LoadError> {
    let mut raw = RawAssets::new();
    raw.insert(path, bytes);
    let scene: three_d_asset::Scene = raw.deserialize(path)
        .map_err(|e| LoadError::Decode(e.to_string()))?;
    Ok(scene.into())
}


/// Axis-aligned bounding box of every primitive's vertices in model space
pub fn model_bounds(model: &CpuModel) -> AxisAlignedBoundingBox {
    let mut positions = Vec::<Vec3>::new();
    for primitive in model.geometries.iter() {
        let local = match &primitive.geometry {
            Geometry::Triangles(mesh) => mesh.positions.to_f32(),
            Geometry::Points(cloud) => cloud.positions.to_f32(),
        };
        positions.extend(
            local.into_iter()
                .map(|p| (primitive.transformation * p.extend(1.0)).truncate())
        );
    }
    if positions.is_empty() {
        return AxisAlignedBoundingBox::EMPTY;
    }
    AxisAlignedBoundingBox::new_with_positions(&positions)
}


/// Moves the model by `-center`
pub fn center_model(model: &mut CpuModel, center: Vec3) {
    let translation = Mat4::from_translation(-center);
    for primitive in model.geometries.iter_mut() {
        primitive.transformation = translation * primitive.transformation;
    }
}


/// Sending half of a load: publishes progress and the single outcome to a [LoadMonitor]
pub struct LoadReporter {
    progress: Bus<Progress>,
    outcome: Bus<LoadOutcome>,
}
impl LoadReporter {
    /// Runs the load to completion and publishes its outcome
    pub async fn run<S: AssetSource>(mut self, loader: ModelLoader<S>, path: String) {
        let progress = &mut self.progress;
        let outcome = loader.load(&path, |p| {
            // lossy: a full buffer only drops a log line
            let _ = progress.try_broadcast(p);
        }).await;
        let _ = self.outcome.try_broadcast(outcome);
    }
}


/// Receiving half of a load, polled once per frame
pub struct LoadMonitor {
    progress: BusReader<Progress>,
    outcome: BusReader<LoadOutcome>,
    settled: bool,
}
impl LoadMonitor {
    /// Hands pending progress to `on_progress` and returns the outcome once it is available.
    /// After the outcome has been returned this always returns `None` and reports no progress.
    pub fn poll(&mut self, mut on_progress: impl FnMut(Progress)) -> Option<LoadOutcome> {
        if self.settled {
            return None;
        }
        while let Ok(p) = self.progress.try_recv() {
            on_progress(p);
        }
        match self.outcome.try_recv() {
            Ok(outcome) => {
                self.settled = true;
                Some(outcome)
            }
            Err(_) => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }
}


/// Creates the lock-free channel pair between a load task and the render loop
pub fn load_channel() -> (LoadReporter, LoadMonitor) {
    let mut progress = Bus::<Progress>::new(PROGRESS_CAPACITY);
    let rx_progress = progress.add_rx();
    // exactly one outcome is ever sent
    let mut outcome = Bus::<LoadOutcome>::new(1);
    let rx_outcome = outcome.add_rx();
    (
        LoadReporter { progress, outcome },
        LoadMonitor { progress: rx_progress, outcome: rx_outcome, settled: false },
    )
}


#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Serves fixed bytes in chunks
    pub(crate) struct MemorySource {
        pub bytes: Vec<u8>,
        pub chunk_size: usize,
    }
    impl AssetSource for MemorySource {
        async fn fetch(
            &self,
            _path: &str,
            progress: &mut dyn FnMut(Progress),
        ) -> Result<Vec<u8>, LoadError> {
            let total = Some(self.bytes.len() as u64);
            let mut out = Vec::new();
            for chunk in self.bytes.chunks(self.chunk_size.max(1)) {
                out.extend_from_slice(chunk);
                progress(Progress { loaded: out.len() as u64, total });
            }
            Ok(out)
        }
    }

    /// Receives some bytes, then fails like a dropped connection
    pub(crate) struct FailingSource;
    impl AssetSource for FailingSource {
        async fn fetch(
            &self,
            _path: &str,
            progress: &mut dyn FnMut(Progress),
        ) -> Result<Vec<u8>, LoadError> {
            progress(Progress { loaded: 10, total: Some(100) });
            progress(Progress { loaded: 20, total: Some(100) });
            Err(LoadError::Http { status: 404, text: "Not Found".to_string() })
        }
    }

    /// Assembles a binary glTF holding one triangle
    pub(crate) fn triangle_glb(vertices: [[f32; 3]; 3]) -> Vec<u8> {
        let mut bin: Vec<u8> = vertices.iter()
            .flatten()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for v in vertices.iter() {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }
        let json = format!(
            r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],"nodes":[{{"mesh":0}}],"meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}}}}]}}],"buffers":[{{"byteLength":{len}}}],"bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":{len}}}],"accessors":[{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[{},{},{}],"max":[{},{},{}]}}]}}"#,
            min[0], min[1], min[2], max[0], max[1], max[2],
            len = bin.len(),
        );
        let mut json = json.into_bytes();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2_u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(&json);
        glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"BIN\0");
        glb.extend_from_slice(&bin);
        glb
    }

    const PATH: &str = "models/our-model.glb";

    #[test]
    fn progress_percentage() {
        assert_eq!(Progress { loaded: 50, total: Some(200) }.percent(), Some(25.0));
        assert_eq!(Progress { loaded: 50, total: None }.percent(), None);
        assert_eq!(Progress { loaded: 0, total: Some(0) }.percent(), None);
    }

    #[test]
    fn decodes_a_binary_gltf() {
        let glb = triangle_glb([[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 2.0, 2.0]]);
        let model = decode(PATH, glb).unwrap();
        assert_eq!(model.geometries.len(), 1);
        let bounds = model_bounds(&model);
        assert_eq!(bounds.min(), vec3(0.0, 0.0, 0.0));
        assert_eq!(bounds.max(), vec3(2.0, 2.0, 2.0));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result = decode(PATH, b"definitely not a model".to_vec());
        assert!(matches!(result, Err(LoadError::Decode(_))), "{:?}", result.err());
    }

    #[test]
    fn loaded_model_is_centered() {
        let glb = triangle_glb([[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 2.0, 2.0]]);
        let loader = ModelLoader::new(MemorySource { bytes: glb, chunk_size: 64 });
        let mut reports = Vec::new();
        let asset = pollster::block_on(loader.load(PATH, |p| reports.push(p))).unwrap();

        assert_eq!(asset.bounds.center(), vec3(1.0, 1.0, 1.0));
        let centered = model_bounds(&asset.model);
        assert!(centered.center().magnitude() < 1e-6, "{:?}", centered.center());
        assert_eq!(centered.size(), asset.bounds.size());

        assert!(!reports.is_empty());
        assert!(reports.windows(2).all(|w| w[0].loaded < w[1].loaded));
        let last = reports.last().unwrap();
        assert_eq!(Some(last.loaded), last.total);
    }

    #[test]
    fn failure_is_reported_once_and_ends_progress() {
        let (reporter, mut monitor) = load_channel();
        pollster::block_on(reporter.run(ModelLoader::new(FailingSource), PATH.to_string()));

        let mut reports = Vec::new();
        let outcome = monitor.poll(|p| reports.push(p));
        assert!(matches!(outcome, Some(Err(LoadError::Http { status: 404, .. }))));
        assert_eq!(reports.len(), 2);
        assert!(monitor.is_settled());

        assert!(monitor.poll(|p| reports.push(p)).is_none());
        assert_eq!(reports.len(), 2);
    }

    #[test]
    fn pending_load_yields_nothing() {
        let (_reporter, mut monitor) = load_channel();
        assert!(monitor.poll(|_| panic!("no progress expected")).is_none());
        assert!(!monitor.is_settled());
    }

    #[test]
    fn success_is_reported_once() {
        let glb = triangle_glb([[-1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [0.0, 1.0, 0.0]]);
        let (reporter, mut monitor) = load_channel();
        let loader = ModelLoader::new(MemorySource { bytes: glb, chunk_size: 1000 });
        pollster::block_on(reporter.run(loader, PATH.to_string()));

        let outcome = monitor.poll(|_| {});
        let asset = outcome.unwrap().unwrap();
        assert_eq!(asset.bounds.min(), vec3(-1.0, -1.0, -1.0));
        assert!(monitor.poll(|_| {}).is_none());
    }
}
