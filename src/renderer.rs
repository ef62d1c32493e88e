use std::sync::{Arc, atomic::{AtomicBool, Ordering}};

use three_d::*;
use three_d_asset::AxisAlignedBoundingBox;
use wasm_bindgen::JsCast;

use crate::{log, error}; // macro import
use crate::error::{LoadError, ViewerError};
use crate::loader::{load_channel, HttpSource, ModelLoader, Progress};
use crate::scene::{Lighting, Scene};
use crate::settings::ViewerSettings;
use crate::status::{DomHost, OverlayHost, StatusOverlay};
use crate::utils::execute_future;
use crate::viewport::ViewportState;


/// Cancellation token of a render loop.
/// The loop exits on the first frame after [RenderLoopHandle::cancel] was called.
#[derive(Clone, Default)]
pub struct RenderLoopHandle {
    cancelled: Arc<AtomicBool>,
}
impl RenderLoopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}


/// Output of a frame; requests exit once the loop has been cancelled
fn frame_output(handle: &RenderLoopHandle) -> FrameOutput {
    FrameOutput {
        exit: handle.is_cancelled(),
        ..Default::default()
    }
}


fn log_progress(p: Progress) {
    match p.percent() {
        Some(pct) => log!("{:.1}% loaded", pct),
        None => log!("{} bytes loaded", p.loaded),
    }
}


/// Applies the terminal outcome of the model load.
/// On success the node is attached to the scene and framed, on failure the error message is shown;
/// the loading message is removed either way. Returns true on success.
pub(crate) fn settle<N, H: OverlayHost>(
    outcome: Result<(N, AxisAlignedBoundingBox), LoadError>,
    scene: &mut Scene<N>,
    viewport: &mut ViewportState,
    overlay: &mut StatusOverlay<H>,
) -> bool {
    match outcome {
        Ok((node, bounds)) => {
            scene.add(node);
            viewport.frame(&bounds);
            overlay.hide_loading();
            true
        }
        Err(e) => {
            error!("settle(): an error happened while loading the model: {}", e);
            if let Err(e) = overlay.show_error() {
                error!("settle(): {}", e);
            }
            overlay.hide_loading();
            false
        }
    }
}


/// Creates the render surface and appends it to the document body
fn create_canvas() -> Result<web_sys::HtmlCanvasElement, ViewerError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(ViewerError::NoDocument)?;
    let body = document.body().ok_or(ViewerError::NoDocument)?;
    let canvas = document.create_element("canvas")
        .map_err(|e| ViewerError::Surface(format!("{:?}", e)))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|e| ViewerError::Surface(format!("{:?}", e)))?;
    body.append_child(&canvas)
        .map_err(|e| ViewerError::Surface(format!("{:?}", e)))?;
    Ok(canvas)
}


/// Shows the loading message, sets up the surface, camera and lights, starts loading
/// the model and runs the render loop until `handle` is cancelled
pub async fn main(settings: ViewerSettings, handle: RenderLoopHandle) -> Result<(), ViewerError> {
    let host = DomHost::new().ok_or(ViewerError::NoDocument)?;
    let mut overlay = StatusOverlay::new(host, settings.overlay.clone());
    if let Err(e) = overlay.show_loading() {
        error!("main(): {}", e);
    }

    let canvas = create_canvas()?;
    #[cfg(not(target_arch = "wasm32"))]
    let _ = canvas;
    let window = Window::new(WindowSettings {
        title: settings.title.clone(),
        #[cfg(target_arch = "wasm32")]
        canvas: Some(canvas),
        ..Default::default()
    })?;

    let context = window.gl();
    log!("main(): OpenGL version: {:?}", context.version());

    let mut viewport = ViewportState::new(window.viewport(), &settings.camera, &settings.controls);
    log!(
        "main(): surface size: {:?}, aspect: {}",
        viewport.surface_size(),
        viewport.aspect()
    );
    let lighting = Lighting::new(&context, &settings.lights);
    let mut scene = Scene::<Model<PhysicalMaterial>>::new();

    let (reporter, mut monitor) = load_channel();
    log!("main(): loading {}", settings.asset_path);
    execute_future(reporter.run(ModelLoader::new(HttpSource), settings.asset_path.clone()));

    let [r, g, b, a] = settings.clear_color;
    window.render_loop(move |mut frame_input| {
        if handle.is_cancelled() {
            log!("main(): render loop cancelled");
            return frame_output(&handle);
        }

        if viewport.on_resize(frame_input.viewport) {
            log!("main(): surface resized to {:?}", viewport.surface_size());
        }

        if let Some(outcome) = monitor.poll(log_progress) {
            let outcome = outcome.and_then(|asset| {
                Model::<PhysicalMaterial>::new(&context, &asset.model)
                    .map(|model| (model, asset.bounds))
                    .map_err(|e| LoadError::Upload(format!("{:?}", e)))
            });
            if settle(outcome, &mut scene, &mut viewport, &mut overlay) {
                log!("main(): model attached to the scene");
            }
        }

        viewport.update_controls(&mut frame_input.events);

        let screen = frame_input.screen();
        screen.clear(ClearState::color_and_depth(r, g, b, a, 1.0));
        scene.render(&screen, viewport.camera(), &lighting);

        frame_output(&handle)
    });

    Ok(())
}
