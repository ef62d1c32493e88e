use wasm_bindgen::prelude::*;

mod utils;
pub mod error;
pub mod settings;
pub mod framing;
pub mod controls;
pub mod viewport;
pub mod scene;
pub mod status;
pub mod loader;
pub mod renderer;

use renderer::RenderLoopHandle;
use settings::ViewerSettings;


#[wasm_bindgen(start)]
pub fn dummy_main() {
}


/// Starts the viewer and keeps rendering for the lifetime of the page
#[wasm_bindgen]
pub async fn run() -> Result<(), JsValue> {
    utils::set_panic_hook();
    renderer::main(ViewerSettings::default(), RenderLoopHandle::new())
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}


/// A viewer whose render loop can be stopped by the host page
#[wasm_bindgen]
pub struct Viewer {
    handle: RenderLoopHandle,
}
#[wasm_bindgen]
impl Viewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        utils::set_panic_hook();
        Self { handle: RenderLoopHandle::new() }
    }

    /// Starts the viewer; the promise rejects if startup fails
    pub fn start(&self) -> js_sys::Promise {
        let handle = self.handle.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            renderer::main(ViewerSettings::default(), handle)
                .await
                .map(|_| JsValue::UNDEFINED)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        })
    }

    /// Stops the render loop at the next frame
    pub fn stop(&self) {
        self.handle.cancel();
    }
}
impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}
