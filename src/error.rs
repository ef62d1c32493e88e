use thiserror::Error;
use wasm_bindgen::JsValue;


/// Failure to fetch, decode or upload the model asset.
///
/// The viewer treats every variant the same way (log, show the error
/// overlay, no retry); the variants only carry diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("HTTP {status} {text}")]
    Http { status: u16, text: String },
    #[error("could not decode the model: {0}")]
    Decode(String),
    #[error("could not upload the model to the GPU: {0}")]
    Upload(String),
}

impl LoadError {
    pub(crate) fn from_js(e: JsValue) -> Self {
        LoadError::Fetch(format!("{:?}", e))
    }
}


/// A DOM operation on a status overlay element failed
#[derive(Debug, Clone, PartialEq, Error)]
#[error("overlay `{id}`: {reason}")]
pub struct OverlayError {
    pub id: String,
    pub reason: String,
}


/// Startup of the viewer failed before the render loop could begin
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("no browser window or document available")]
    NoDocument,
    #[error("could not create the render surface: {0}")]
    Surface(String),
    #[error(transparent)]
    Window(#[from] three_d::WindowError),
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_messages() {
        let e = LoadError::Http { status: 404, text: "Not Found".to_string() };
        assert_eq!(e.to_string(), "HTTP 404 Not Found");
        let e = LoadError::Decode("bad magic".to_string());
        assert_eq!(e.to_string(), "could not decode the model: bad magic");
    }
}
