use crate::error::OverlayError;
use crate::settings::OverlaySettings;


pub const LOADING_ID: &str = "loading-message";
pub const ERROR_ID: &str = "error-message";


/// A centered text element to put on top of the render surface
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayElement<'a> {
    pub id: &'a str,
    pub style: &'a str,
    pub html: &'a str,
}


/// The document the overlay elements live in
pub trait OverlayHost {
    /// Returns true if an element with `id` is present
    fn contains(&self, id: &str) -> bool;
    /// Appends a new element
    fn insert(&mut self, element: &OverlayElement) -> Result<(), OverlayError>;
    /// Removes the element with `id`, if any
    fn remove(&mut self, id: &str);
}


/// Overlay elements appended to `document.body`
pub struct DomHost {
    document: web_sys::Document,
}
impl DomHost {
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }
}
impl OverlayHost for DomHost {
    fn contains(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn insert(&mut self, element: &OverlayElement) -> Result<(), OverlayError> {
        let err = |reason: String| OverlayError { id: element.id.to_string(), reason };
        let body = self.document.body().ok_or_else(|| err("no document body".to_string()))?;
        let div = self.document.create_element("div")
            .map_err(|e| err(format!("{:?}", e)))?;
        div.set_id(element.id);
        div.set_attribute("style", element.style)
            .map_err(|e| err(format!("{:?}", e)))?;
        div.set_inner_html(element.html);
        body.append_child(&div)
            .map_err(|e| err(format!("{:?}", e)))?;
        Ok(())
    }

    fn remove(&mut self, id: &str) {
        if let Some(element) = self.document.get_element_by_id(id) {
            element.remove();
        }
    }
}


/// Loading and error messages shown while the model is fetched
pub struct StatusOverlay<H> {
    host: H,
    settings: OverlaySettings,
}
impl<H: OverlayHost> StatusOverlay<H> {
    pub fn new(host: H, settings: OverlaySettings) -> Self {
        Self { host, settings }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Shows the loading message unless it is already shown
    pub fn show_loading(&mut self) -> Result<(), OverlayError> {
        if self.host.contains(LOADING_ID) {
            return Ok(());
        }
        self.host.insert(&OverlayElement {
            id: LOADING_ID,
            style: &self.settings.loading_style,
            html: &self.settings.loading_html,
        })
    }

    /// Removes the loading message; a no-op if it is not shown
    pub fn hide_loading(&mut self) {
        self.host.remove(LOADING_ID);
    }

    /// Shows the error message. It stays until the page is reloaded.
    pub fn show_error(&mut self) -> Result<(), OverlayError> {
        if self.host.contains(ERROR_ID) {
            return Ok(());
        }
        self.host.insert(&OverlayElement {
            id: ERROR_ID,
            style: &self.settings.error_style,
            html: &self.settings.error_html,
        })
    }
}


#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Document stand-in recording the elements in insertion order
    #[derive(Default)]
    pub(crate) struct MemoryHost {
        pub elements: Vec<(String, String)>,
    }
    impl MemoryHost {
        pub fn count(&self, id: &str) -> usize {
            self.elements.iter().filter(|(i, _)| i == id).count()
        }
    }
    impl OverlayHost for MemoryHost {
        fn contains(&self, id: &str) -> bool {
            self.count(id) > 0
        }

        fn insert(&mut self, element: &OverlayElement) -> Result<(), OverlayError> {
            self.elements.push((element.id.to_string(), element.html.to_string()));
            Ok(())
        }

        fn remove(&mut self, id: &str) {
            if let Some(i) = self.elements.iter().position(|(i, _)| i == id) {
                self.elements.remove(i);
            }
        }
    }

    fn overlay() -> StatusOverlay<MemoryHost> {
        StatusOverlay::new(MemoryHost::default(), OverlaySettings::default())
    }

    #[test]
    fn loading_message_show_and_hide() {
        let mut overlay = overlay();
        overlay.show_loading().unwrap();
        overlay.show_loading().unwrap();
        assert_eq!(overlay.host().count(LOADING_ID), 1);
        assert_eq!(overlay.host().elements[0].1, "Loading model...");

        overlay.hide_loading();
        assert!(!overlay.host().contains(LOADING_ID));
        overlay.hide_loading();
        assert!(!overlay.host().contains(LOADING_ID));
        assert!(overlay.host().elements.is_empty());
    }

    #[test]
    fn hide_without_show_is_a_no_op() {
        let mut overlay = overlay();
        overlay.hide_loading();
        assert!(overlay.host().elements.is_empty());
    }

    #[test]
    fn error_message_is_created_once_and_kept() {
        let mut overlay = overlay();
        overlay.show_error().unwrap();
        overlay.show_error().unwrap();
        overlay.hide_loading();
        assert_eq!(overlay.host().count(ERROR_ID), 1);
        assert!(overlay.host().elements[0].1.contains("<br>"));
    }
}
