use std::future::Future;


/// Writes a formatted line to the browser console (stdout on native builds)
#[macro_export]
macro_rules! log {
    ( $( $t:tt )* ) => {
        $crate::utils::console_log(&format!( $( $t )* ))
    }
}


/// Writes a formatted line to the browser console's error channel (stderr on native builds)
#[macro_export]
macro_rules! error {
    ( $( $t:tt )* ) => {
        $crate::utils::console_error(&format!( $( $t )* ))
    }
}


#[doc(hidden)]
#[inline(always)]
pub fn console_log(s: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&s.into());
    #[cfg(not(target_arch = "wasm32"))]
    println!("{}", s);
}


#[doc(hidden)]
#[inline(always)]
pub fn console_error(s: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&s.into());
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{}", s);
}


/// Enable better error messages if our code ever panics
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}


/// Executes an async Future on the current thread
#[inline(always)]
pub fn execute_future<F: Future<Output = ()> + 'static>(f: F) {
    wasm_bindgen_futures::spawn_local(f);
}
