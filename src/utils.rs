// Console plumbing: panic hook, log macros and a console.time guard.
// Everything here is silent off wasm32 so the simulation can be tested natively.

#[cfg(target_arch = "wasm32")]
use web_sys::console;

pub fn set_panic_hook() {
    // Better error messages when the page is opened with devtools
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

macro_rules! log {
    ( $( $t:tt )* ) => {
        $crate::utils::log_str(&format!( $( $t )* ))
    };
}

macro_rules! warn {
    ( $( $t:tt )* ) => {
        $crate::utils::warn_str(&format!( $( $t )* ))
    };
}

pub fn log_str(message: &str) {
    #[cfg(target_arch = "wasm32")]
    console::log_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

pub fn warn_str(message: &str) {
    #[cfg(target_arch = "wasm32")]
    console::warn_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        #[cfg(target_arch = "wasm32")]
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        #[cfg(target_arch = "wasm32")]
        console::time_end_with_label(self.name);
        #[cfg(not(target_arch = "wasm32"))]
        let _ = self.name;
    }
}
