// Display-refresh scheduling. The field only ever asks for "one more frame"
// and cancels the outstanding one; who calls `tick` back is up to the
// implementation.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

pub type FrameHandle = i32;

pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, String>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Slot for the animation-frame callback. It is filled after the field that
/// the callback drives has been created.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct AnimationFrameScheduler {
    window: Window,
    callback: FrameCallback,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window) -> Self {
        AnimationFrameScheduler {
            window,
            callback: Rc::new(RefCell::new(None)),
        }
    }

    pub fn callback_slot(&self) -> FrameCallback {
        self.callback.clone()
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, String> {
        let callback = self.callback.borrow();
        let callback = callback
            .as_ref()
            .ok_or_else(|| String::from("animation frame callback not installed"))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|err| format!("requestAnimationFrame failed: {:?}", err))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle);
    }
}

/// Scheduler driven by hand: requests pile up until the caller drains them.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_handle: FrameHandle,
    pending: Vec<FrameHandle>,
    requested: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        ManualScheduler::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Total number of `request_frame` calls so far.
    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Removes and returns every outstanding request, as the browser would
    /// when it fires the callbacks for the next refresh.
    pub fn drain(&mut self) -> Vec<FrameHandle> {
        std::mem::replace(&mut self.pending, Vec::new())
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, String> {
        self.next_handle += 1;
        self.requested += 1;
        self.pending.push(self.next_handle);
        Ok(self.next_handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|&h| h != handle);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}
