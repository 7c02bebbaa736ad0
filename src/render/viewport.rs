//! Viewport size tracking with explicit resize observers
//!
//! Sessions need to re-derive their screen layout when the window resizes.
//! Rather than callback registration, the viewport keeps an explicit
//! observer registry: subscribers get a handle, poll `take_resized` when
//! convenient, and unsubscribe on teardown. A fresh subscription starts
//! marked, so the subscriber's first poll triggers its initial layout.

/// Subscription handle. Not Copy: surrender it to unsubscribe.
#[derive(Debug, PartialEq, Eq)]
pub struct ResizeHandle(u32);

struct Observer {
    id: u32,
    pending: bool,
}

/// Current window size plus the observer registry.
pub struct Viewport {
    width: f32,
    height: f32,
    observers: Vec<Observer>,
    next_id: u32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Register an observer. Starts pending so the first `take_resized`
    /// returns true and the subscriber lays itself out.
    pub fn subscribe(&mut self) -> ResizeHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.observers.push(Observer { id, pending: true });
        ResizeHandle(id)
    }

    pub fn unsubscribe(&mut self, handle: ResizeHandle) {
        self.observers.retain(|o| o.id != handle.0);
    }

    /// Feed the current window size. Marks every observer on change.
    pub fn poll(&mut self, width: f32, height: f32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        for observer in &mut self.observers {
            observer.pending = true;
        }
    }

    /// Consume this observer's pending resize notification.
    pub fn take_resized(&mut self, handle: &ResizeHandle) -> bool {
        for observer in &mut self.observers {
            if observer.id == handle.0 {
                return std::mem::take(&mut observer.pending);
            }
        }
        false
    }
}
