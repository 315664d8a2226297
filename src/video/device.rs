use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::backends::headless::{HeadlessStats, HeadlessVisitor};
use super::backends::{self, Visitor};
use super::probe;
use crate::errors::*;

/// The categories of driver objects that have exactly one active binding at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    VertexArray,
    ArrayBuffer,
    ElementBuffer,
    Program,
}

/// The objects that are known to be bound right now, per category. `None` means
/// nothing is bound, or that the binding is unknown after a vertex array switch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub vertex_array: Option<u32>,
    pub array_buffer: Option<u32>,
    pub element_buffer: Option<u32>,
    pub program: Option<u32>,
}

impl Bindings {
    pub fn get(&self, slot: Slot) -> Option<u32> {
        match slot {
            Slot::VertexArray => self.vertex_array,
            Slot::ArrayBuffer => self.array_buffer,
            Slot::ElementBuffer => self.element_buffer,
            Slot::Program => self.program,
        }
    }

    fn set(&mut self, slot: Slot, id: Option<u32>) {
        match slot {
            Slot::VertexArray => {
                // The element buffer binding is part of the vertex array state.
                if self.vertex_array != id {
                    self.element_buffer = None;
                }

                self.vertex_array = id;
            }
            Slot::ArrayBuffer => self.array_buffer = id,
            Slot::ElementBuffer => self.element_buffer = id,
            Slot::Program => self.program = id,
        }
    }
}

/// Owns the driver backend of one context, and the binding state of it.
///
/// Resources share the device through `Rc`, which keeps the device alive until
/// the last handle has been released and pins everything to the context thread.
pub struct Device {
    visitor: RefCell<Box<dyn Visitor>>,
    bindings: Cell<Bindings>,
}

impl Device {
    pub fn new(visitor: Box<dyn Visitor>) -> Rc<Self> {
        let version = unsafe { visitor.version() };
        info!("Creates video device with driver {}.", version);

        Rc::new(Device {
            visitor: RefCell::new(visitor),
            bindings: Cell::new(Bindings::default()),
        })
    }

    /// Creates a device with the OpenGL backend.
    ///
    /// # Safety
    ///
    /// The GL symbols must have been loaded and a context must be current on the
    /// calling thread, e.g. by creating a `Window` first.
    pub unsafe fn gl() -> Result<Rc<Self>> {
        Ok(Self::new(backends::new()?))
    }

    /// Creates a device which simulates the driver in memory.
    pub fn headless() -> Rc<Self> {
        Self::new(backends::new_headless())
    }

    /// Creates a device which simulates the driver in memory, with an inspector of
    /// the simulated state.
    pub fn headless_with_stats() -> (Rc<Self>, HeadlessStats) {
        let visitor = HeadlessVisitor::new();
        let stats = visitor.stats();
        (Self::new(Box::new(visitor)), stats)
    }

    /// Returns a description of the driver version.
    pub fn version(&self) -> String {
        unsafe { self.visitor.borrow().version() }
    }

    /// Returns the objects that are known to be bound.
    #[inline]
    pub fn bindings(&self) -> Bindings {
        self.bindings.get()
    }

    /// Performs `f` against the driver, reporting any error it raised with the
    /// `operation` and its location. See `probe!`.
    pub fn call<T, F>(
        &self,
        operation: &'static str,
        file: &'static str,
        line: u32,
        f: F,
    ) -> Result<T>
    where
        F: FnOnce(&mut dyn Visitor) -> T,
    {
        let mut visitor = self.visitor.borrow_mut();
        probe::wrap(&mut **visitor, operation, file, line, f)
    }

    /// Records that `id` is now bound to `slot`. An id of 0 unbinds.
    pub(crate) fn record(&self, slot: Slot, id: u32) {
        let mut bindings = self.bindings.get();
        bindings.set(slot, if id == 0 { None } else { Some(id) });
        self.bindings.set(bindings);
    }

    /// Forgets `id` in `slot` after the object was deleted. The driver unbinds
    /// deleted objects of the current context by itself.
    pub(crate) fn forget(&self, slot: Slot, id: u32) {
        let mut bindings = self.bindings.get();
        if bindings.get(slot) == Some(id) {
            bindings.set(slot, None);
            self.bindings.set(bindings);
        }
    }
}
