//! Viewing windows.
//!
//! There is exactly one Main window and a small fixed number of auxiliary
//! windows. Only the Main window accepts non-view mouse modes; auxiliary
//! windows can be yoked so their surface view state is slaved to Main's.

use std::cell::RefCell;
use std::rc::Rc;

use crate::linear::LinearObjectBuffer;
use crate::model::BrainSet;

/// Total number of viewing windows (Main plus auxiliaries).
pub const NUM_VIEWING_WINDOWS: usize = 6;

/// Identifier of a viewing window; index 0 is Main.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub usize);

impl WindowId {
    /// The Main window.
    pub const MAIN: WindowId = WindowId(0);

    /// Raw index.
    pub fn index(self) -> usize {
        self.0
    }

    /// Whether this is the Main window.
    pub fn is_main(self) -> bool {
        self.0 == 0
    }

    /// All window ids.
    pub fn all() -> impl Iterator<Item = WindowId> {
        (0..NUM_VIEWING_WINDOWS).map(WindowId)
    }
}

/// Shared handle to a brain set; windows may share one set or carry their
/// own, and the set outlives every window referencing it.
pub type SharedBrainSet = Rc<RefCell<BrainSet>>;

/// One viewing window.
#[derive(Debug)]
pub struct Window {
    /// The brain set displayed in this window.
    pub brain_set: SharedBrainSet,
    /// Index of the displayed model within the brain set. May be out of
    /// range, in which case nothing is displayed.
    pub model_index: usize,
    /// Whether this window's view is slaved to Main (ignored for Main).
    pub yoked: bool,
    /// Viewport size in pixels.
    pub viewport: (u32, u32),
    /// The in-progress drawn line for this window.
    pub linear_buffer: LinearObjectBuffer,
}

impl Window {
    /// A window showing `brain_set`, defaulting to model 0.
    pub fn new(brain_set: SharedBrainSet) -> Self {
        Self {
            brain_set,
            model_index: 0,
            yoked: false,
            viewport: (512, 512),
            linear_buffer: LinearObjectBuffer::default(),
        }
    }
}
