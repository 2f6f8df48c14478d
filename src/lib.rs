//! brainview - Interactive viewer core for neuroanatomical data
//!
//! The state-machine heart of a surface/volume/contour viewer: mouse-mode
//! dispatch, per-window view transforms with yoking, typed picking and
//! identification report assembly. Rendering, dialogs and file I/O live in
//! the embedding application behind the traits in [`renderer`] and
//! [`collab`].

pub mod collab;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod ident;
pub mod linear;
pub mod mode;
pub mod model;
pub mod pick;
pub mod renderer;
pub mod selection;
pub mod transform;
pub mod view_state;
pub mod window;

mod yoke;

pub use collab::Collaborators;
pub use config::ViewerConfig;
pub use controller::ViewController;
pub use error::{Result, ViewerError};
pub use mode::MouseMode;
pub use renderer::Renderer;
pub use window::{SharedBrainSet, Window, WindowId};
