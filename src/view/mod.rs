//! Section View Model
//!
//! Pure derivation from a session snapshot and the reader's selection to a
//! render instruction. No I/O happens here; presenters turn instructions into
//! output and delegate file content to the file renderer.

mod links;
mod navigation;
mod render;
mod section;
mod selection;

pub use links::{FileLink, blob_url, file_name, raw_url};
pub use navigation::{NavChild, NavEntry, sidebar};
pub use render::{ReadmeView, RenderInstruction, derive};
pub use section::Section;
pub use selection::{SelectionAction, SelectionState};
