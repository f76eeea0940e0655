pub mod output;
pub mod presenter;

pub use output::Output;
pub use presenter::{ContentKind, Presenter};
