mod block;
mod context;
mod inline;
mod widget;
mod wrap;

pub use widget::{MarkdownError, MarkdownWidget};
