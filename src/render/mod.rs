//! Rendering module for converting sections to output formats.

mod json;
mod markdown;
mod options;
mod text;

pub use json::{to_json, JsonFormat};
pub use markdown::{page_to_markdown, to_markdown, MarkdownRenderer};
pub use options::{PageSelection, RenderOptions};
pub use text::to_text;
