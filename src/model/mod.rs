//! Page model types for reconstructed OneNote content.
//!
//! This is the structured output of reconstruction: notebooks contain
//! sections, sections contain pages, and pages hold an ordered list of
//! content elements. Renderers consume only these types.

mod notebook;
mod page;
mod resource;
mod rich_text;
mod table;

pub use notebook::{Notebook, Section};
pub use page::{ContentElement, Page, UNTITLED};
pub use resource::{EmbeddedFile, Image, ImageFormat};
pub use rich_text::{ListType, RichText, TextRun, TextStyle};
pub use table::{Table, TableCell, TableRow};
