//! Data carried through a capture cycle: the triggering tab event, the page
//! snapshot returned by the extractor, and the row written to the sheet.

mod events;
mod page;
mod row;

pub use events::{ScrapeRequest, TabEvent, TabStatus};
pub use page::{truncate_chars, CapturedPage};
pub use row::{SheetRow, HEADER_ROW};
