// Page-count estimation for the editor's page badge.
// Pure over the document; no template or visibility input.

pub mod pagination;

pub use pagination::{estimate_pages, pagination_report, PaginationReport};
