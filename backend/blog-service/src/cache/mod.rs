/// Response caching for blog-service
pub mod page_cache;

pub use page_cache::{CachedPage, PageCache};
