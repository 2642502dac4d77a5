// Cache module for fetched CMS collections.
// Holds each collection in memory for the lifetime of a cache scope.

pub mod catalog;
pub mod collection;

pub use catalog::Catalog;
pub use collection::CollectionCache;
