pub mod config_io;
pub mod database;
pub mod lock;
pub mod metadata;
pub mod xattr;

pub use database::DatabaseStore;
pub use metadata::{ANNOTATION_ATTRIBUTE, MemoryStore, MetadataError, MetadataStore};
pub use xattr::XattrStore;
