//! File storage adapters for uploaded record content.
//!
//! Three implementations of the `FileStore` port live here: a sandboxed
//! local-disk store, an HTTP cloud-drive client, and a composite that
//! prefers the drive and degrades to local disk when the drive fails.

mod drive_client;
mod fallback;
mod local_store;

pub use drive_client::DriveFileStore;
pub use fallback::FallbackFileStore;
pub use local_store::LocalFileStore;
