pub mod config;
pub mod entry;
pub mod menu;

pub use config::*;
pub use entry::*;
pub use menu::*;
