pub mod cli;
pub mod host;
pub mod i18n;
pub mod io;
pub mod model;
pub mod module;
pub mod ops;
pub mod tui;
