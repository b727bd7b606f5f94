pub mod cli;
pub mod composer;
pub mod io;
pub mod model;
pub mod tui;
pub mod util;
