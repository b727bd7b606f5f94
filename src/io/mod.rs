pub mod attachment_io;
pub mod config_io;
pub mod preview;
