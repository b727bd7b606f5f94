pub mod activity;
pub mod attachment;
pub mod comment;
pub mod config;
pub mod document;
pub mod member;
pub mod seed;
pub mod task;

pub use activity::*;
pub use attachment::*;
pub use comment::*;
pub use config::*;
pub use document::*;
pub use member::*;
pub use task::*;
