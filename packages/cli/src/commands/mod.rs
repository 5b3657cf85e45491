pub mod build;
pub mod init;
pub mod render;

pub use build::{build, BuildArgs};
pub use init::{init, InitArgs};
pub use render::{render, RenderArgs};
