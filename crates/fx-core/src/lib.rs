pub mod color;
pub mod config;
pub mod constants;
pub mod dotfield;
pub mod error;
pub mod reveal;
pub mod shading;

pub static DOTS_WGSL: &str = include_str!("../shaders/dots.wgsl");
pub static REVEAL_WGSL: &str = include_str!("../shaders/reveal.wgsl");

pub use color::*;
pub use config::*;
pub use dotfield::*;
pub use error::{FxError, FxResult};
pub use reveal::*;
