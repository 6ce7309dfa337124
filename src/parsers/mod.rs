//! Build-system focused argument parsers.

pub mod cmake;
pub mod platform;

pub use cmake::{CMakeArgs, CMakeParser, GeneratorClass};
pub use platform::env_or_platform_default;
