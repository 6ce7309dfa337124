//! Cairn - build-script helpers for CI.
//!
//! Cairn wraps the platform primitives a CI build script keeps reaching for:
//! scoped environment and working-directory mutation with guaranteed
//! restoration, CI provider detection, synchronous fail-loud subprocess
//! execution, and a CMake focused argument parser that derives configure and
//! build argument lists from a handful of common flags.
//!
//! # Modules
//!
//! - [`colorize`] - Terminal styling and stage banners
//! - [`error`] - Error types and result aliases
//! - [`exec`] - Fatal exits, `PATH` lookup, subprocess execution
//! - [`fs`] - `mkdir_p` / `rm_rf` convenience wrappers
//! - [`parsers`] - CMake argument derivation and platform defaults
//! - [`provider`] - CI provider detection
//! - [`scope`] - Scoped env / cwd mutation with restoration on drop
//!
//! # Example
//!
//! ```
//! use cairn::parsers::cmake::CMakeParser;
//!
//! let parser = CMakeParser::new("ci-build");
//! let args = parser
//!     .try_parse_from(["ci-build", "--build-type", "Debug"])
//!     .unwrap();
//! assert_eq!(args.cmake_configure_args[..2], ["-G", "Ninja"]);
//! assert!(args
//!     .cmake_configure_args
//!     .contains(&"-DCMAKE_BUILD_TYPE=Debug".to_string()));
//! assert!(args.cmake_build_args.is_empty());
//! ```

pub mod colorize;
pub mod error;
pub mod exec;
pub mod fs;
pub mod parsers;
pub mod provider;
pub mod scope;

pub use error::{CairnError, Result};
pub use exec::{fail, which, which_or_fail, Executable};
pub use fs::{mkdir_p, rm_rf};
pub use parsers::cmake::CMakeParser;
pub use provider::Provider;
pub use scope::{cd, cd_create, set_env, unset_env, Scope};

/// Serialize tests that touch the process environment or working directory.
///
/// Poisoning is ignored: a panicking test already reports its own failure.
#[cfg(test)]
pub(crate) fn test_env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
