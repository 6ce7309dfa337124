//! Scoped mutation of process-global state with guaranteed restoration.
//!
//! The process environment and working directory are global mutable state.
//! The guards in this module follow a stack discipline: each guard snapshots
//! the prior state when it activates and restores it when dropped, on every
//! exit path (normal return, early return, panic unwind).  Nested guards over
//! the same key or resource must unwind innermost-first, which Rust's drop
//! order provides for free when guards live in lexical scopes.
//!
//! No locking is involved; the guards assume a single-threaded build script
//! and that they are the sole active mutator for what they touch.

pub mod cd;
pub mod env;

pub use cd::{cd, cd_create, Cd};
pub use env::{set_env, unset_env, SetEnv, UnsetEnv};

/// Run a closure inside a scope guard.
///
/// This is the "wrap a callable" usage shape: the guard is held for the
/// duration of `f` and released afterward, including when `f` panics.  It is
/// provided generically for every guard rather than per resource type.
///
/// ```
/// use cairn::scope::{set_env, Scope};
///
/// let greeting = set_env([("CAIRN_DOCTEST_GREETING", "hi")])
///     .unwrap()
///     .around(|| std::env::var("CAIRN_DOCTEST_GREETING").unwrap());
/// assert_eq!(greeting, "hi");
/// assert!(std::env::var("CAIRN_DOCTEST_GREETING").is_err());
/// ```
pub trait Scope: Sized {
    /// Invoke `f`, dropping `self` once it completes or unwinds.
    fn around<R>(self, f: impl FnOnce() -> R) -> R {
        let _guard = self;
        f()
    }
}

impl Scope for Cd {}
impl Scope for SetEnv {}
impl Scope for UnsetEnv {}
