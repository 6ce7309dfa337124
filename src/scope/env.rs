//! Scoped environment variable mutation.
//!
//! [`SetEnv`] assigns variables for the lifetime of the guard; [`UnsetEnv`]
//! removes them.  Both snapshot the prior state at activation and restore it
//! exactly on drop: variables that existed before get their old value back,
//! variables that did not are absent again afterward.

use std::ffi::OsString;

use crate::error::{CairnError, Result};

/// Guard that sets environment variables and restores them on drop.
///
/// After activation every touched name is recorded in exactly one place:
/// `restore` when it had a prior value, `to_delete` when it did not.
#[derive(Debug)]
pub struct SetEnv {
    restore: Vec<(String, OsString)>,
    to_delete: Vec<String>,
}

/// Set one or more environment variables for the lifetime of the guard.
///
/// Returns a `Config` error when `vars` is empty.
///
/// ```
/// use cairn::scope::set_env;
///
/// {
///     let _env = set_env([("CAIRN_EXAMPLE_MODE", "release")]).unwrap();
///     assert_eq!(std::env::var("CAIRN_EXAMPLE_MODE").unwrap(), "release");
/// }
/// assert!(std::env::var("CAIRN_EXAMPLE_MODE").is_err());
/// ```
pub fn set_env<I, K, V>(vars: I) -> Result<SetEnv>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    SetEnv::new(vars)
}

impl SetEnv {
    /// Activate the guard: snapshot then assign each pair in order.
    pub fn new<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs: Vec<(String, String)> = vars
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        if pairs.is_empty() {
            return Err(CairnError::config(
                "set_env: at least one NAME=VALUE pair is required.",
            ));
        }

        let mut restore: Vec<(String, OsString)> = Vec::new();
        let mut to_delete: Vec<String> = Vec::new();
        for (name, value) in pairs {
            // Only the first occurrence of a name snapshots; a later
            // duplicate would capture a value this guard itself wrote.
            // The last value still wins for the lifetime of the guard.
            let seen = restore.iter().any(|(n, _)| n == &name) || to_delete.contains(&name);
            if !seen {
                match std::env::var_os(&name) {
                    Some(prior) => restore.push((name.clone(), prior)),
                    None => to_delete.push(name.clone()),
                }
            }
            tracing::debug!(name = %name, "set_env: assigning");
            std::env::set_var(&name, &value);
        }
        Ok(Self { restore, to_delete })
    }
}

impl Drop for SetEnv {
    fn drop(&mut self) {
        for (name, prior) in &self.restore {
            tracing::debug!(name = %name, "set_env: restoring prior value");
            std::env::set_var(name, prior);
        }
        for name in &self.to_delete {
            // An inner scope over the same name may already have removed it;
            // remove_var tolerates that.
            tracing::debug!(name = %name, "set_env: deleting");
            std::env::remove_var(name);
        }
    }
}

/// Guard that removes environment variables and restores them on drop.
///
/// Names that were not present at activation are silently skipped; there is
/// nothing to restore for them.
#[derive(Debug)]
pub struct UnsetEnv {
    restore: Vec<(String, OsString)>,
}

/// Remove one or more environment variables for the lifetime of the guard.
///
/// Returns a `Config` error when `names` is empty.
pub fn unset_env<I, S>(names: I) -> Result<UnsetEnv>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    UnsetEnv::new(names)
}

impl UnsetEnv {
    /// Activate the guard: record and remove each name currently present.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(CairnError::config(
                "unset_env: at least one variable name is required.",
            ));
        }

        let mut restore = Vec::new();
        for name in names {
            if let Some(prior) = std::env::var_os(&name) {
                tracing::debug!(name = %name, "unset_env: removing");
                restore.push((name.clone(), prior));
                std::env::remove_var(&name);
            }
        }
        Ok(Self { restore })
    }
}

impl Drop for UnsetEnv {
    fn drop(&mut self) {
        for (name, prior) in &self.restore {
            tracing::debug!(name = %name, "unset_env: restoring prior value");
            std::env::set_var(name, prior);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_env_lock;

    #[test]
    fn set_env_requires_pairs() {
        let err = SetEnv::new(Vec::<(String, String)>::new()).unwrap_err();
        assert!(matches!(err, CairnError::Config { .. }));
    }

    #[test]
    fn unset_env_requires_names() {
        let err = UnsetEnv::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, CairnError::Config { .. }));
    }

    #[test]
    fn set_env_round_trips_new_and_existing() {
        let _lock = test_env_lock();
        std::env::set_var("CAIRN_TEST_EXISTING", "before");
        std::env::remove_var("CAIRN_TEST_FRESH");

        {
            let _env = set_env([
                ("CAIRN_TEST_EXISTING", "during"),
                ("CAIRN_TEST_FRESH", "during"),
            ])
            .unwrap();
            assert_eq!(std::env::var("CAIRN_TEST_EXISTING").unwrap(), "during");
            assert_eq!(std::env::var("CAIRN_TEST_FRESH").unwrap(), "during");
        }

        assert_eq!(std::env::var("CAIRN_TEST_EXISTING").unwrap(), "before");
        assert!(std::env::var("CAIRN_TEST_FRESH").is_err());
        std::env::remove_var("CAIRN_TEST_EXISTING");
    }

    #[test]
    fn set_env_nested_same_key_unwinds_lifo() {
        let _lock = test_env_lock();
        std::env::remove_var("CAIRN_TEST_NESTED");

        {
            let _outer = set_env([("CAIRN_TEST_NESTED", "outer")]).unwrap();
            {
                let _inner = set_env([("CAIRN_TEST_NESTED", "inner")]).unwrap();
                assert_eq!(std::env::var("CAIRN_TEST_NESTED").unwrap(), "inner");
            }
            assert_eq!(std::env::var("CAIRN_TEST_NESTED").unwrap(), "outer");
        }
        assert!(std::env::var("CAIRN_TEST_NESTED").is_err());
    }

    #[test]
    fn set_env_duplicate_names_snapshot_once_last_value_wins() {
        let _lock = test_env_lock();
        std::env::set_var("CAIRN_TEST_DUP", "prior");

        {
            let _env = set_env([("CAIRN_TEST_DUP", "first"), ("CAIRN_TEST_DUP", "last")]).unwrap();
            assert_eq!(std::env::var("CAIRN_TEST_DUP").unwrap(), "last");
        }

        // The true prior value comes back, not an intermediate assignment.
        assert_eq!(std::env::var("CAIRN_TEST_DUP").unwrap(), "prior");
        std::env::remove_var("CAIRN_TEST_DUP");

        {
            let _env = set_env([("CAIRN_TEST_DUP", "first"), ("CAIRN_TEST_DUP", "last")]).unwrap();
            assert_eq!(std::env::var("CAIRN_TEST_DUP").unwrap(), "last");
        }
        assert!(std::env::var("CAIRN_TEST_DUP").is_err());
    }

    #[test]
    fn unset_env_skips_absent_and_restores_present() {
        let _lock = test_env_lock();
        std::env::set_var("CAIRN_TEST_PRESENT", "kept");
        std::env::remove_var("CAIRN_TEST_ABSENT");

        {
            let _env = unset_env(["CAIRN_TEST_PRESENT", "CAIRN_TEST_ABSENT"]).unwrap();
            assert!(std::env::var("CAIRN_TEST_PRESENT").is_err());
            assert!(std::env::var("CAIRN_TEST_ABSENT").is_err());
        }

        assert_eq!(std::env::var("CAIRN_TEST_PRESENT").unwrap(), "kept");
        assert!(std::env::var("CAIRN_TEST_ABSENT").is_err());
        std::env::remove_var("CAIRN_TEST_PRESENT");
    }

    #[test]
    fn set_env_restores_when_inner_scope_deleted_the_key() {
        let _lock = test_env_lock();
        std::env::remove_var("CAIRN_TEST_DELETED");

        {
            let _outer = set_env([("CAIRN_TEST_DELETED", "outer")]).unwrap();
            {
                let _inner = unset_env(["CAIRN_TEST_DELETED"]).unwrap();
                assert!(std::env::var("CAIRN_TEST_DELETED").is_err());
            }
            assert_eq!(std::env::var("CAIRN_TEST_DELETED").unwrap(), "outer");
        }
        assert!(std::env::var("CAIRN_TEST_DELETED").is_err());
    }
}
