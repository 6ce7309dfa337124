//! Detection of continuous-integration providers.
//!
//! Each provider is a pure predicate over the process environment, testing
//! the variables that vendor documents it will set.  The predicates live in
//! one static table so the aggregate check and test tooling can iterate them;
//! adding a vendor means adding one predicate and one table row, nothing else
//! changes.

use std::env;

/// A vendor detection predicate.
pub type ProviderFn = fn() -> bool;

/// Ordered table of every known vendor predicate.  Keep alphabetical.
const PROVIDERS: &[(&str, ProviderFn)] = &[
    ("appveyor", Provider::is_appveyor),
    ("azure_pipelines", Provider::is_azure_pipelines),
    ("circle_ci", Provider::is_circle_ci),
    ("github_actions", Provider::is_github_actions),
    ("jenkins", Provider::is_jenkins),
    ("travis", Provider::is_travis),
];

fn env_is_true(name: &str) -> bool {
    env::var(name)
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn env_is_set(name: &str) -> bool {
    env::var_os(name).is_some()
}

/// Checks for whether code is executing on a CI service.
///
/// ```no_run
/// use cairn::provider::Provider;
/// use cairn::exec::which_or_fail;
///
/// let ninja = which_or_fail("ninja");
/// if Provider::is_travis() {
///     // Constrain link parallelism, Travis workers are memory starved.
///     ninja.run_or_fail(["-j", "2", "install"]);
/// } else {
///     ninja.run_or_fail(["install"]);
/// }
/// ```
pub struct Provider;

impl Provider {
    /// The full `(name, predicate)` table, in registration order.
    pub fn all() -> &'static [(&'static str, ProviderFn)] {
        PROVIDERS
    }

    /// Whether code is executing on any CI service.
    ///
    /// True when `CI` is `"true"` (case-insensitive), when
    /// `CONTINUOUS_INTEGRATION` is exactly `"true"`, or when any vendor
    /// predicate in the table reports true.
    ///
    /// The exact-case `CONTINUOUS_INTEGRATION` comparison is deliberate;
    /// only `CI` gets the case-insensitive treatment.
    pub fn is_ci() -> bool {
        env_is_true("CI")
            || env::var("CONTINUOUS_INTEGRATION")
                .map(|value| value == "true")
                .unwrap_or(false)
            || PROVIDERS.iter().any(|(_, predicate)| predicate())
    }

    /// Whether code is executing on AppVeyor: `APPVEYOR` is `"true"`
    /// (case-insensitive).
    pub fn is_appveyor() -> bool {
        env_is_true("APPVEYOR")
    }

    /// Whether code is executing on Azure Pipelines: `AZURE_HTTP_USER_AGENT`,
    /// `AGENT_NAME`, and `BUILD_REASON` are all present (values ignored).
    ///
    /// The signature is conjunctive: none of the three variables alone is
    /// unique to Azure Pipelines.
    pub fn is_azure_pipelines() -> bool {
        env_is_set("AZURE_HTTP_USER_AGENT")
            && env_is_set("AGENT_NAME")
            && env_is_set("BUILD_REASON")
    }

    /// Whether code is executing on CircleCI: `CIRCLECI` is `"true"`
    /// (case-insensitive).
    pub fn is_circle_ci() -> bool {
        env_is_true("CIRCLECI")
    }

    /// Whether code is executing on GitHub Actions: `GITHUB_ACTIONS` is
    /// `"true"` (case-insensitive).
    pub fn is_github_actions() -> bool {
        env_is_true("GITHUB_ACTIONS")
    }

    /// Whether code is executing on Jenkins: `JENKINS_URL` and
    /// `BUILD_NUMBER` are both present (values ignored).
    pub fn is_jenkins() -> bool {
        env_is_set("JENKINS_URL") && env_is_set("BUILD_NUMBER")
    }

    /// Whether code is executing on Travis: `TRAVIS` is `"true"`
    /// (case-insensitive).
    pub fn is_travis() -> bool {
        env_is_true("TRAVIS")
    }
}
