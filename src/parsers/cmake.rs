//! A CMake focused argument parser.
//!
//! [`CMakeParser`] folds the flags most CMake projects need into two derived
//! lists, `cmake_configure_args` and `cmake_build_args`, handling the
//! single-config vs multi-config generator split for the caller:
//!
//! - Single-config generators configure with `-DCMAKE_BUILD_TYPE=<type>`.
//! - Multi-config generators build with `--config <type>`.
//!
//! Expected workflow:
//!
//! ```no_run
//! use cairn::parsers::cmake::CMakeParser;
//! use cairn::exec::which_or_fail;
//! use cairn::scope::cd_create;
//!
//! let args = CMakeParser::new("ci-build").parse();
//! let cmake = which_or_fail("cmake");
//! {
//!     let _build_dir = cd_create("build");
//!     let mut configure = vec!["..".to_string()];
//!     configure.extend(args.cmake_configure_args.clone());
//!     cmake.run_or_fail(configure);
//!     let mut build = vec!["--build".to_string(), ".".to_string()];
//!     build.extend(args.cmake_build_args.clone());
//!     cmake.run_or_fail(build);
//! }
//! ```
//!
//! The parser distinguishes *registered* options (the fixed set added at
//! construction, used to derive the two lists) from *unregistered* arguments
//! the caller adds for its own needs.  Registered options can be removed or
//! have selected attributes changed before the one-shot parse.

use std::ffi::OsString;

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};

use crate::error::{CairnError, Result};
use crate::exec::fail;
use crate::parsers::platform::env_or_platform_default;

/// The CMake Makefile generators.
pub const MAKEFILE_GENERATORS: &[&str] = &[
    "Borland Makefiles",
    "MSYS Makefiles",
    "MinGW Makefiles",
    "NMake Makefiles",
    "NMake Makefiles JOM",
    "Unix Makefiles",
    "Watcom WMake",
];

/// The Ninja generator.
pub const NINJA_GENERATOR: &[&str] = &["Ninja"];

/// The Ninja Multi-Config generator.
pub const NINJA_MULTI_GENERATOR: &[&str] = &["Ninja Multi-Config"];

/// The Visual Studio generators.
pub const VISUAL_STUDIO_GENERATORS: &[&str] = &[
    "Visual Studio 9 2008",
    "Visual Studio 10 2010",
    "Visual Studio 11 2012",
    "Visual Studio 12 2013",
    "Visual Studio 14 2015",
    "Visual Studio 15 2017",
    "Visual Studio 16 2019",
    "Visual Studio 17 2022",
];

/// The remaining multi-config generators.
pub const OTHER_GENERATORS: &[&str] = &["Green Hills MULTI", "Xcode"];

/// Classification of a generator string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorClass {
    /// Build variant fixed at configure time (Makefiles, Ninja).
    SingleConfig,
    /// Build variant chosen at build time (Visual Studio, Xcode, ...).
    MultiConfig,
    /// Not in any known set.  No compiler or build-type arguments are
    /// derived for these; this mirrors the closed generator validation and
    /// is deliberate, not a fallback to single-config.
    Unrecognized,
}

/// Classify `generator` against the known generator sets.
pub fn classify_generator(generator: &str) -> GeneratorClass {
    if MAKEFILE_GENERATORS.contains(&generator) || NINJA_GENERATOR.contains(&generator) {
        GeneratorClass::SingleConfig
    } else if NINJA_MULTI_GENERATOR.contains(&generator)
        || VISUAL_STUDIO_GENERATORS.contains(&generator)
        || OTHER_GENERATORS.contains(&generator)
    {
        GeneratorClass::MultiConfig
    } else {
        GeneratorClass::Unrecognized
    }
}

/// An attribute of a registered option that may be changed pre-parse.
///
/// This closed set replaces a stringly-typed attribute map: renaming an
/// option, changing its destination, or altering its arity would break the
/// derivation and is unrepresentable here.
#[derive(Debug, Clone)]
pub enum ArgAttr {
    /// Value used when the flag is not supplied.
    Default(String),
    /// Closed set of accepted values.
    Choices(Vec<String>),
    /// Whether the flag must be supplied.
    Required(bool),
    /// Help string shown in usage.
    Help(String),
    /// Display name in usage (value name).
    Metavar(String),
}

#[derive(Debug, Clone)]
enum OptionKind {
    Value {
        default: Option<String>,
        choices: Option<Vec<String>>,
        metavar: Option<String>,
    },
    Flag,
}

/// One registered option: a flag string, a canonical destination name, and
/// the clap-facing attributes.
#[derive(Debug, Clone)]
struct OptionRecord {
    flag: &'static str,
    dest: &'static str,
    kind: OptionKind,
    required: bool,
    help: String,
}

impl OptionRecord {
    fn matches_key(&self, key: &str) -> bool {
        self.flag == key || self.dest == key
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.dest).help(self.help.clone());
        if let Some(long) = self.flag.strip_prefix("--") {
            arg = arg.long(long);
        } else if let Some(short) = self.flag.strip_prefix('-').and_then(|s| s.chars().next()) {
            arg = arg.short(short);
        }
        match &self.kind {
            OptionKind::Flag => {
                arg = arg.action(ArgAction::SetTrue);
            }
            OptionKind::Value {
                default,
                choices,
                metavar,
            } => {
                arg = arg.action(ArgAction::Set);
                if let Some(metavar) = metavar {
                    arg = arg.value_name(metavar.clone());
                }
                if let Some(choices) = choices {
                    arg = arg.value_parser(PossibleValuesParser::new(choices.clone()));
                }
                match default {
                    Some(default) => arg = arg.default_value(default.clone()),
                    // `required` with a default value is contradictory; only
                    // apply it to options without one.
                    None => arg = arg.required(self.required),
                }
            }
        }
        arg
    }
}

/// Dest reserved for the derived configure list.
const RESERVED_CONFIGURE: &str = "cmake_configure_args";
/// Dest reserved for the derived build list.
const RESERVED_BUILD: &str = "cmake_build_args";
/// Dest reserved for the trailing passthrough positional.
const RESERVED_EXTRA: &str = "extra_args";

/// A CMake focused argument parser.  See the [module docs](self).
#[derive(Debug, Clone)]
pub struct CMakeParser {
    name: String,
    about: Option<String>,
    options: Vec<OptionRecord>,
    unregistered: Vec<Arg>,
    add_extra_args: bool,
    shared_or_static_required: bool,
}

impl CMakeParser {
    /// Create a parser named `name` with the full registered option set.
    ///
    /// Compiler defaults come from `$CC` / `$CXX` when set, otherwise the
    /// platform convention (`cl.exe` on Windows, `clang`/`clang++` on macOS,
    /// `gcc`/`g++` elsewhere).
    pub fn new(name: impl Into<String>) -> Self {
        let mut generator_choices: Vec<String> = MAKEFILE_GENERATORS
            .iter()
            .chain(NINJA_GENERATOR)
            .chain(NINJA_MULTI_GENERATOR)
            .chain(VISUAL_STUDIO_GENERATORS)
            .chain(OTHER_GENERATORS)
            .map(|g| g.to_string())
            .collect();
        generator_choices.sort();

        let cc = env_or_platform_default("CC", "cl.exe", "clang", "gcc");
        let cxx = env_or_platform_default("CXX", "cl.exe", "clang++", "g++");

        let options = vec![
            OptionRecord {
                flag: "-G",
                dest: "generator",
                kind: OptionKind::Value {
                    default: Some("Ninja".to_string()),
                    choices: Some(generator_choices),
                    metavar: Some("GENERATOR".to_string()),
                },
                required: false,
                help: "Generator to use (cmake -G flag).".to_string(),
            },
            OptionRecord {
                flag: "-A",
                dest: "architecture",
                kind: OptionKind::Value {
                    default: None,
                    choices: None,
                    metavar: None,
                },
                required: false,
                help: "Target architecture (cmake -A flag).  Not validated.  \
                       Example: -G 'Visual Studio 16 2019' -A x64"
                    .to_string(),
            },
            OptionRecord {
                flag: "-T",
                dest: "toolset",
                kind: OptionKind::Value {
                    default: None,
                    choices: None,
                    metavar: None,
                },
                required: false,
                help: "Toolset to use (cmake -T flag).  Not validated, must be \
                       valid for the specified generator / architecture."
                    .to_string(),
            },
            OptionRecord {
                flag: "--shared",
                dest: "shared",
                kind: OptionKind::Flag,
                required: false,
                help: "Build shared libraries?  Adds -DBUILD_SHARED_LIBS=ON configure arg."
                    .to_string(),
            },
            OptionRecord {
                flag: "--static",
                dest: "static",
                kind: OptionKind::Flag,
                required: false,
                help: "Build static libraries?  Adds -DBUILD_SHARED_LIBS=OFF configure arg."
                    .to_string(),
            },
            OptionRecord {
                flag: "--cc",
                dest: "cc",
                kind: OptionKind::Value {
                    default: Some(cc),
                    choices: None,
                    metavar: None,
                },
                required: false,
                help: "The CMAKE_C_COMPILER to use for single-config generators.".to_string(),
            },
            OptionRecord {
                flag: "--cxx",
                dest: "cxx",
                kind: OptionKind::Value {
                    default: Some(cxx),
                    choices: None,
                    metavar: None,
                },
                required: false,
                help: "The CMAKE_CXX_COMPILER to use for single-config generators.".to_string(),
            },
            OptionRecord {
                flag: "--build-type",
                dest: "build_type",
                kind: OptionKind::Value {
                    default: Some("Release".to_string()),
                    choices: Some(
                        ["Release", "Debug", "RelWithDebInfo", "MinSizeRel"]
                            .map(String::from)
                            .to_vec(),
                    ),
                    metavar: None,
                },
                required: false,
                help: "For single-config generators, the CMAKE_BUILD_TYPE to configure \
                       with.  For multi-config generators, ['--config', '<build_type>'] \
                       is derived for use with `cmake --build`."
                    .to_string(),
            },
        ];

        Self {
            name: name.into(),
            about: None,
            options,
            unregistered: Vec::new(),
            add_extra_args: true,
            shared_or_static_required: false,
        }
    }

    /// Set the description shown in `--help` output.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Enable or disable the trailing `extra_args` passthrough positional
    /// (enabled by default).  Must be disabled before [`parse`](Self::parse);
    /// the positional is only added at parse time so that it lands after any
    /// caller-added positionals.
    pub fn with_extra_args(mut self, enabled: bool) -> Self {
        self.add_extra_args = enabled;
        self
    }

    /// Require that one of `--shared` / `--static` is supplied.
    ///
    /// By default neither is required and, when neither is given, no
    /// `-DBUILD_SHARED_LIBS` entry is derived.  Projects that default
    /// `BUILD_SHARED_LIBS=ON` may want to force callers to choose.
    pub fn with_linkage_required(mut self, required: bool) -> Self {
        self.shared_or_static_required = required;
        self
    }

    /// Whether `key` (flag or dest) names a registered option.
    pub fn is_registered(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Add an unregistered argument for the caller's own needs.
    ///
    /// Fails with a `Config` error when the argument id collides with the
    /// reserved names `cmake_configure_args` / `cmake_build_args` (populated
    /// after parsing), with `extra_args` while the passthrough positional is
    /// enabled, or with a registered option.
    pub fn add_argument(&mut self, arg: Arg) -> Result<()> {
        let id = arg.get_id().to_string();
        if id == RESERVED_CONFIGURE || id == RESERVED_BUILD {
            return Err(CairnError::config(format!("'{id}' name is reserved.")));
        }
        if self.add_extra_args && id == RESERVED_EXTRA {
            return Err(CairnError::config(
                "'extra_args' is reserved.  Disable extra args first.",
            ));
        }
        if self.is_registered(&id) {
            return Err(CairnError::config(format!(
                "'{id}' collides with a registered option."
            )));
        }
        self.unregistered.push(arg);
        Ok(())
    }

    /// Remove registered options by flag or dest name.
    ///
    /// The generator cannot be removed (the derivation starts from it), and
    /// `extra_args` must be disabled rather than removed.  When any name is
    /// not a registered option, nothing else about the parser is usable and
    /// the error lists *every* unrecognized name.
    pub fn remove(&mut self, keys: &[&str]) -> Result<()> {
        if keys.iter().any(|key| *key == "-G" || *key == "generator") {
            return Err(CairnError::config("'generator' argument may not be removed."));
        }
        if keys.iter().any(|key| *key == RESERVED_EXTRA) {
            return Err(CairnError::config(
                "'extra_args' cannot be removed, it must be prevented.  Disable extra args instead.",
            ));
        }

        let mut missing = Vec::new();
        for key in keys {
            match self.options.iter().position(|opt| opt.matches_key(key)) {
                Some(index) => {
                    self.options.remove(index);
                }
                None => missing.push((*key).to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(CairnError::config(format!(
                "Cannot remove unregistered arg(s): {missing:?}"
            )));
        }
        Ok(())
    }

    /// Change attributes of a registered option.
    ///
    /// `key` may be a flag (`"-G"`, `"--shared"`) or a dest (`"generator"`,
    /// `"shared"`).  The generator's `choices` cannot be changed: the
    /// single-config vs multi-config classification depends on them.
    /// Attributes that do not apply to the target (a default value for a
    /// boolean flag, say) are ignored.
    pub fn set_argument(&mut self, key: &str, attrs: &[ArgAttr]) -> Result<()> {
        let is_generator = key == "-G" || key == "generator";
        if is_generator && attrs.iter().any(|a| matches!(a, ArgAttr::Choices(_))) {
            return Err(CairnError::config(
                "Changing 'generator' attribute 'choices' is not supported.",
            ));
        }

        let record = self
            .options
            .iter_mut()
            .find(|opt| opt.matches_key(key))
            .ok_or_else(|| {
                CairnError::config(format!("Cannot set attrs of '{key}', argument not found."))
            })?;

        for attr in attrs {
            match attr {
                ArgAttr::Default(value) => {
                    if let OptionKind::Value { default, .. } = &mut record.kind {
                        *default = Some(value.clone());
                    }
                }
                ArgAttr::Choices(values) => {
                    if let OptionKind::Value { choices, .. } = &mut record.kind {
                        *choices = Some(values.clone());
                    }
                }
                ArgAttr::Required(required) => record.required = *required,
                ArgAttr::Help(help) => record.help = help.clone(),
                ArgAttr::Metavar(name) => {
                    if let OptionKind::Value { metavar, .. } = &mut record.kind {
                        *metavar = Some(name.clone());
                    }
                }
            }
        }
        Ok(())
    }

    /// Parse the process command line, deriving the configure / build lists.
    ///
    /// Malformed input exits the process with code 2 (argument-parser
    /// convention); help and version requests exit with 0.
    pub fn parse(self) -> CMakeArgs {
        match self.try_parse_from(std::env::args_os()) {
            Ok(args) => args,
            Err(CairnError::Cli(err)) => err.exit(),
            Err(err) => fail(&err.to_string()),
        }
    }

    /// Parse an explicit argument list (the first item is the program name).
    ///
    /// This is the embeddable / testable surface behind [`parse`](Self::parse).
    pub fn try_parse_from<I, T>(self, args: I) -> Result<CMakeArgs>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command().try_get_matches_from(args)?;
        Ok(self.derive(matches))
    }

    fn lookup(&self, key: &str) -> Option<&OptionRecord> {
        self.options.iter().find(|opt| opt.matches_key(key))
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(self.name.clone());
        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }
        for record in &self.options {
            cmd = cmd.arg(record.to_arg());
        }

        // Mutual exclusion between --shared and --static, kept at the flag
        // level (the derivation never sees both set).
        let linkage: Vec<&str> = ["shared", "static"]
            .into_iter()
            .filter(|dest| self.is_registered(dest))
            .collect();
        if !linkage.is_empty() {
            cmd = cmd.group(
                ArgGroup::new("linkage")
                    .args(linkage)
                    .multiple(false)
                    .required(self.shared_or_static_required),
            );
        }

        for arg in &self.unregistered {
            cmd = cmd.arg(arg.clone());
        }

        // Added last so caller positionals keep their places; only values
        // after the `--` sequence land here.
        if self.add_extra_args {
            cmd = cmd.arg(
                Arg::new(RESERVED_EXTRA)
                    .num_args(0..)
                    .last(true)
                    .value_name("EXTRA_ARGS")
                    .help(
                        "Any extra configure arguments, supplied after the `--` \
                         sequence, appended to the configure list verbatim.",
                    ),
            );
        }

        cmd
    }

    /// The single derivation pass.  Ordering is load bearing: it defines the
    /// literal output sequences.
    fn derive(&self, matches: ArgMatches) -> CMakeArgs {
        let mut cmake_configure_args: Vec<String> = Vec::new();
        let mut cmake_build_args: Vec<String> = Vec::new();

        // The generator is always present: it has a default and cannot be
        // removed.
        let generator = matches
            .get_one::<String>("generator")
            .cloned()
            .unwrap_or_default();
        cmake_configure_args.extend(["-G".to_string(), generator.clone()]);

        for (dest, flag) in [("architecture", "-A"), ("toolset", "-T")] {
            if let Some(value) = self.value_of(&matches, dest) {
                cmake_configure_args.extend([flag.to_string(), value.to_string()]);
            }
        }

        let shared = self.flag_set(&matches, "shared");
        let static_ = self.flag_set(&matches, "static");
        if shared || static_ {
            cmake_configure_args.push(format!(
                "-DBUILD_SHARED_LIBS={}",
                if shared { "ON" } else { "OFF" }
            ));
        }

        let class = classify_generator(&generator);
        if class == GeneratorClass::SingleConfig {
            if let Some(cc) = self.value_of(&matches, "cc") {
                cmake_configure_args.push(format!("-DCMAKE_C_COMPILER={cc}"));
            }
            if let Some(cxx) = self.value_of(&matches, "cxx") {
                cmake_configure_args.push(format!("-DCMAKE_CXX_COMPILER={cxx}"));
            }
        }

        if let Some(build_type) = self.value_of(&matches, "build_type") {
            match class {
                GeneratorClass::MultiConfig => {
                    cmake_build_args.extend(["--config".to_string(), build_type.to_string()]);
                }
                GeneratorClass::SingleConfig => {
                    cmake_configure_args.push(format!("-DCMAKE_BUILD_TYPE={build_type}"));
                }
                // Unrecognized generators get neither form.
                GeneratorClass::Unrecognized => {}
            }
        }

        if self.add_extra_args {
            if let Some(extra) = matches.get_many::<String>(RESERVED_EXTRA) {
                cmake_configure_args.extend(extra.cloned());
            }
        }

        tracing::debug!(
            configure = ?cmake_configure_args,
            build = ?cmake_build_args,
            "derived cmake argument lists"
        );
        CMakeArgs {
            matches,
            cmake_configure_args,
            cmake_build_args,
        }
    }

    /// Value of a registered option, skipping removed options and empty
    /// values (an empty string never contributes an argument).
    fn value_of<'a>(&self, matches: &'a ArgMatches, dest: &str) -> Option<&'a str> {
        self.lookup(dest)?;
        matches
            .get_one::<String>(dest)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn flag_set(&self, matches: &ArgMatches, dest: &str) -> bool {
        self.lookup(dest).is_some() && matches.get_flag(dest)
    }
}

/// Parse results: every surviving attribute plus the two derived lists.
#[derive(Debug)]
pub struct CMakeArgs {
    matches: ArgMatches,
    /// Ordered tokens for the configure invocation.  Always starts with
    /// `["-G", <generator>]`.
    pub cmake_configure_args: Vec<String>,
    /// Ordered tokens for the build invocation (empty for single-config
    /// generators).
    pub cmake_build_args: Vec<String>,
}

impl CMakeArgs {
    /// Whether `dest` exists in the parse results.  Removed options are
    /// absent entirely.
    pub fn contains(&self, dest: &str) -> bool {
        self.matches.try_contains_id(dest).unwrap_or(false)
    }

    /// Look up a string-valued attribute by dest.  `None` when the option
    /// was removed or has no value.
    pub fn get(&self, dest: &str) -> Option<&str> {
        self.matches
            .try_get_one::<String>(dest)
            .ok()
            .flatten()
            .map(String::as_str)
    }

    /// Look up a boolean flag by dest.  `false` when the flag was removed.
    pub fn flag(&self, dest: &str) -> bool {
        self.matches
            .try_get_one::<bool>(dest)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    /// The trailing passthrough tokens captured after `--` (empty when
    /// disabled or none were given).
    pub fn extra_args(&self) -> Vec<&str> {
        self.matches
            .try_get_many::<String>(RESERVED_EXTRA)
            .ok()
            .flatten()
            .map(|values| values.map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Access the raw matches (for caller-added arguments).
    pub fn matches(&self) -> &ArgMatches {
        &self.matches
    }
}
