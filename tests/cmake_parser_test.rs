//! Integration tests for the CMake argument parser public API.
//!
//! Parser construction reads `$CC` / `$CXX`, so every test pins them with a
//! scoped guard behind one lock.

use std::sync::{Mutex, MutexGuard};

use cairn::parsers::cmake::{ArgAttr, CMakeParser, GeneratorClass};
use cairn::scope::{set_env, Scope};

fn lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_compilers<R>(f: impl FnOnce() -> R) -> R {
    set_env([("CC", "gcc"), ("CXX", "g++")]).unwrap().around(f)
}

#[test]
fn full_single_config_invocation() {
    let _lock = lock();
    with_compilers(|| {
        let args = CMakeParser::new("ci-build")
            .try_parse_from([
                "ci-build",
                "-G",
                "Unix Makefiles",
                "--static",
                "--build-type",
                "MinSizeRel",
                "--",
                "-Werror=dev",
            ])
            .unwrap();

        assert_eq!(
            args.cmake_configure_args,
            [
                "-G",
                "Unix Makefiles",
                "-DBUILD_SHARED_LIBS=OFF",
                "-DCMAKE_C_COMPILER=gcc",
                "-DCMAKE_CXX_COMPILER=g++",
                "-DCMAKE_BUILD_TYPE=MinSizeRel",
                "-Werror=dev",
            ]
        );
        assert!(args.cmake_build_args.is_empty());
        assert_eq!(args.get("generator"), Some("Unix Makefiles"));
    });
}

#[test]
fn full_multi_config_invocation() {
    let _lock = lock();
    with_compilers(|| {
        let args = CMakeParser::new("ci-build")
            .try_parse_from([
                "ci-build",
                "-G",
                "Ninja Multi-Config",
                "--shared",
                "--build-type",
                "RelWithDebInfo",
            ])
            .unwrap();

        // Multi-config generators never receive compiler or build-type
        // defines at configure time.
        assert_eq!(
            args.cmake_configure_args,
            ["-G", "Ninja Multi-Config", "-DBUILD_SHARED_LIBS=ON"]
        );
        assert_eq!(args.cmake_build_args, ["--config", "RelWithDebInfo"]);
    });
}

#[test]
fn xcode_classifies_multi_config() {
    assert_eq!(
        cairn::parsers::cmake::classify_generator("Xcode"),
        GeneratorClass::MultiConfig
    );
}

#[test]
fn customized_parser_end_to_end() {
    let _lock = lock();
    with_compilers(|| {
        let mut parser = CMakeParser::new("ci-build")
            .about("Mylib CI builder")
            .with_extra_args(false);
        parser.remove(&["--shared", "--static", "architecture"]).unwrap();
        parser
            .set_argument("build_type", &[ArgAttr::Default("Debug".to_string())])
            .unwrap();
        parser
            .add_argument(
                clap::Arg::new("docs")
                    .long("docs")
                    .action(clap::ArgAction::SetTrue)
                    .help("Also build documentation."),
            )
            .unwrap();

        let args = parser.try_parse_from(["ci-build", "--docs"]).unwrap();
        assert!(!args.contains("shared"));
        assert!(!args.contains("architecture"));
        assert!(args.matches().get_flag("docs"));
        assert!(args
            .cmake_configure_args
            .contains(&"-DCMAKE_BUILD_TYPE=Debug".to_string()));
        assert!(args.extra_args().is_empty());
    });
}

#[test]
fn help_renders_registered_flags() {
    let _lock = lock();
    with_compilers(|| {
        let parser = CMakeParser::new("ci-build").about("Mylib CI builder");
        // A bad flag should mention usage without exiting the process.
        let err = parser
            .try_parse_from(["ci-build", "--no-such-flag"])
            .unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("--no-such-flag") || rendered.contains("unexpected"));
    });
}
