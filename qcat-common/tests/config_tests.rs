//! Configuration resolution and graceful degradation
//!
//! Tests that manipulate QCAT_* environment variables are marked #[serial]
//! so they run sequentially, not in parallel.

use qcat_common::config::{
    load_config, load_config_with_source, locate_config_file, resolve_input, resolve_output_dir,
    write_toml_config, CorpusConfig, LoggingConfig, TomlConfig, CONFIG_ENV, DEFAULT_OUTPUT_DIR,
    INPUT_ENV, OUTPUT_DIR_ENV,
};
use qcat_common::{Error, SheetScheme};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(CONFIG_ENV);
    env::remove_var(INPUT_ENV);
    env::remove_var(OUTPUT_DIR_ENV);
}

#[test]
#[serial]
fn test_cli_input_wins_over_env_and_toml() {
    clear_env();
    env::set_var(INPUT_ENV, "/tmp/from-env.csv");
    let config = TomlConfig {
        input: Some(PathBuf::from("/tmp/from-toml.csv")),
        ..TomlConfig::default()
    };

    let resolved = resolve_input(Some(Path::new("/tmp/from-cli.csv")), &config).unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/from-cli.csv"));

    clear_env();
}

#[test]
#[serial]
fn test_env_input_wins_over_toml() {
    clear_env();
    env::set_var(INPUT_ENV, "/tmp/from-env.csv");
    let config = TomlConfig {
        input: Some(PathBuf::from("/tmp/from-toml.csv")),
        ..TomlConfig::default()
    };

    let resolved = resolve_input(None, &config).unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/from-env.csv"));

    clear_env();
}

#[test]
#[serial]
fn test_toml_input_used_without_overrides() {
    clear_env();
    let config = TomlConfig {
        input: Some(PathBuf::from("/tmp/from-toml.csv")),
        ..TomlConfig::default()
    };
    assert_eq!(
        resolve_input(None, &config).unwrap(),
        PathBuf::from("/tmp/from-toml.csv")
    );
}

#[test]
#[serial]
fn test_missing_input_is_config_error() {
    clear_env();
    let err = resolve_input(None, &TomlConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
#[serial]
fn test_output_dir_falls_back_to_default() {
    clear_env();
    let dir = resolve_output_dir(None, &TomlConfig::default());
    assert_eq!(dir, PathBuf::from(DEFAULT_OUTPUT_DIR));

    env::set_var(OUTPUT_DIR_ENV, "/tmp/qcat-env-out");
    let dir = resolve_output_dir(None, &TomlConfig::default());
    assert_eq!(dir, PathBuf::from("/tmp/qcat-env-out"));

    clear_env();
}

#[test]
#[serial]
fn test_explicit_missing_config_is_error() {
    clear_env();
    let err = load_config(Some(Path::new("/definitely/not/qcat.toml"))).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
#[serial]
fn test_config_env_var_names_file() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("qcat.toml");
    std::fs::write(&path, "[corpus]\nsplit_year = 2015\n").unwrap();

    env::set_var(CONFIG_ENV, &path);
    let config = load_config(None).unwrap();
    assert_eq!(config.corpus.split_year, 2015);

    clear_env();
}

#[test]
#[serial]
fn test_malformed_config_is_error() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    std::fs::write(&path, "corpus = [[[").unwrap();

    let err = load_config(Some(&path)).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

/// Run `f` inside `dir` with the user config directory pointed into it, so
/// only `./qcat.toml` can be discovered
fn in_isolated_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
    let previous_dir = env::current_dir().unwrap();
    let previous_home = env::var_os("HOME");
    let previous_xdg = env::var_os("XDG_CONFIG_HOME");

    env::set_var("HOME", dir.join("home"));
    env::set_var("XDG_CONFIG_HOME", dir.join("xdg"));
    env::set_current_dir(dir).unwrap();
    let result = f();

    env::set_current_dir(previous_dir).unwrap();
    match previous_home {
        Some(home) => env::set_var("HOME", home),
        None => env::remove_var("HOME"),
    }
    match previous_xdg {
        Some(xdg) => env::set_var("XDG_CONFIG_HOME", xdg),
        None => env::remove_var("XDG_CONFIG_HOME"),
    }
    result
}

#[test]
#[serial]
fn test_no_config_file_falls_back_to_defaults() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();

    let (located, loaded) = in_isolated_dir(temp_dir.path(), || {
        (locate_config_file(None), load_config_with_source(None).unwrap())
    });

    assert_eq!(located, None);
    assert_eq!(loaded, (TomlConfig::default(), None));
}

#[test]
#[serial]
fn test_local_qcat_toml_is_discovered() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("qcat.toml"),
        "[corpus]\nscheme = \"v2ec\"\ntop_n = 3\n",
    )
    .unwrap();

    let (config, source) =
        in_isolated_dir(temp_dir.path(), || load_config_with_source(None).unwrap());

    assert_eq!(source, Some(PathBuf::from("qcat.toml")));
    assert_eq!(config.corpus.scheme, SheetScheme::V2ec);
    assert_eq!(config.corpus.top_n, 3);
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn test_write_then_load_preserves_fields() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("nested").join("qcat.toml");

    let config = TomlConfig {
        input: Some(PathBuf::from("corpus.csv")),
        output_dir: Some(PathBuf::from("out")),
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        corpus: CorpusConfig {
            top_n: 5,
            ..CorpusConfig::default()
        },
    };

    write_toml_config(&config, &target).unwrap();
    assert!(target.exists());
    assert!(!temp_dir.path().join("nested").join("qcat.toml.tmp").exists());

    let loaded = TomlConfig::from_file(&target).unwrap();
    assert_eq!(loaded, config);
}
