//! Integration tests for configuration and directory layout
//!
//! Tests that manipulate TERRITORY_INJECTOR_ROOT are marked with #[serial]
//! so they do not race each other.

use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use territory_common::config::{
    load_toml_config, DirectoryLayout, DirectoryNames, RootFolderResolver, TomlConfig,
    ROOT_ENV_VAR,
};

fn layout_in(temp_dir: &TempDir) -> DirectoryLayout {
    let layout = DirectoryLayout::new(temp_dir.path(), &DirectoryNames::default());
    layout.ensure_directories_exist().unwrap();
    layout
}

#[test]
#[serial]
fn test_resolver_env_var_beats_toml() {
    env::set_var(ROOT_ENV_VAR, "/tmp/territory-env-root");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/territory-toml-root")),
        ..Default::default()
    };

    let root = RootFolderResolver::new(None, &config).resolve();
    assert_eq!(root, PathBuf::from("/tmp/territory-env-root"));

    env::remove_var(ROOT_ENV_VAR);
}

#[test]
#[serial]
fn test_resolver_toml_then_current_dir() {
    env::remove_var(ROOT_ENV_VAR);

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/territory-toml-root")),
        ..Default::default()
    };
    assert_eq!(
        RootFolderResolver::new(None, &config).resolve(),
        PathBuf::from("/tmp/territory-toml-root")
    );

    let empty = TomlConfig::default();
    assert_eq!(
        RootFolderResolver::new(None, &empty).resolve(),
        PathBuf::from(".")
    );
}

#[test]
fn test_ensure_directories_exist_creates_all() {
    let temp_dir = TempDir::new().unwrap();
    let layout = layout_in(&temp_dir);

    for dir in ["ce", "input", "output", "backup", "logs"] {
        assert!(temp_dir.path().join(dir).is_dir(), "{} missing", dir);
    }
    // Second call is a no-op
    layout.ensure_directories_exist().unwrap();
}

#[test]
fn test_discover_master_file_exactly_one() {
    let temp_dir = TempDir::new().unwrap();
    let layout = layout_in(&temp_dir);
    fs::write(layout.master_dir.join("cfgmap.xml"), "<map/>").unwrap();
    fs::write(layout.master_dir.join("notes.txt"), "ignored").unwrap();

    let master = layout.discover_master_file().unwrap();
    assert_eq!(master, layout.master_dir.join("cfgmap.xml"));
}

#[test]
fn test_discover_master_file_none_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let layout = layout_in(&temp_dir);

    let err = layout.discover_master_file().unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("found 0"));
}

#[test]
fn test_discover_master_file_two_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let layout = layout_in(&temp_dir);
    fs::write(layout.master_dir.join("a.xml"), "<map/>").unwrap();
    fs::write(layout.master_dir.join("b.XML"), "<map/>").unwrap();

    let err = layout.discover_master_file().unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("found 2"));
}

#[test]
fn test_input_files_sorted_and_filtered() {
    let temp_dir = TempDir::new().unwrap();
    let layout = layout_in(&temp_dir);
    fs::write(layout.input_dir.join("zombies_north.xml"), "<t/>").unwrap();
    fs::write(layout.input_dir.join("farms.xml"), "<t/>").unwrap();
    fs::write(layout.input_dir.join("readme.md"), "no").unwrap();
    fs::create_dir(layout.input_dir.join("nested.xml")).unwrap();

    let files = layout.input_files().unwrap();
    assert_eq!(
        files,
        vec![
            layout.input_dir.join("farms.xml"),
            layout.input_dir.join("zombies_north.xml"),
        ]
    );
}

#[test]
fn test_load_toml_config_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("injector.toml");
    fs::write(
        &path,
        r#"
        [directories]
        master_dir = "master"

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    let config = load_toml_config(Some(&path)).unwrap();
    assert_eq!(config.directories.master_dir, PathBuf::from("master"));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_load_toml_config_missing_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    let err = load_toml_config(Some(&temp_dir.path().join("absent.toml"))).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_load_toml_config_malformed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    fs::write(&path, "[directories\nmaster_dir = ").unwrap();

    let err = load_toml_config(Some(&path)).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("Failed to parse"));
}
