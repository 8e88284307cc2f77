//! Environment overrides live in their own test binary: they are process-wide.

use std::path::PathBuf;

use tempfile::TempDir;

use sankalp::config::{local_config_path, Settings};

#[test]
fn given_env_overrides_when_load_then_env_wins_over_local_config() {
    let project = TempDir::new().unwrap();
    std::fs::write(
        local_config_path(project.path()),
        "data_file = \"/from/local.toml\"\n\n[render]\nshow_details = true\n",
    )
    .unwrap();
    std::env::set_var("SANKALP_DATA_FILE", "/from/env.toml");
    std::env::set_var("SANKALP_RENDER__SHOW_DETAILS", "false");

    let settings = Settings::load(Some(project.path())).expect("load settings");

    std::env::remove_var("SANKALP_DATA_FILE");
    std::env::remove_var("SANKALP_RENDER__SHOW_DETAILS");
    assert_eq!(settings.data_file, PathBuf::from("/from/env.toml"));
    assert!(!settings.render.show_details);
}
