//! Environment-variable layer of Settings::load.
//!
//! Single test in its own binary: the variables are process-wide.

use std::env;
use std::fs;

use tempfile::TempDir;

use scaletree::config::Settings;
use scaletree::domain::Rank;

#[test]
fn given_scaletree_env_vars_when_load_then_override_file_values() {
    // Arrange: config file says tribe/purple, environment says species/orange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scaletree.toml");
    fs::write(
        &path,
        r#"
leaf_rank = "tribe"

[style.leaf]
color = "purple"
size = 900
"#,
    )
    .unwrap();
    env::set_var("SCALETREE_LEAF_RANK", "species");
    env::set_var("SCALETREE_STYLE__LEAF__COLOR", "orange");

    // Act
    let result = Settings::load(Some(&path));
    env::remove_var("SCALETREE_LEAF_RANK");
    env::remove_var("SCALETREE_STYLE__LEAF__COLOR");

    // Assert
    let settings = result.expect("load settings");
    assert_eq!(settings.leaf_rank, Rank::Species);
    assert_eq!(settings.style.leaf.color, "orange");
    assert_eq!(settings.style.leaf.size, 900);
}
