#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use cost_simulator::{
    catalog::Catalog, config::ConfigManager, storage::JsonContentStore, wizard::Wizard,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Built-in catalog shared by the scenario tests.
pub static CATALOG: Lazy<Arc<Catalog>> =
    Lazy::new(|| Arc::new(Catalog::builtin().expect("built-in catalog parses")));

/// Fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (JsonContentStore, ConfigManager) {
    let base = temp_base();
    let store = JsonContentStore::new(Some(base.clone()), Some(3)).expect("create content store");
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");
    (store, config_manager)
}

pub fn wizard() -> Wizard {
    Wizard::new(Arc::clone(&CATALOG))
}
