use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::AppConfig;

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create a fresh, empty directory under the system temp dir
pub fn scratch_dir(label: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let dir = std::env::temp_dir().join(format!(
        "todo-api-{}-{}-{}-{}",
        label,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed),
        nanos
    ));
    std::fs::create_dir_all(&dir).expect("failed to create scratch dir");
    dir
}

/// Development config whose data files live in their own scratch dir
pub fn test_config(label: &str) -> AppConfig {
    let dir = scratch_dir(label);
    let mut config = AppConfig::development();
    config.storage.todos_file = dir.join("todos.json");
    config.storage.users_file = dir.join("users.json");
    config.security.jwt_secret = "test-secret".to_string();
    config
}
