//! Logger startup when the configured log path cannot be opened.
//!
//! Lives in its own test binary: `init` installs a process-wide subscriber
//! and the test changes the working directory.

use breedview::logging;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[test]
fn unwritable_log_path_falls_back_to_working_directory() {
    let dir = tempdir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let active = logging::init(Path::new("/nonexistent-dir/breedview.log")).unwrap();
    assert_eq!(active, Some(PathBuf::from("breedview.log")));
    assert!(dir.path().join("breedview.log").exists());

    // A second call keeps the first outcome
    let again = logging::init(Path::new("/elsewhere/other.log")).unwrap();
    assert_eq!(again, active);
}
