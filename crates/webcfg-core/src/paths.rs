use std::path::{Path, PathBuf};

/// Markers of a workspace root, strongest first.
const WORKSPACE_MARKERS: &[&str] = &["nx.json", "package.json", ".git"];

/// Find the workspace root by walking up from `cwd`.
///
/// A directory holding `nx.json` wins over any nearer `package.json` or `.git`,
/// so running from inside `apps/shop` still lands on the monorepo root.
/// Returns `None` if no marker is found at all.
#[must_use]
pub fn workspace_root(cwd: &Path) -> Option<PathBuf> {
    for marker in WORKSPACE_MARKERS {
        if let Some(found) = find_upwards(cwd, marker) {
            return Some(found);
        }
    }
    None
}

fn find_upwards(start: &Path, marker: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(marker).exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}
