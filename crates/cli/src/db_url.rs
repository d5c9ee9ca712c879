use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

pub const MEMORY_URL: &str = "sqlite::memory:";

fn is_in_memory(url: &str) -> bool {
    url == MEMORY_URL || url.contains("mode=memory")
}

/// Turns a bare or relative path into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_in_memory(trimmed) || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Creates the database file and its parent directory so the pool can open it.
pub fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if is_in_memory(db_url) {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_and_absolute_urls_pass_through() {
        assert_eq!(normalize_sqlite_url(MEMORY_URL), MEMORY_URL);
        assert_eq!(
            normalize_sqlite_url("sqlite://tmp/a.sqlite3"),
            "sqlite://tmp/a.sqlite3"
        );
        let shared = "sqlite:file:demo?mode=memory&cache=shared";
        assert_eq!(normalize_sqlite_url(shared), shared);
    }

    #[test]
    fn relative_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/assessments.sqlite3");
        let path = url.strip_prefix("sqlite://").unwrap();
        assert!(Path::new(path).is_absolute());
        assert!(path.ends_with("data/assessments.sqlite3"));

        let bare = normalize_sqlite_url("  /var/lib/assess.db ");
        assert_eq!(bare, "sqlite:///var/lib/assess.db");
    }

    #[test]
    fn prepare_rejects_urls_without_a_path() {
        assert!(prepare_sqlite_file(MEMORY_URL).is_ok());
        assert!(prepare_sqlite_file("postgres://x").is_err());
        assert!(prepare_sqlite_file("sqlite://").is_err());
    }
}
