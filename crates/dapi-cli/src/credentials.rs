//! API key storage.
//!
//! The key is kept as a single line in `<config dir>/dapi/credentials`.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

pub fn credentials_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
    Ok(config_dir.join("dapi").join("credentials"))
}

/// Read the stored key, if any
pub fn read_api_key(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents
            .lines()
            .next()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

pub fn save_api_key(path: &Path, key: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", key.trim()))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn prompt_api_key(input: &mut impl BufRead) -> Result<String> {
    print!("Enter your API key: ");
    io::stdout().flush().ok();
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read API key")?;
    let key = line.trim();
    if key.is_empty() {
        bail!("No API key given");
    }
    Ok(key.to_string())
}

/// Resolve the API key: explicit value, then the credentials file, then a
/// prompt whose answer is stored for next time.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<String> {
    if let Some(key) = explicit.map(str::trim).filter(|key| !key.is_empty()) {
        return Ok(key.to_string());
    }

    let path = credentials_path()?;
    if let Some(key) = read_api_key(&path)? {
        return Ok(key);
    }

    let key = prompt_api_key(&mut io::stdin().lock())?;
    save_api_key(&path, &key)?;
    info!("Saved API key to {}", path.display());
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_read_api_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dapi").join("credentials");

        assert_eq!(read_api_key(&path).unwrap(), None);
        save_api_key(&path, "  abc123 \n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "abc123\n");
        assert_eq!(read_api_key(&path).unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_blank_credentials_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials");
        fs::write(&path, "\n").unwrap();
        assert_eq!(read_api_key(&path).unwrap(), None);
    }

    #[test]
    fn test_prompt_api_key() {
        let mut input = Cursor::new("  secret\n");
        assert_eq!(prompt_api_key(&mut input).unwrap(), "secret");

        let mut empty = Cursor::new("\n");
        assert!(prompt_api_key(&mut empty).is_err());
    }

    #[test]
    fn test_explicit_key_wins() {
        assert_eq!(resolve_api_key(Some(" given ")).unwrap(), "given");
    }
}
