//! HTTP downloads through `curl`, falling back to `wget`.
use anyhow::{Context as _, Result, bail};
use std::path::Path;

use crate::exec::Executor;

/// Download `url` to `dest`.
///
/// A partial file is removed on failure.
///
/// # Errors
///
/// Returns an error if neither `curl` nor `wget` is on PATH, or the
/// download fails.
pub fn download(executor: &dyn Executor, url: &str, dest: &Path) -> Result<()> {
    let dest_str = dest.to_str().context("download path is not valid UTF-8")?;

    let result = if executor.which("curl") {
        executor.run("curl", &["-fsSL", "-o", dest_str, url])
    } else if executor.which("wget") {
        executor.run("wget", &["-q", "-O", dest_str, url])
    } else {
        bail!("curl or wget is required to download {url}");
    };

    if let Err(e) = result {
        let _ = std::fs::remove_file(dest);
        return Err(e).with_context(|| format!("download {url}"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;

    #[test]
    fn prefers_curl() {
        let mock = MockExecutor::succeeding()
            .with_binary("curl")
            .with_binary("wget");
        download(&mock, "https://x/install.sh", Path::new("/tmp/i.sh")).unwrap();
        assert_eq!(mock.calls(), vec!["curl -fsSL -o /tmp/i.sh https://x/install.sh"]);
    }

    #[test]
    fn falls_back_to_wget() {
        let mock = MockExecutor::succeeding().with_binary("wget");
        download(&mock, "https://x/install.sh", Path::new("/tmp/i.sh")).unwrap();
        assert_eq!(mock.calls(), vec!["wget -q -O /tmp/i.sh https://x/install.sh"]);
    }

    #[test]
    fn neither_tool_is_an_error() {
        let mock = MockExecutor::succeeding();
        let err = download(&mock, "https://x", Path::new("/tmp/i.sh")).unwrap_err();
        assert!(err.to_string().contains("curl or wget"));
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn failure_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("partial");
        std::fs::write(&dest, "half").unwrap();
        let mock = MockExecutor::fail().with_binary("curl");
        assert!(download(&mock, "https://x", &dest).is_err());
        assert!(!dest.exists());
    }
}
