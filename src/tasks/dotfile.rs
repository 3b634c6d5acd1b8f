//! Back up and regenerate `~/.zshrc`.
use anyhow::Result;
use std::fs;
use std::path::Path;

use super::{Context, Paths, Task, TaskResult};
use crate::error::TaskError;

/// What [`migrate`] left in place of the old config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    /// There was no `~/.zshrc`; nothing was touched.
    NoConfig,
    /// The framework template replaced the old config.
    TemplateRestored,
    /// The framework is not installed yet, so the backup was put back.
    BackupRestored,
}

/// Move `~/.zshrc` aside and restore a clean starting point.
///
/// The backup is written before anything is deleted; if it cannot be written
/// the original stays untouched.
///
/// # Errors
///
/// Returns [`TaskError::Backup`] if the backup copy fails and
/// [`TaskError::ExecutionFailed`] if the old file cannot be replaced.
pub fn migrate(paths: &Paths) -> Result<Migration, TaskError> {
    let zshrc = paths.zshrc();
    // a dangling symlink holds no config
    if !zshrc.is_file() {
        return Ok(Migration::NoConfig);
    }

    let backup = paths.zshrc_backup();
    fs::copy(&zshrc, &backup).map_err(|source| TaskError::Backup {
        path: zshrc.display().to_string(),
        source,
    })?;
    fs::remove_file(&zshrc).map_err(|e| failed(&zshrc, &e))?;

    let template = paths.template();
    if template.is_file() {
        fs::copy(&template, &zshrc).map_err(|e| failed(&zshrc, &e))?;
        Ok(Migration::TemplateRestored)
    } else {
        fs::copy(&backup, &zshrc).map_err(|e| failed(&zshrc, &e))?;
        Ok(Migration::BackupRestored)
    }
}

fn failed(path: &Path, e: &std::io::Error) -> TaskError {
    TaskError::ExecutionFailed {
        task: "Migrate zshrc".to_string(),
        reason: format!("restore {}: {e}", path.display()),
    }
}

/// Run [`migrate`] as a task.
#[derive(Debug)]
pub struct MigrateZshrc;

impl Task for MigrateZshrc {
    fn name(&self) -> &'static str {
        "Migrate zshrc"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn critical(&self) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let backup = ctx.paths.zshrc_backup();
        match migrate(&ctx.paths)? {
            Migration::NoConfig => Ok(TaskResult::Skipped("no existing ~/.zshrc".to_string())),
            Migration::TemplateRestored => {
                ctx.log.info(&format!(
                    "backed up to {}, restored framework template",
                    backup.display()
                ));
                Ok(TaskResult::Ok)
            }
            Migration::BackupRestored => {
                ctx.log.info(&format!(
                    "backed up to {}, framework template not available yet",
                    backup.display()
                ));
                Ok(TaskResult::Ok)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn paths() -> (tempfile::TempDir, Paths) {
        let home = tempfile::tempdir().unwrap();
        let paths = Paths::under_home(home.path());
        (home, paths)
    }

    fn install_template(paths: &Paths, content: &str) {
        let template = paths.template();
        fs::create_dir_all(template.parent().unwrap()).unwrap();
        fs::write(template, content).unwrap();
    }

    #[test]
    fn no_config_touches_nothing() {
        let (_home, paths) = paths();
        install_template(&paths, "template");
        assert_eq!(migrate(&paths).unwrap(), Migration::NoConfig);
        assert!(!paths.zshrc_backup().exists());
        assert!(!paths.zshrc().exists());
    }

    #[test]
    fn dangling_link_counts_as_no_config() {
        let (home, paths) = paths();
        install_template(&paths, "template");
        std::os::unix::fs::symlink(home.path().join("gone"), paths.zshrc()).unwrap();

        assert_eq!(migrate(&paths).unwrap(), Migration::NoConfig);
        assert!(!paths.zshrc_backup().exists());
        assert!(paths.zshrc().symlink_metadata().is_ok());
    }

    #[test]
    fn existing_config_is_backed_up_and_replaced_by_template() {
        let (_home, paths) = paths();
        install_template(&paths, "template");
        fs::write(paths.zshrc(), "mine").unwrap();

        assert_eq!(migrate(&paths).unwrap(), Migration::TemplateRestored);
        assert_eq!(fs::read_to_string(paths.zshrc_backup()).unwrap(), "mine");
        assert_eq!(fs::read_to_string(paths.zshrc()).unwrap(), "template");
    }

    #[test]
    fn without_template_backup_is_restored() {
        let (_home, paths) = paths();
        fs::write(paths.zshrc(), "mine").unwrap();

        assert_eq!(migrate(&paths).unwrap(), Migration::BackupRestored);
        assert_eq!(fs::read_to_string(paths.zshrc()).unwrap(), "mine");
        assert_eq!(fs::read_to_string(paths.zshrc_backup()).unwrap(), "mine");
    }

    #[test]
    fn backup_failure_leaves_original() {
        let (_home, paths) = paths();
        fs::write(paths.zshrc(), "mine").unwrap();
        // a directory where the backup file belongs makes the copy fail
        fs::create_dir(paths.zshrc_backup()).unwrap();

        let err = migrate(&paths).unwrap_err();
        assert!(matches!(err, TaskError::Backup { .. }));
        assert_eq!(fs::read_to_string(paths.zshrc()).unwrap(), "mine");
    }

    #[test]
    fn backup_is_overwritten_each_run() {
        let (_home, paths) = paths();
        fs::write(paths.zshrc_backup(), "old backup").unwrap();
        fs::write(paths.zshrc(), "current").unwrap();
        migrate(&paths).unwrap();
        assert_eq!(fs::read_to_string(paths.zshrc_backup()).unwrap(), "current");
    }
}
