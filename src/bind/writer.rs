//! Filesystem side of configuration generation.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::DirectoryKind;
use super::render::{ConfigFragment, artifact_path};
use crate::model::ZoneType;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to remove {}: {source}", path.display())]
    Remove { path: PathBuf, source: io::Error },
}

/// Writes rendered fragments below a zones root and removes them again.
#[derive(Debug, Clone)]
pub struct ConfigWriter {
    root: PathBuf,
}

impl ConfigWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the master, slave, forward and reverse directories if missing.
    pub fn ensure_layout(&self) -> Result<(), ConfigError> {
        for dir in DirectoryKind::ALL {
            let path = self.root.join(dir.as_str());
            fs::create_dir_all(&path).map_err(|source| ConfigError::CreateDir { path, source })?;
        }
        Ok(())
    }

    /// Replaces the fragment's target file. The new content is written next
    /// to the target and renamed over it, so readers never see a truncated
    /// file.
    pub fn write(&self, fragment: &ConfigFragment) -> Result<PathBuf, ConfigError> {
        self.ensure_layout()?;

        let target = self.root.join(&fragment.path);
        let mut tmp = target.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &fragment.text).map_err(|source| ConfigError::Write {
            path: tmp.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(ConfigError::Write {
                path: target,
                source,
            });
        }

        debug!("wrote {}", target.display());
        Ok(target)
    }

    /// Removes every artifact a zone may have left behind and returns the
    /// files that were actually deleted. Missing files are not an error.
    ///
    /// Master zones also lose `master/db.<name>` and the sibling
    /// `reverse/db.<name>`.
    pub fn remove_artifacts(
        &self,
        name: &str,
        zone_type: ZoneType,
    ) -> Result<Vec<PathBuf>, ConfigError> {
        self.remove_stale(name, zone_type, None)
    }

    /// Like [`remove_artifacts`](Self::remove_artifacts), but leaves `keep`
    /// (relative to the root) in place. Used after a rename or retype, where
    /// the new fragment may live at one of the old paths and is replaced by
    /// the rename in [`write`](Self::write) instead.
    pub fn remove_stale(
        &self,
        name: &str,
        zone_type: ZoneType,
        keep: Option<&Path>,
    ) -> Result<Vec<PathBuf>, ConfigError> {
        let mut candidates = vec![artifact_path(name, zone_type)];
        if zone_type == ZoneType::Master {
            candidates.push(Path::new(DirectoryKind::Master.as_str()).join(format!("db.{name}")));
            candidates.push(Path::new(DirectoryKind::Reverse.as_str()).join(format!("db.{name}")));
        }

        let mut removed = Vec::new();
        for relative in candidates {
            if keep == Some(relative.as_path()) {
                continue;
            }
            let path = self.root.join(relative);
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!("removed {}", path.display());
                    removed.push(path);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(ConfigError::Remove { path, source }),
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fragment(path: &str, text: &str) -> ConfigFragment {
        ConfigFragment {
            path: PathBuf::from(path),
            text: text.into(),
        }
    }

    #[test]
    fn write_creates_layout_and_file() {
        let dir = TempDir::new().unwrap();
        let writer = ConfigWriter::new(dir.path());

        let target = writer
            .write(&fragment("slave/example.local.conf", "zone {};\n"))
            .unwrap();

        assert_eq!(target, dir.path().join("slave/example.local.conf"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "zone {};\n");
        for sub in ["master", "slave", "forward", "reverse"] {
            assert!(dir.path().join(sub).is_dir(), "{sub} missing");
        }
        assert!(!dir.path().join("slave/example.local.conf.tmp").exists());
    }

    #[test]
    fn write_replaces_previous_content() {
        let dir = TempDir::new().unwrap();
        let writer = ConfigWriter::new(dir.path());

        writer
            .write(&fragment("forward/a.conf", "a much longer first version\n"))
            .unwrap();
        let target = writer.write(&fragment("forward/a.conf", "v2\n")).unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "v2\n");
    }

    #[test]
    fn removing_master_also_removes_reverse_sibling() {
        let dir = TempDir::new().unwrap();
        let writer = ConfigWriter::new(dir.path());
        writer.ensure_layout().unwrap();
        fs::write(dir.path().join("master/db.example.local.conf"), "x").unwrap();
        fs::write(dir.path().join("reverse/db.example.local"), "x").unwrap();
        fs::write(dir.path().join("slave/example.local.conf"), "x").unwrap();

        let removed = writer
            .remove_artifacts("example.local", ZoneType::Master)
            .unwrap();

        assert_eq!(removed.len(), 2);
        assert!(!dir.path().join("master/db.example.local.conf").exists());
        assert!(!dir.path().join("reverse/db.example.local").exists());
        assert!(dir.path().join("slave/example.local.conf").exists());
    }

    #[test]
    fn removing_slave_leaves_other_buckets_alone() {
        let dir = TempDir::new().unwrap();
        let writer = ConfigWriter::new(dir.path());
        writer.ensure_layout().unwrap();
        fs::write(dir.path().join("slave/example.local.conf"), "x").unwrap();
        fs::write(dir.path().join("reverse/db.example.local"), "x").unwrap();

        let removed = writer
            .remove_artifacts("example.local", ZoneType::Slave)
            .unwrap();

        assert_eq!(removed, vec![dir.path().join("slave/example.local.conf")]);
        assert!(dir.path().join("reverse/db.example.local").exists());
    }

    #[test]
    fn removing_missing_files_is_fine() {
        let dir = TempDir::new().unwrap();
        let writer = ConfigWriter::new(dir.path().join("never-created"));
        let removed = writer
            .remove_artifacts("example.local", ZoneType::Forward)
            .unwrap();
        assert!(removed.is_empty());
    }

    #[test]
    fn stale_removal_keeps_the_current_path() {
        let dir = TempDir::new().unwrap();
        let writer = ConfigWriter::new(dir.path());
        writer.ensure_layout().unwrap();
        fs::write(dir.path().join("forward/corp.example.conf"), "x").unwrap();

        let removed = writer
            .remove_stale(
                "corp.example",
                ZoneType::Forward,
                Some(Path::new("forward/corp.example.conf")),
            )
            .unwrap();

        assert!(removed.is_empty());
        assert!(dir.path().join("forward/corp.example.conf").exists());
    }

    #[test]
    fn unremovable_artifact_is_reported() {
        let dir = TempDir::new().unwrap();
        let writer = ConfigWriter::new(dir.path());
        writer.ensure_layout().unwrap();
        let blocker = dir.path().join("slave/example.local.conf");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let err = writer
            .remove_artifacts("example.local", ZoneType::Slave)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Remove { ref path, .. } if *path == blocker));
    }
}
