use std::path::{Path, PathBuf};

use crate::bind::writer::ConfigWriter;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Root of the zone tree; holds the master, slave, forward and reverse
    /// subdirectories.
    pub zones_root: PathBuf,
}

impl AppConfig {
    pub fn new(zones_root: impl Into<PathBuf>) -> Self {
        Self {
            zones_root: zones_root.into(),
        }
    }

    pub fn zones_root(&self) -> &Path {
        &self.zones_root
    }

    /// Writer bound to this configuration's zone tree.
    pub fn writer(&self) -> ConfigWriter {
        ConfigWriter::new(&self.zones_root)
    }
}
