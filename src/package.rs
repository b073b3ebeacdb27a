//! An add-on package on disk and the configuration files it ships.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::conf::{read_conf, ConfFile};
use crate::diagnostics::ProbeError;
use crate::err_msg;

pub const PROPS_CONF: &str = "props.conf";
pub const TRANSFORMS_CONF: &str = "transforms.conf";
pub const EVENTTYPES_CONF: &str = "eventtypes.conf";

/// The `default/` configuration of an add-on, loaded once and shared
/// read-only by every fixture.
#[derive(Debug, Clone)]
pub struct AddonPackage {
    root: PathBuf,
    pub props: ConfFile,
    pub transforms: ConfFile,
    pub eventtypes: ConfFile,
}

impl AddonPackage {
    /// Loads `default/{props,transforms,eventtypes}.conf` under `root`. A file
    /// the package does not ship is treated as empty.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ProbeError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(err_msg!(Io, "Add-on package '{}' is not a directory", root.display())
                .with_help("point --splunk-app (or `splunk_app` in the config file) at the add-on root"));
        }

        let default_dir = root.join("default");
        let package = Self {
            props: load_optional(&default_dir, PROPS_CONF)?,
            transforms: load_optional(&default_dir, TRANSFORMS_CONF)?,
            eventtypes: load_optional(&default_dir, EVENTTYPES_CONF)?,
            root,
        };
        info!(
            root = %package.root.display(),
            props = package.props.len(),
            transforms = package.transforms.len(),
            eventtypes = package.eventtypes.len(),
            "loaded add-on package"
        );
        Ok(package)
    }

    /// Assembles a package from already-parsed files.
    pub fn from_parts(props: ConfFile, transforms: ConfFile, eventtypes: ConfFile) -> Self {
        Self {
            root: PathBuf::new(),
            props,
            transforms,
            eventtypes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Recursively lists every `.conf` file in the package.
    ///
    /// The returned list is sorted to keep output deterministic.
    pub fn conf_files(&self) -> Result<Vec<PathBuf>, ProbeError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry
                .map_err(|e| err_msg!(Io, "Failed to walk '{}'", self.root.display()).with_cause(e))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !is_conf_file(path) {
                continue;
            }
            files.push(path.to_path_buf());
        }
        files.sort();
        Ok(files)
    }
}

fn load_optional(dir: &Path, file: &str) -> Result<ConfFile, ProbeError> {
    let path = dir.join(file);
    if !path.is_file() {
        debug!(path = %path.display(), "configuration file not shipped, using empty");
        return Ok(ConfFile::new(file));
    }
    read_conf(&path)
}

fn is_conf_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "conf")
}
