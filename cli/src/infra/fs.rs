//! Filesystem infrastructure: implements the `LocalFs` port.

use std::io::Write;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use nix::fcntl::{AT_FDCWD, AtFlags};
use nix::unistd::{Gid, Uid};

use crate::application::ports::{LocalFs, ResolvedPath};

/// Matches the kernel's `MAXSYMLINKS`.
const MAX_LINK_HOPS: usize = 40;

/// Production filesystem implementation of `LocalFs`.
pub struct HostFs;

impl HostFs {
    /// Follow a symlinked target (e.g. a dotfile-managed `.bashrc`) so the
    /// link itself is not replaced by a regular file.
    fn write_target(path: &Path) -> PathBuf {
        match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
            }
            _ => path.to_path_buf(),
        }
    }
}

/// Canonical form of a path whose final component does not exist yet.
fn canonical_leaf(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => std::fs::canonicalize(parent)
            .map_or_else(|_| path.to_path_buf(), |dir| dir.join(name)),
        _ => path.to_path_buf(),
    }
}

impl LocalFs for HostFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_optional(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match std::fs::read(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading file {}", path.display())),
        }
    }

    fn write_atomic(&self, path: &Path, content: &[u8], mode: u32) -> Result<()> {
        let target = Self::write_target(path);
        let parent = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;

        let mode = match std::fs::metadata(&target) {
            Ok(meta) => meta.permissions().mode() & 0o7777,
            Err(_) => mode,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("creating temporary file in {}", parent.display()))?;
        tmp.write_all(content)
            .with_context(|| format!("writing {}", target.display()))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("syncing {}", target.display()))?;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(mode))
            .with_context(|| format!("setting permissions on {}", target.display()))?;
        tmp.persist(&target)
            .with_context(|| format!("replacing {}", target.display()))?;
        Ok(())
    }

    fn chown(&self, path: &Path, uid: u32, gid: u32) -> Result<()> {
        nix::unistd::fchownat(
            AT_FDCWD,
            path,
            Some(Uid::from_raw(uid)),
            Some(Gid::from_raw(gid)),
            AtFlags::AT_SYMLINK_NOFOLLOW,
        )
        .with_context(|| format!("changing owner of {} to {uid}:{gid}", path.display()))
    }

    fn resolve(&self, path: &Path) -> Result<ResolvedPath> {
        let mut current = path.to_path_buf();
        for _ in 0..MAX_LINK_HOPS {
            match std::fs::canonicalize(&current) {
                Ok(real) => {
                    let meta = std::fs::metadata(&real)
                        .with_context(|| format!("inspecting {}", real.display()))?;
                    return Ok(ResolvedPath {
                        path: real,
                        owner: Some(meta.uid()),
                    });
                }
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                    return Err(e).with_context(|| format!("resolving {}", path.display()));
                }
                Err(_) => {}
            }
            // Nothing at the end of the chain: either a dangling link to
            // follow by hand or a file that does not exist yet.
            match std::fs::read_link(&current) {
                Ok(dest) => {
                    current = match current.parent() {
                        Some(dir) => dir.join(dest),
                        None => dest,
                    };
                }
                Err(_) => {
                    return Ok(ResolvedPath {
                        path: canonical_leaf(&current),
                        owner: None,
                    });
                }
            }
        }
        bail!("too many levels of symbolic links at {}", path.display())
    }
}
