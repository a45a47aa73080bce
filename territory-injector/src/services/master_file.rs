//! Master file operations: backup copy and derived output path

use std::path::{Path, PathBuf};
use territory_common::{Error, Result};
use tracing::info;

/// Master file name without its extension
pub fn master_base_name(master: &Path) -> Result<String> {
    master
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::InvalidInput(format!("Master path has no file name: {}", master.display()))
        })
}

/// `<backup_dir>/<base>_backup.xml`
pub fn backup_path_for(master: &Path, backup_dir: &Path) -> Result<PathBuf> {
    Ok(backup_dir.join(format!("{}_backup.xml", master_base_name(master)?)))
}

/// `<output_dir>/<base>_injected.xml`
pub fn output_path_for(master: &Path, output_dir: &Path) -> Result<PathBuf> {
    Ok(output_dir.join(format!("{}_injected.xml", master_base_name(master)?)))
}

/// Copy the master byte for byte into the backup directory
///
/// A previous backup of the same master is overwritten.
pub fn backup_master(master: &Path, backup_dir: &Path) -> Result<PathBuf> {
    let target = backup_path_for(master, backup_dir)?;
    std::fs::create_dir_all(backup_dir)?;
    std::fs::copy(master, &target)?;
    info!("Backup created: {}", target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_derived_paths() {
        let master = Path::new("ce/cfgmapgroup.xml");
        assert_eq!(
            output_path_for(master, Path::new("output")).unwrap(),
            PathBuf::from("output/cfgmapgroup_injected.xml")
        );
        assert_eq!(
            backup_path_for(master, Path::new("backup")).unwrap(),
            PathBuf::from("backup/cfgmapgroup_backup.xml")
        );
    }

    #[test]
    fn test_base_name_requires_file_name() {
        assert!(master_base_name(Path::new("/")).is_err());
        assert_eq!(master_base_name(Path::new("a/map.v2.xml")).unwrap(), "map.v2");
    }

    #[test]
    fn test_backup_is_exact_copy_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let master = temp_dir.path().join("map.xml");
        let backup_dir = temp_dir.path().join("backup");
        let bytes = b"<?xml version='1.0'?>\r\n<map>\t<x a=\"1\"/></map>";
        std::fs::write(&master, bytes).unwrap();

        let first = backup_master(&master, &backup_dir).unwrap();
        assert_eq!(std::fs::read(&first).unwrap(), bytes);

        std::fs::write(&master, b"<map/>").unwrap();
        let second = backup_master(&master, &backup_dir).unwrap();
        assert_eq!(first, second);
        assert_eq!(std::fs::read(&second).unwrap(), b"<map/>");
    }
}
