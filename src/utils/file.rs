use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use walkdir::WalkDir;

use crate::error::ConvertError;

/// Recursively list the files under `dir` whose name ends in `.<extension>`.
///
/// The match is case-sensitive. Results are sorted by path.
pub fn discover_inputs(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ConvertError> {
    let suffix = format!(".{}", extension);
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .map(|name| name.len() > suffix.len() && name.ends_with(&suffix))
            .unwrap_or(false);
        if matches {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Path of the artifact produced for `input`: its stem with `extension`,
/// placed directly in `output_dir`.
pub fn output_path_for(input: &Path, output_dir: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_default();
    let mut name = stem;
    name.push(".");
    name.push(extension);
    output_dir.join(name)
}

/// Write `path` through a temporary file in the same directory.
///
/// The target only appears once `write` has succeeded and the data is
/// flushed; on any error the temporary file is removed and an existing
/// target is left untouched. On Unix the file gets mode `0666` masked by
/// the umask, the same as a file made with `File::create`.
pub fn write_atomically<F, E>(path: &Path, write: F) -> Result<(), E>
where
    F: FnOnce(&mut dyn Write) -> Result<(), E>,
    E: From<ConvertError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let temp = builder
        .tempfile_in(dir)
        .map_err(|e| ConvertError::io(dir, e))?;

    let mut writer = BufWriter::new(temp);
    write(&mut writer)?;
    let temp = writer
        .into_inner()
        .map_err(|e| ConvertError::io(path, e.into_error()))?;

    temp.persist(path)
        .map_err(|e| ConvertError::io(path, e.error))?;
    Ok(())
}
