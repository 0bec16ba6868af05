use std::fs;
use std::path::{Path, PathBuf};

use vca_application::{ApplicationError, FileSource};
use vca_domain::ImageFile;
use walkdir::WalkDir;

/// Reads picked paths as-is. Directories expand to the regular files beneath
/// them, ordered by file name; nothing checks that a file is an image.
#[derive(Debug, Default)]
pub struct FsFileSource;

impl FileSource for FsFileSource {
    fn load(&self, paths: &[PathBuf]) -> Result<Vec<ImageFile>, ApplicationError> {
        let mut files = Vec::new();
        for path in paths {
            if !path.is_dir() {
                files.push(read_file(path)?);
                continue;
            }

            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
            {
                if entry.file_type().is_file() {
                    files.push(read_file(entry.path())?);
                }
            }
        }

        tracing::debug!(requested = paths.len(), loaded = files.len(), "files loaded");
        Ok(files)
    }
}

fn read_file(path: &Path) -> Result<ImageFile, ApplicationError> {
    let bytes = fs::read(path).map_err(|error| {
        ApplicationError::Io(format!("failed to read {}: {error}", path.display()))
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    Ok(ImageFile::new(name, bytes))
}
