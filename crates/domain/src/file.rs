use std::fmt::{Debug, Formatter};

use crate::DomainError;

#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Debug for ImageFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Ordered set of user-picked files. A new pick replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<ImageFile>,
}

impl FileSelection {
    pub fn new(files: Vec<ImageFile>) -> Self {
        Self { files }
    }

    pub fn replace(&mut self, files: Vec<ImageFile>) {
        self.files = files;
    }

    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    pub fn into_files(self) -> Vec<ImageFile> {
        self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn display_names(&self) -> String {
        self.files
            .iter()
            .map(ImageFile::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonPair {
    pub before: ImageFile,
    pub after: ImageFile,
}

impl ComparisonPair {
    pub const REQUIRED_FILES: usize = 2;

    /// Index 0 is the before image and index 1 the after image; anything past
    /// index 1 is left out of the pair.
    pub fn from_selection(selection: &FileSelection) -> Result<Self, DomainError> {
        match selection.files() {
            [before, after, ..] => Ok(Self {
                before: before.clone(),
                after: after.clone(),
            }),
            files => Err(DomainError::NotEnoughFiles {
                required: Self::REQUIRED_FILES,
                actual: files.len(),
            }),
        }
    }
}
