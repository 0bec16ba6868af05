mod loader;

pub use loader::FsFileSource;
