//! Byte loaders backed by the filesystem

pub mod fs_loader;

pub use fs_loader::FsLoader;
