use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Write},
    path::Path,
};

/// Access to the files the kernel exposes for 1-Wire bus masters.
///
/// Handles returned by `open_*` are closed when dropped, so every open is scoped to
/// the caller's block.
pub trait SysfsIo {
    /// Handle for writing to a sysfs attribute.
    type Writer: Write;
    /// Handle for reading from a sysfs attribute.
    type Reader: Read;

    /// Open an existing file write-only.
    fn open_write(&self, path: &Path) -> io::Result<Self::Writer>;

    /// Open an existing file read-only.
    fn open_read(&self, path: &Path) -> io::Result<Self::Reader>;

    /// Names of the entries of a directory, in no particular order.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>>;
}

/// [SysfsIo] on the host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostIo;

impl SysfsIo for HostIo {
    type Writer = File;
    type Reader = File;

    fn open_write(&self, path: &Path) -> io::Result<File> {
        OpenOptions::new().write(true).open(path)
    }

    fn open_read(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            // Non UTF-8 names cannot be w1 entries.
            if let Ok(name) = entry?.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }
}
