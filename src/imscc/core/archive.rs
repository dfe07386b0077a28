//! Archive access for cartridge packages.
//!
//! The cartridge layer only needs two things from the container: the list of
//! entry names and the bytes of one entry. [`Archive`] captures exactly that,
//! [`ZipPackage`] provides it for `.imscc` files and [`MemoryArchive`] for
//! entries already held in memory.

use crate::common::{Error, Result};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: usize = 16 * 1024 * 1024;

/// Random-access view over the named entries of a container.
pub trait Archive {
    /// Names of all file entries, directories excluded.
    fn entry_names(&self) -> Vec<String>;

    /// Read the full contents of an entry.
    ///
    /// Fails with [`Error::NotFound`] when no entry has that name.
    fn read_entry(&self, name: &str) -> Result<Vec<u8>>;

    /// Check whether an entry exists.
    fn contains(&self, name: &str) -> bool {
        self.entry_names().iter().any(|n| n == name)
    }

    /// Open an entry as an owned, seekable stream.
    fn open_entry(&self, name: &str) -> Result<EntryReader> {
        let data = self.read_entry(name)?;
        Ok(EntryReader::new(name, data))
    }
}

/// A cartridge package backed by a ZIP archive.
///
/// The underlying `zip::ZipArchive` needs `&mut` access to read an entry, so
/// it sits behind a lock; entry names are indexed once at open time.
pub struct ZipPackage<R> {
    archive: Mutex<zip::ZipArchive<R>>,
    names: Vec<String>,
}

impl ZipPackage<BufReader<File>> {
    /// Open a package from a file path.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the path does not exist and
    /// [`Error::Zip`] if the file is not a ZIP archive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
            _ => Error::Io(e),
        })?;
        Self::from_reader(BufReader::new(file))
    }
}

impl ZipPackage<Cursor<Vec<u8>>> {
    /// Create a package from owned bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }
}

impl<R: Read + Seek> ZipPackage<R> {
    /// Open a package from any `Read + Seek` source.
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        let names = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(String::from)
            .collect();

        Ok(Self {
            archive: Mutex::new(archive),
            names,
        })
    }

    /// Number of file entries in the package.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the package has no file entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<R: Read + Seek> Archive for ZipPackage<R> {
    fn entry_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn read_entry(&self, name: &str) -> Result<Vec<u8>> {
        let normalized = name.strip_prefix('/').unwrap_or(name);
        let mut archive = self.archive.lock();
        let mut file = match archive.by_name(normalized) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(Error::NotFound(normalized.to_string()));
            },
            Err(e) => return Err(e.into()),
        };

        let mut content = Vec::with_capacity(capacity_hint(file.size()));
        file.read_to_end(&mut content)?;
        Ok(content)
    }

    fn contains(&self, name: &str) -> bool {
        let normalized = name.strip_prefix('/').unwrap_or(name);
        self.names.iter().any(|n| n == normalized)
    }
}

/// Reservation for an entry whose header declares `declared` bytes. The
/// header is not trusted; reads grow past the hint as needed.
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared).unwrap_or(usize::MAX).min(MAX_PREALLOC)
}

/// Entries held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.entries.insert(name.into(), data.into());
    }

    /// Builder-style variant of [`MemoryArchive::insert`].
    pub fn with_entry(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(name, data);
        self
    }
}

impl Archive for MemoryArchive {
    fn entry_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn read_entry(&self, name: &str) -> Result<Vec<u8>> {
        let normalized = name.strip_prefix('/').unwrap_or(name);
        self.entries
            .get(normalized)
            .cloned()
            .ok_or_else(|| Error::NotFound(normalized.to_string()))
    }

    fn contains(&self, name: &str) -> bool {
        self.entries
            .contains_key(name.strip_prefix('/').unwrap_or(name))
    }
}

/// An archive entry opened as a stream.
///
/// The entry is decompressed up front, so the handle holds no borrow on the
/// archive and is closed by dropping it.
#[derive(Debug, Clone)]
pub struct EntryReader {
    name: String,
    cursor: Cursor<Vec<u8>>,
}

impl EntryReader {
    pub(crate) fn new(name: &str, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            cursor: Cursor::new(data),
        }
    }

    /// Full entry path inside the archive.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Final path component of the entry.
    pub fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Size of the entry in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    /// Consume the handle and return the entry bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

impl Read for EntryReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for EntryReader {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}

/// Join a manifest-relative href onto the directory holding the manifest.
///
/// `./` segments and leading slashes are dropped and backslashes from
/// Windows exporters are turned into forward slashes.
pub fn join_entry_path(base: &str, href: &str) -> String {
    let href = href.replace('\\', "/");
    let mut href = href.trim_start_matches('/');
    while let Some(rest) = href.strip_prefix("./") {
        href = rest;
    }

    if base.is_empty() {
        href.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), href)
    }
}

/// Candidate entry names for a resource href, most literal first.
///
/// Hrefs are URI references, so `My%20File.pdf` may be stored as
/// `My File.pdf`; both spellings are tried, relative to the manifest
/// directory and then to the archive root.
pub fn entry_candidates(base: &str, href: &str) -> Vec<String> {
    let mut candidates = vec![join_entry_path(base, href)];
    if let Ok(decoded) = urlencoding::decode(href)
        && decoded != href
    {
        candidates.push(join_entry_path(base, &decoded));
    }
    if !base.is_empty() {
        candidates.push(join_entry_path("", href));
    }
    candidates.dedup();
    candidates
}
