//! Catalog persistence as a pretty-printed JSON object keyed by name.
//!
//! Writes go to `<path>.part` first and are renamed into place, so a failed
//! run never leaves a truncated catalog behind.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::{Entry, HashMap};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{Catalog, CatalogEntry};
use crate::report::Verbosity;

/// Suffix of the temporary file written before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("catalog not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("malformed catalog {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("encode catalog {}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_error<'a>(
    action: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> StoreError + 'a {
    move |source| StoreError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(TEMP_SUFFIX);
    PathBuf::from(os)
}

/// Serialize the catalog with sorted keys and 4-space indentation.
pub fn to_writer<W: Write>(catalog: &Catalog, writer: W) -> serde_json::Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    catalog.serialize(&mut serializer)
}

/// Write the whole catalog to `path`, replacing any previous file.
pub fn save(catalog: &Catalog, path: &Path, verbosity: Verbosity) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error("create dir", parent))?;
    }

    let temp = temp_path(path);
    let file = File::create(&temp).map_err(io_error("create", &temp))?;
    let mut writer = BufWriter::new(file);
    to_writer(catalog, &mut writer).map_err(|source| StoreError::Encode {
        path: temp.clone(),
        source,
    })?;
    writer.flush().map_err(io_error("write", &temp))?;
    drop(writer);
    fs::rename(&temp, path).map_err(io_error("rename", path))?;

    tracing::info!(path = %path.display(), entries = catalog.len(), "catalog written");
    verbosity.detail(format_args!(
        "finished writing objects to file: {}",
        path.display()
    ));
    Ok(())
}

/// Entries of a catalog file in the order they appear in it. A repeated key
/// keeps the position of its first occurrence and the value of its last.
struct FileOrder(Vec<CatalogEntry>);

impl<'de> Deserialize<'de> for FileOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = FileOrder;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping names to catalog entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FileOrder, A::Error> {
                let mut entries: Vec<CatalogEntry> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                let mut seen: HashMap<String, usize> = HashMap::new();
                while let Some((name, entry)) = map.next_entry::<String, CatalogEntry>()? {
                    match seen.entry(name) {
                        Entry::Occupied(slot) => entries[*slot.get()] = entry,
                        Entry::Vacant(slot) => {
                            slot.insert(entries.len());
                            entries.push(entry);
                        }
                    }
                }
                Ok(FileOrder(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Read all entries from `path`, in file order.
///
/// A missing file is [`StoreError::NotFound`] so callers can treat "never
/// fetched" differently from a broken catalog.
pub fn load(path: &Path) -> Result<Vec<CatalogEntry>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(io_error("read", path)(e)),
    };
    let FileOrder(entries) =
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "catalog loaded");
    Ok(entries)
}
