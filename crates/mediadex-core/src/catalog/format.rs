//! Turn walked locations into catalog entries.

use super::{Catalog, CatalogEntry};
use crate::report::Verbosity;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Nothing left after removing the base URL.
    #[error("no path below base URL: {location}")]
    Empty { location: String },
    #[error("{location} is not under base URL {base}")]
    OutsideBase { base: String, location: String },
    /// The last segment has no `.`, so no format can be derived.
    #[error("file name without extension: {location}")]
    MissingExtension { location: String },
}

/// Decompose `location` (which must start with `base`) into a catalog entry.
///
/// `https://example.org/2020/room/talk.mp4` under `https://example.org/`
/// becomes name `talk.mp4`, group `2020`, format `mp4`.
pub fn format_entry(base: &str, location: &str) -> Result<CatalogEntry, FormatError> {
    let rest = location
        .strip_prefix(base)
        .ok_or_else(|| FormatError::OutsideBase {
            base: base.to_string(),
            location: location.to_string(),
        })?;
    if rest.is_empty() {
        return Err(FormatError::Empty {
            location: location.to_string(),
        });
    }

    let group = rest.split('/').next().unwrap_or(rest);
    let name = rest.rsplit('/').next().unwrap_or(rest);
    let Some((_, format)) = name.rsplit_once('.') else {
        return Err(FormatError::MissingExtension {
            location: location.to_string(),
        });
    };

    Ok(CatalogEntry {
        format: format.to_string(),
        name: name.to_string(),
        url: location.to_string(),
        group: group.to_string(),
    })
}

/// Format every location into a catalog.
///
/// Locations with no path below `base` are warned about and skipped; any other
/// malformed location fails the whole run. Duplicate names keep the last one.
pub fn format_locations<S: AsRef<str>>(
    base: &str,
    locations: &[S],
    verbosity: Verbosity,
) -> Result<Catalog, FormatError> {
    verbosity.detail("formatting results...");
    let mut catalog = Catalog::new();
    for location in locations {
        match format_entry(base, location.as_ref()) {
            Ok(entry) => {
                if let Some(previous) = catalog.insert(entry) {
                    tracing::debug!(
                        name = %previous.name,
                        replaced = %previous.url,
                        "duplicate name, keeping later entry"
                    );
                }
            }
            Err(FormatError::Empty { location }) => {
                tracing::warn!(%location, "unexpected location, skipped");
                verbosity.warn(format_args!("Unexpected: {location}"));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(catalog)
}
