use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use tracing::debug;
use crate::error::{LibraryError, Result};
use crate::model::Movie;

// Indentation of the on-disk document
const INDENT: &[u8] = b"    ";

/// The single JSON document backing a library.
///
/// Every read and write opens its own handle and drops it before returning.
#[derive(Debug, Clone)]
pub struct JsonStore {
    pub file_path: PathBuf,
}

impl JsonStore {
    pub fn new(path: &Path) -> Self {
        Self { file_path: path.to_path_buf() }
    }

    /// Reads the whole document, preserving document order.
    pub fn load(&self) -> Result<Vec<Movie>> {
        let file = File::open(&self.file_path).map_err(|source| LibraryError::FileAccess {
            path: self.file_path.clone(),
            source,
        })?;

        let movies: Vec<Movie> = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            // serde_json reports read failures as io-category errors
            if source.is_io() {
                LibraryError::FileAccess {
                    path: self.file_path.clone(),
                    source: source.into(),
                }
            } else {
                LibraryError::Deserialization {
                    path: self.file_path.clone(),
                    source,
                }
            }
        })?;

        debug!(path = %self.file_path.display(), count = movies.len(), "loaded movie document");
        Ok(movies)
    }

    /// Replaces the document with `movies`.
    ///
    /// The payload goes to a temporary file next to the target which is
    /// synced and then renamed over it, so readers only ever see a complete
    /// document. An existing document's permissions carry over to the new one.
    pub fn save(&self, movies: &[Movie]) -> Result<()> {
        self.write_atomically(movies).map_err(|source| LibraryError::Persist {
            path: self.file_path.clone(),
            source,
        })?;

        debug!(path = %self.file_path.display(), count = movies.len(), "rewrote movie document");
        Ok(())
    }

    fn write_atomically(&self, movies: &[Movie]) -> io::Result<()> {
        let parent = match self.file_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut tmp = NamedTempFile::new_in(&parent)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            let mut serializer =
                serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
            movies.serialize(&mut serializer)?;
            writer.flush()?;
        }
        if let Ok(meta) = fs::metadata(&self.file_path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.file_path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<Movie> {
        vec![
            Movie::new("Amélie", "Jean-Pierre Jeunet", 2001, vec!["Comedy".into(), "Romance".into()]),
            Movie::new("Ran", "Akira Kurosawa", 1985, vec!["Drama".into(), "War".into()]),
        ]
    }

    #[test]
    fn save_then_load_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(&dir.path().join("movies.json"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn document_layout_is_indented_and_unescaped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies.json");
        let store = JsonStore::new(&path);

        store.save(&sample()[..1]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert!(text.contains("Amélie"));
        assert!(text.starts_with("[\n    {\n        \"title\": \"Amélie\",\n        \"director\""));
        let title_at = text.find("\"title\"").unwrap();
        let director_at = text.find("\"director\"").unwrap();
        let year_at = text.find("\"year\"").unwrap();
        let genres_at = text.find("\"genres\"").unwrap();
        assert!(title_at < director_at && director_at < year_at && year_at < genres_at);
    }

    #[test]
    fn save_leaves_no_temporary_files() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(&dir.path().join("movies.json"));

        store.save(&sample()).unwrap();
        store.save(&[]).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(store.load().unwrap(), Vec::<Movie>::new());
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_keeps_document_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies.json");
        std::fs::write(&path, "[]").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        JsonStore::new(&path).save(&sample()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn missing_file_is_file_access_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(&dir.path().join("absent.json"));

        assert!(matches!(store.load(), Err(LibraryError::FileAccess { .. })));
    }

    #[test]
    fn malformed_content_is_deserialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies.json");
        std::fs::write(&path, "[{\"title\": \"Half").unwrap();

        let err = JsonStore::new(&path).load().unwrap_err();
        assert!(matches!(err, LibraryError::Deserialization { .. }));
    }

    #[test]
    fn save_into_missing_directory_is_persist_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(&dir.path().join("gone").join("movies.json"));

        assert!(matches!(store.save(&sample()), Err(LibraryError::Persist { .. })));
    }
}
