pub mod config;
pub mod error;
pub mod menu;
pub mod model;
pub mod parser;
pub mod storage;

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use crate::storage::JsonStore;

pub use crate::error::{LibraryError, Result};
pub use crate::model::{Movie, MovieFields, MovieUpdate};

/// A movie collection kept in memory and mirrored to a JSON document.
///
/// Titles act as a lookup key: matching is case-insensitive against the
/// trimmed query, and the first match in document order wins. Nothing stops
/// two entries from sharing a title, in which case only the first one is
/// reachable through `get_by_title`, `remove` and `update`.
pub struct MovieLibrary {
    store: JsonStore,
    movies: Vec<Movie>,
}

impl fmt::Debug for MovieLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovieLibrary")
        .field("path", &self.store.file_path)
        .field("count", &self.movies.len())
        .finish()
    }
}

impl MovieLibrary {
    /// Loads the document at `path`. The file must already exist.
    ///
    /// Symlinks are resolved up front so rewrites land on the target file.
    pub fn open(path: &Path) -> Result<Self> {
        let resolved = fs::canonicalize(path).map_err(|source| LibraryError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let store = JsonStore::new(&resolved);
        let movies = store.load()?;
        info!(path = %path.display(), count = movies.len(), "opened movie library");
        Ok(Self { store, movies })
    }

    pub fn path(&self) -> &Path {
        &self.store.file_path
    }

    // --- MUTATIONS ---
    // Each one rewrites the document exactly once. A failed rewrite undoes
    // the in-memory change before the error is returned.

    pub fn add(&mut self, title: &str, director: &str, year: i32, genres: Vec<String>) -> Result<()> {
        self.movies.push(Movie::new(title, director, year, genres));

        if let Err(e) = self.store.save(&self.movies) {
            self.movies.pop();
            warn!(title, "add rolled back: {}", e);
            return Err(e);
        }

        info!(title, "movie added");
        Ok(())
    }

    pub fn remove(&mut self, title: &str) -> Result<Movie> {
        let idx = self.position(title).ok_or_else(|| not_found(title))?;
        let removed = self.movies.remove(idx);

        if let Err(e) = self.store.save(&self.movies) {
            self.movies.insert(idx, removed);
            warn!(title, "remove rolled back: {}", e);
            return Err(e);
        }

        info!(title = %removed.title, "movie removed");
        Ok(removed)
    }

    /// Applies `changes` to the first title match. An update carrying no
    /// changes still requires a match but leaves the document untouched.
    pub fn update(&mut self, title: &str, changes: MovieUpdate) -> Result<&Movie> {
        let idx = self.position(title).ok_or_else(|| not_found(title))?;
        if changes.is_empty() {
            return Ok(&self.movies[idx]);
        }

        let previous = self.movies[idx].clone();
        changes.apply(&mut self.movies[idx]);

        if let Err(e) = self.store.save(&self.movies) {
            self.movies[idx] = previous;
            warn!(title, "update rolled back: {}", e);
            return Err(e);
        }

        info!(title = %self.movies[idx].title, "movie updated");
        Ok(&self.movies[idx])
    }

    // --- LOOKUPS ---

    /// Exact-title lookup. Absence is `None` here, while `remove` and
    /// `update` report it as `RecordNotFound`.
    pub fn get_by_title(&self, title: &str) -> Option<&Movie> {
        self.position(title).map(|idx| &self.movies[idx])
    }

    /// Case-sensitive containment on the trimmed substring.
    pub fn get_by_title_substring(&self, substring: &str) -> Vec<&Movie> {
        let needle = substring.trim();
        self.movies.iter().filter(|m| m.title.contains(needle)).collect()
    }

    pub fn get_by_year(&self, year: i32) -> Vec<&Movie> {
        self.movies.iter().filter(|m| m.year == year).collect()
    }

    /// A movie is returned once per matching genre, so duplicated genre tags
    /// yield duplicated rows.
    pub fn get_by_genre(&self, genre: &str) -> Vec<&Movie> {
        let wanted = genre.trim().to_lowercase();
        self.movies
        .iter()
        .flat_map(|m| {
            m.genres
            .iter()
            .filter(|g| g.to_lowercase() == wanted)
            .map(move |_| m)
        })
        .collect()
    }

    /// Titles with `start <= year <= end`.
    pub fn titles_between_years(&self, start: i32, end: i32) -> Vec<&str> {
        self.movies
        .iter()
        .filter(|m| (start..=end).contains(&m.year))
        .map(|m| m.title.as_str())
        .collect()
    }

    pub fn count_by_director(&self, director: &str) -> usize {
        let wanted = director.trim().to_lowercase();
        self.movies.iter().filter(|m| m.director.to_lowercase() == wanted).count()
    }

    pub fn count(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.movies.iter().map(|m| m.title.as_str()).collect()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn rows(&self) -> Vec<MovieFields<'_>> {
        self.movies.iter().map(Movie::as_fields).collect()
    }

    // --- AGGREGATES ---

    /// Title of the earliest movie; the first one wins on equal years.
    pub fn oldest_title(&self) -> Result<&str> {
        self.movies
        .iter()
        .min_by_key(|m| m.year)
        .map(|m| m.title.as_str())
        .ok_or(LibraryError::EmptyCollection)
    }

    /// Mean release year rounded to two decimals, exact halves to even.
    pub fn average_year(&self) -> Result<f64> {
        if self.movies.is_empty() {
            return Err(LibraryError::EmptyCollection);
        }
        let sum: i64 = self.movies.iter().map(|m| i64::from(m.year)).sum();
        let mean = sum as f64 / self.movies.len() as f64;
        // Fixed-precision formatting rounds the exact binary value, ties to even
        Ok(format!("{:.2}", mean).parse().unwrap_or(mean))
    }

    /// Longest title by character count; the first one wins on ties.
    pub fn longest_title(&self) -> Result<&str> {
        let mut best: Option<(&str, usize)> = None;
        for movie in &self.movies {
            let len = movie.title.chars().count();
            match best {
                Some((_, best_len)) if best_len >= len => {}
                _ => best = Some((movie.title.as_str(), len)),
            }
        }
        best.map(|(title, _)| title).ok_or(LibraryError::EmptyCollection)
    }

    /// Most frequent release year. Ties go to the year seen first in
    /// document order.
    pub fn most_common_year(&self) -> Result<i32> {
        // year -> (index of first occurrence, occurrences)
        let mut tally: HashMap<i32, (usize, usize)> = HashMap::new();
        for (idx, movie) in self.movies.iter().enumerate() {
            tally.entry(movie.year).or_insert((idx, 0)).1 += 1;
        }

        tally
        .into_iter()
        .max_by_key(|&(_, (first, n))| (n, Reverse(first)))
        .map(|(year, _)| year)
        .ok_or(LibraryError::EmptyCollection)
    }

    fn position(&self, title: &str) -> Option<usize> {
        let wanted = title.trim().to_lowercase();
        self.movies.iter().position(|m| m.title.to_lowercase() == wanted)
    }
}

fn not_found(title: &str) -> LibraryError {
    LibraryError::RecordNotFound { title: title.trim().to_string() }
}
