use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used when genres are flattened into a single display cell
pub const GENRE_SEPARATOR: &str = ", ";

/// A single entry of the collection
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Movie {
    pub title: String,
    pub director: String,
    /// Release year. Range checks happen in the menu, never here.
    pub year: i32,
    pub genres: Vec<String>,
}

/// Tabular form of a movie: (title, director, year, joined genres)
pub type MovieFields<'a> = (&'a str, &'a str, i32, String);

impl Movie {
    pub fn new(
        title: impl Into<String>,
        director: impl Into<String>,
        year: i32,
        genres: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            director: director.into(),
            year,
            genres,
        }
    }

    pub fn joined_genres(&self) -> String {
        self.genres.join(GENRE_SEPARATOR)
    }

    pub fn as_fields(&self) -> MovieFields<'_> {
        (&self.title, &self.director, self.year, self.joined_genres())
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {}",
            self.title,
            self.director,
            self.year,
            self.joined_genres()
        )
    }
}

/// Field changes for an in-place update. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieUpdate {
    pub director: Option<String>,
    pub year: Option<i32>,
    pub genres: Option<Vec<String>>,
}

impl MovieUpdate {
    pub fn is_empty(&self) -> bool {
        self.director.is_none() && self.year.is_none() && self.genres.is_none()
    }

    pub(crate) fn apply(self, movie: &mut Movie) {
        if let Some(director) = self.director {
            movie.director = director;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(genres) = self.genres {
            movie.genres = genres;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heat() -> Movie {
        Movie::new("Heat", "Michael Mann", 1995, vec!["Crime".into(), "Drama".into()])
    }

    #[test]
    fn display_joins_genres() {
        assert_eq!(heat().to_string(), "Heat - Michael Mann - 1995 - Crime, Drama");
    }

    #[test]
    fn fields_keep_column_order() {
        let movie = heat();
        assert_eq!(
            movie.as_fields(),
            ("Heat", "Michael Mann", 1995, "Crime, Drama".to_string())
        );
    }

    #[test]
    fn display_with_no_genres_leaves_trailing_separator() {
        let movie = Movie::new("Untitled", "Nobody", 2001, vec![]);
        assert_eq!(movie.to_string(), "Untitled - Nobody - 2001 - ");
    }

    #[test]
    fn update_only_touches_present_fields() {
        let mut movie = heat();
        MovieUpdate {
            year: Some(0),
            ..Default::default()
        }
        .apply(&mut movie);

        assert_eq!(movie.year, 0);
        assert_eq!(movie.director, "Michael Mann");
        assert_eq!(movie.genres, vec!["Crime", "Drama"]);
    }

    #[test]
    fn rejects_unknown_fields() {
        let raw = r#"{"title":"A","director":"B","year":1,"genres":[],"rating":9}"#;
        assert!(serde_json::from_str::<Movie>(raw).is_err());
    }
}
