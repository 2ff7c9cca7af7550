use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;
use crate::config::YearWindow;
use crate::model::{MovieFields, MovieUpdate};
use crate::parser::{self, InputError};
use crate::{LibraryError, Movie, MovieLibrary};

const EMPTY_COLL_MSG: &str = "\u{1f972} Empty collection. Add a movie!";
const NO_RESULTS_MSG: &str = "\u{1f972} I'm sorry, the search did not return any results.";
const HEADERS: [&str; 4] = ["Title", "Director", "Year", "Genres"];

/// Every entry of the numbered menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    AddMovie,
    UpdateMovie,
    DeleteMovie,
    ViewAllTitles,
    ViewAllMovies,
    SearchByTitle,
    SearchPartTitle,
    SearchByYear,
    SearchByGenre,
    MoviesBetweenYears,
    CountMovies,
    CountByDirector,
    OldestMovie,
    AverageYear,
    LongestTitle,
    CommonYear,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 17] = [
        MenuAction::AddMovie,
        MenuAction::UpdateMovie,
        MenuAction::DeleteMovie,
        MenuAction::ViewAllTitles,
        MenuAction::ViewAllMovies,
        MenuAction::SearchByTitle,
        MenuAction::SearchPartTitle,
        MenuAction::SearchByYear,
        MenuAction::SearchByGenre,
        MenuAction::MoviesBetweenYears,
        MenuAction::CountMovies,
        MenuAction::CountByDirector,
        MenuAction::OldestMovie,
        MenuAction::AverageYear,
        MenuAction::LongestTitle,
        MenuAction::CommonYear,
        MenuAction::Exit,
    ];

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::AddMovie => "\u{2795} Add New Movie",
            MenuAction::UpdateMovie => "\u{270f}\u{fe0f} Edit Movie Details",
            MenuAction::DeleteMovie => "\u{1f5d1}\u{fe0f} Delete Movie",
            MenuAction::ViewAllTitles => "\u{1f4dc} Show all Titles",
            MenuAction::ViewAllMovies => "\u{1f3a5} View Full Collection",
            MenuAction::SearchByTitle => "\u{1f50e} Search by Title",
            MenuAction::SearchPartTitle => "\u{1f575}\u{fe0f}\u{200d}\u{2642}\u{fe0f} Search by part of the title",
            MenuAction::SearchByYear => "\u{1f4c5} Search by Release Year",
            MenuAction::SearchByGenre => "\u{1f3f7}\u{fe0f} Search by Genre",
            MenuAction::MoviesBetweenYears => "\u{1f4c5} Find Movies Between Years",
            MenuAction::CountMovies => "\u{1f520} Total Number of Movies",
            MenuAction::CountByDirector => "\u{1f3ac} Total Number of Movies by director",
            MenuAction::OldestMovie => "\u{1f4fc} Oldest Movie Title",
            MenuAction::AverageYear => "\u{1f4ca} Average Release Year",
            MenuAction::LongestTitle => "\u{1f520} Longest Movie Title",
            MenuAction::CommonYear => "\u{1f4c8} Most Common Release Year",
            MenuAction::Exit => "\u{1f6aa} Exit",
        }
    }
}

/// Whether the loop keeps going after an action
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

#[derive(Error, Debug)]
enum ActionError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Error: the year {0} is not valid!")]
    InvalidYear(i32),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("input closed")]
    EndOfInput,
}

/// Interactive front end over a `MovieLibrary`.
///
/// Reads choices and field values from `input`, writes prompts and results to
/// `output`. The library is the only state; the menu itself holds none.
pub struct Menu<'a, R, W> {
    library: &'a mut MovieLibrary,
    input: R,
    output: W,
    years: YearWindow,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(library: &'a mut MovieLibrary, input: R, output: W, years: YearWindow) -> Self {
        Self { library, input, output, years }
    }

    /// Runs until the user picks Exit or the input is exhausted.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.show_menu()?;

            let line = match self.prompt("\nChoose an option: ") {
                Ok(line) => line,
                Err(ActionError::Io(e)) => return Err(e),
                Err(_) => return Ok(()),
            };

            let action = match parser::parse_choice(&line) {
                Ok(idx) => match MenuAction::from_index(idx) {
                    Some(action) => action,
                    None => {
                        writeln!(
                            self.output,
                            "Error: Please select a valid option (1 to {}).",
                            MenuAction::ALL.len()
                        )?;
                        continue;
                    }
                },
                Err(e) => {
                    writeln!(self.output, "{}", e)?;
                    continue;
                }
            };

            debug!(?action, "menu dispatch");
            writeln!(self.output, "- - - - - - - - - {} - - - - - - - - - ", action.label())?;

            match self.execute(action) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(ActionError::EndOfInput) => return Ok(()),
                Err(ActionError::Io(e)) => return Err(e),
                Err(e) => self.report(e)?,
            }
        }
    }

    fn show_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nMEN\u{d9}")?;
        for (i, action) in MenuAction::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, action.label())?;
        }
        Ok(())
    }

    fn report(&mut self, err: ActionError) -> io::Result<()> {
        match err {
            ActionError::Library(LibraryError::EmptyCollection) => writeln!(self.output, "{}", EMPTY_COLL_MSG),
            ActionError::Library(e @ LibraryError::RecordNotFound { .. }) => writeln!(self.output, "{}", e),
            ActionError::Library(e) => writeln!(self.output, "Unexpected error: {}", e),
            other => writeln!(self.output, "{}", other),
        }
    }

    fn execute(&mut self, action: MenuAction) -> Result<Flow, ActionError> {
        match action {
            MenuAction::AddMovie => self.add_movie()?,
            MenuAction::UpdateMovie => self.update_movie()?,
            MenuAction::DeleteMovie => self.delete_movie()?,
            MenuAction::ViewAllTitles => self.view_all_titles()?,
            MenuAction::ViewAllMovies => self.view_all_movies()?,
            MenuAction::SearchByTitle => self.search_by_title()?,
            MenuAction::SearchPartTitle => self.search_part_title()?,
            MenuAction::SearchByYear => self.search_by_year()?,
            MenuAction::SearchByGenre => self.search_by_genre()?,
            MenuAction::MoviesBetweenYears => self.movies_between_years()?,
            MenuAction::CountMovies => self.count_movies()?,
            MenuAction::CountByDirector => self.count_by_director()?,
            MenuAction::OldestMovie => {
                let title = self.library.oldest_title()?;
                writeln!(self.output, "{}", title)?;
            }
            MenuAction::AverageYear => {
                let average = self.library.average_year()?;
                writeln!(self.output, "{:?}", average)?;
            }
            MenuAction::LongestTitle => {
                let title = self.library.longest_title()?;
                writeln!(self.output, "{}", title)?;
            }
            MenuAction::CommonYear => {
                let year = self.library.most_common_year()?;
                writeln!(self.output, "{}", year)?;
            }
            MenuAction::Exit => {
                writeln!(self.output, "Goodbye!")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    // --- INPUT ---

    fn prompt(&mut self, label: &str) -> Result<String, ActionError> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ActionError::EndOfInput);
        }
        Ok(line.trim().to_string())
    }

    fn checked_year(&self, year: i32) -> Result<i32, ActionError> {
        if self.years.contains(year) {
            Ok(year)
        } else {
            Err(ActionError::InvalidYear(year))
        }
    }

    // --- ACTIONS ---

    fn add_movie(&mut self) -> Result<(), ActionError> {
        let title = parser::capitalize(&self.prompt("Title: ")?);
        let director = parser::capitalize(&self.prompt("Director: ")?);
        let year = parser::parse_year(&self.prompt("Release year: ")?)?;
        let genres = parser::parse_genres(&self.prompt("Genres (comma-separated): ")?);
        let year = self.checked_year(year)?;

        self.library.add(&title, &director, year, genres)?;
        writeln!(self.output, "\n\u{1f973} Movie added!")?;
        Ok(())
    }

    fn update_movie(&mut self) -> Result<(), ActionError> {
        let title = parser::capitalize(&self.prompt("Title of the movie to update: ")?);

        let director = parser::capitalize(&self.prompt("New director (press Enter to keep unchanged): ")?);
        let director = Some(director).filter(|d| !d.is_empty());

        let year = self.prompt("New release year (press Enter to keep unchanged): ")?;
        let year = if year.is_empty() {
            None
        } else {
            Some(self.checked_year(parser::parse_year(&year)?)?)
        };

        let genres = self.prompt("New genres (comma-separated, press Enter to keep unchanged): ")?;
        let genres = Some(genres).filter(|g| !g.is_empty()).map(|g| parser::parse_genres(&g));

        let movie = self.library.update(&title, MovieUpdate { director, year, genres })?;
        writeln!(self.output, "\u{270f}\u{fe0f} Movie successfully updated\n{}", movie)?;
        Ok(())
    }

    fn delete_movie(&mut self) -> Result<(), ActionError> {
        let title = self.prompt("Title of the movie to delete: ")?;
        let movie = self.library.remove(&title)?;
        writeln!(self.output, "\u{1f5d1}\u{fe0f} Movie successfully deleted!\n{}", movie)?;
        Ok(())
    }

    fn view_all_titles(&mut self) -> Result<(), ActionError> {
        let titles = self.library.titles();
        if titles.is_empty() {
            writeln!(self.output, "{}", EMPTY_COLL_MSG)?;
        }
        for title in titles {
            writeln!(self.output, "{}", title)?;
        }
        Ok(())
    }

    fn view_all_movies(&mut self) -> Result<(), ActionError> {
        let rows = self.library.rows();
        if rows.is_empty() {
            writeln!(self.output, "{}", EMPTY_COLL_MSG)?;
        } else {
            writeln!(self.output, "{}", render_table(&rows))?;
        }
        Ok(())
    }

    fn search_by_title(&mut self) -> Result<(), ActionError> {
        let title = self.prompt("Title of the movie to search: ")?;
        match self.library.get_by_title(&title) {
            Some(movie) => writeln!(self.output, "\n{}", movie)?,
            None => writeln!(self.output, "\u{1f972} Sorry movie not found")?,
        }
        Ok(())
    }

    fn search_part_title(&mut self) -> Result<(), ActionError> {
        let part = self.prompt("Part of the title of the movie to search: ")?;
        let found = self.library.get_by_title_substring(&part);
        write_results(&mut self.output, &found)
    }

    fn search_by_year(&mut self) -> Result<(), ActionError> {
        let year = parser::parse_year(&self.prompt("Movie release year: ")?)?;
        let year = self.checked_year(year)?;
        let found = self.library.get_by_year(year);
        write_results(&mut self.output, &found)
    }

    fn search_by_genre(&mut self) -> Result<(), ActionError> {
        let genre = self.prompt("Movies genre : ")?;
        let found = self.library.get_by_genre(&genre);
        write_results(&mut self.output, &found)
    }

    fn movies_between_years(&mut self) -> Result<(), ActionError> {
        let start = parser::parse_year(&self.prompt("Start year: ")?)?;
        let end = parser::parse_year(&self.prompt("End year: ")?)?;

        let titles = self.library.titles_between_years(start, end);
        if titles.is_empty() {
            writeln!(self.output, "{}", NO_RESULTS_MSG)?;
        }
        for title in titles {
            writeln!(self.output, "{}", title)?;
        }
        Ok(())
    }

    fn count_movies(&mut self) -> Result<(), ActionError> {
        match self.library.count() {
            0 => writeln!(self.output, "{}", EMPTY_COLL_MSG)?,
            n => writeln!(self.output, "{}", n)?,
        }
        Ok(())
    }

    fn count_by_director(&mut self) -> Result<(), ActionError> {
        let director = self.prompt("Director: ")?;
        match self.library.count_by_director(&director) {
            0 => writeln!(self.output, "{}", NO_RESULTS_MSG)?,
            n => writeln!(self.output, "{}", n)?,
        }
        Ok(())
    }
}

fn write_results<W: Write>(output: &mut W, found: &[&Movie]) -> Result<(), ActionError> {
    if found.is_empty() {
        writeln!(output, "{}", NO_RESULTS_MSG)?;
    } else {
        let rows: Vec<MovieFields<'_>> = found.iter().map(|m| m.as_fields()).collect();
        writeln!(output, "{}", render_table(&rows))?;
    }
    Ok(())
}

/// Plain-text table: header, dashed rule, one line per row.
///
/// Text columns are left-aligned and the year column right-aligned, two
/// spaces between columns.
pub fn render_table(rows: &[MovieFields<'_>]) -> String {
    let cells: Vec<[String; 4]> = rows
    .iter()
    .map(|(title, director, year, genres)| {
        [title.to_string(), director.to_string(), year.to_string(), genres.clone()]
    })
    .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |line: [&str; 4]| -> String {
        let parts: Vec<String> = line
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(col, (cell, width))| {
            if col == 2 {
                format!("{:>width$}", cell, width = width)
            } else {
                format!("{:<width$}", cell, width = width)
            }
        })
        .collect();
        parts.join("  ").trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(format_line(HEADERS));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(rule.join("  "));
    for row in &cells {
        lines.push(format_line([row[0].as_str(), row[1].as_str(), row[2].as_str(), row[3].as_str()]));
    }
    lines.join("\n")
}
