use std::fs;
use std::io::Cursor;
use marquee::config::YearWindow;
use marquee::menu::Menu;
use marquee::MovieLibrary;
use tempfile::TempDir;

const SEED: &str = r#"[
    {"title": "Alpha", "director": "X", "year": 1990, "genres": ["Drama"]},
    {"title": "Beta", "director": "Y", "year": 2000, "genres": ["Comedy"]}
]"#;

/// Runs a scripted session and returns (stdout, library after the session).
fn session(seed: &str, script: &str) -> (String, MovieLibrary, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("movies.json");
    fs::write(&path, seed).unwrap();

    let mut library = MovieLibrary::open(&path).unwrap();
    let mut out = Vec::new();
    Menu::new(&mut library, Cursor::new(script), &mut out, YearWindow::new(1000, 2026))
        .run()
        .unwrap();

    (String::from_utf8(out).unwrap(), library, dir)
}

#[test]
fn lists_every_option() {
    let (out, _, _dir) = session(SEED, "17\n");

    assert!(out.contains("\nMEN\u{d9}\n1. \u{2795} Add New Movie"));
    assert!(out.contains("17. \u{1f6aa} Exit"));
    assert!(out.contains("Goodbye!"));
}

#[test]
fn add_normalizes_input_and_persists() {
    let (out, lib, _dir) = session(SEED, "1\n  the matrix \nlana WACHOWSKI\n1999\nsci-fi, action\n17\n");

    assert!(out.contains("Movie added!"));
    let added = lib.get_by_title("The matrix").unwrap();
    assert_eq!(added.director, "Lana wachowski");
    assert_eq!(added.genres, vec!["Sci-fi", "Action"]);

    let reloaded = MovieLibrary::open(lib.path()).unwrap();
    assert_eq!(reloaded.count(), 3);
}

#[test]
fn add_rejects_year_outside_window() {
    let (out, lib, _dir) = session(SEED, "1\nFuture\nSomeone\n2030\nDrama\n17\n");

    assert!(out.contains("Error: the year 2030 is not valid!"));
    assert_eq!(lib.count(), 2);
}

#[test]
fn add_rejects_non_numeric_year_before_genres() {
    let (out, lib, _dir) = session(SEED, "1\nOops\nSomeone\nlater\n17\n");

    assert!(out.contains("Error: Please enter a valid numeric value."));
    assert!(!out.contains("Genres (comma-separated)"));
    assert_eq!(lib.count(), 2);
}

#[test]
fn update_keeps_blank_fields() {
    let (out, lib, _dir) = session(SEED, "2\nalpha\n\n1995\n\n17\n");

    assert!(out.contains("Movie successfully updated\nAlpha - X - 1995 - Drama"));
    let alpha = lib.get_by_title("alpha").unwrap();
    assert_eq!(alpha.director, "X");
    assert_eq!(alpha.genres, vec!["Drama"]);
}

#[test]
fn update_of_missing_movie_reports_not_found() {
    let (out, _, _dir) = session(SEED, "2\nOmega\nZ\n\n\n17\n");

    assert!(out.contains("Movie was not found"));
}

#[test]
fn delete_prints_removed_movie() {
    let (out, lib, _dir) = session(SEED, "3\n beta \n17\n");

    assert!(out.contains("Movie successfully deleted!\nBeta - Y - 2000 - Comedy"));
    assert_eq!(lib.titles(), vec!["Alpha"]);
}

#[test]
fn bad_choices_keep_the_loop_alive() {
    let (out, _, _dir) = session(SEED, "abc\n0\n42\n11\n17\n");

    assert!(out.contains("Error: Please enter a valid numeric value."));
    assert!(out.contains("Error: Please enter a positive number!"));
    assert!(out.contains("Error: Please select a valid option (1 to 17)."));
    assert!(out.contains("\n2\n"));
}

#[test]
fn search_results_render_as_table() {
    let (out, _, _dir) = session(SEED, "9\ndrama\n7\nZeta\n17\n");

    assert!(out.contains("Title  Director  Year  Genres"));
    assert!(out.contains("Alpha  X         1990  Drama"));
    assert!(out.contains("I'm sorry, the search did not return any results."));
}

#[test]
fn aggregates_on_empty_collection_print_hint() {
    let (out, _, _dir) = session("[]", "13\n14\n15\n16\n11\n17\n");

    assert_eq!(out.matches("Empty collection. Add a movie!").count(), 5);
}

#[test]
fn aggregates_print_values() {
    let (out, _, _dir) = session(SEED, "14\n16\n");

    assert!(out.contains("1995.0"));
    assert!(out.contains("\n1990\n"));
}

#[test]
fn end_of_input_stops_cleanly() {
    let (out, lib, _dir) = session(SEED, "1\nHalf");

    assert!(out.contains("Director: "));
    assert_eq!(lib.count(), 2);
}
