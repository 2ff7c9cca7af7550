use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{delimited, pair},
    IResult,
};
use thiserror::Error;

/// Rejected free-text input from the menu prompts
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("Error: Please enter a valid numeric value.")]
    NotANumber,

    #[error("Error: Please enter a positive number!")]
    NotPositive,
}

// --- BASIC PARSERS ---

fn parse_i64(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(alt((char('-'), char('+')))), digit1)), |s: &str| s.parse::<i64>())(input)
}

fn parse_field(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c != ',')(input)
}

// --- HELPERS ---
fn ws<'a, F, O, E: nom::error::ParseError<&'a str>>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where F: FnMut(&'a str) -> IResult<&'a str, O, E> {
    delimited(multispace0, inner, multispace0)
}

fn integer(input: &str) -> Result<i64, InputError> {
    all_consuming(ws(parse_i64))(input)
    .map(|(_, n)| n)
    .map_err(|_| InputError::NotANumber)
}

// --- PUBLIC ENTRY POINTS ---

/// Parses a 1-based menu selection into a 0-based index.
///
/// Range checking against the menu length is left to the caller.
pub fn parse_choice(input: &str) -> Result<usize, InputError> {
    let n = integer(input)?;
    if n < 1 {
        return Err(InputError::NotPositive);
    }
    usize::try_from(n - 1).map_err(|_| InputError::NotANumber)
}

pub fn parse_year(input: &str) -> Result<i32, InputError> {
    let n = integer(input)?;
    i32::try_from(n).map_err(|_| InputError::NotANumber)
}

/// Splits a comma-separated genre list, trimming and capitalizing every entry.
///
/// Empty entries are kept, mirroring what the user typed.
pub fn parse_genres(input: &str) -> Vec<String> {
    // separated_list1 over a parser that accepts "" cannot fail
    let parsed: IResult<&str, Vec<&str>> = separated_list1(char(','), parse_field)(input);
    match parsed {
        Ok((_, fields)) => fields.into_iter().map(capitalize).collect(),
        Err(_) => vec![capitalize(input)],
    }
}

/// Trims, then upper-cases the first character and lower-cases the rest.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
