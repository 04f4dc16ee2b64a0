//! Intcode program listings.
//!
//! A listing is a comma-separated list of integers, conventionally on one
//! line:
//! - whitespace and newlines around items are ignored
//! - a trailing comma is allowed
//! - lines starting with `#` are comments

use std::path::Path;
use std::io::Write;
use thiserror::Error;

/// Parse a program listing into a memory image.
pub fn parse_program(source: &str) -> Result<Vec<i64>, ProgramError> {
    let body: String = source
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    let mut items: Vec<&str> = body.split(',').map(str::trim).collect();
    if items.last().is_some_and(|last| last.is_empty()) {
        items.pop();
    }

    let image = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.parse::<i64>().map_err(|e| ProgramError::ParseError {
                item: i + 1,
                text: item.to_string(),
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if image.is_empty() {
        return Err(ProgramError::Empty);
    }
    Ok(image)
}

/// Load a program listing from disk.
pub fn load_program<P: AsRef<Path>>(path: P) -> Result<Vec<i64>, ProgramError> {
    let source = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ProgramError::IoError(e.to_string()))?;
    parse_program(&source)
}

/// Render a memory image as a listing.
pub fn format_program(image: &[i64]) -> String {
    image
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Save a memory image as a listing.
pub fn save_program<P: AsRef<Path>>(path: P, image: &[i64]) -> Result<(), ProgramError> {
    let mut file = std::fs::File::create(path.as_ref())
        .map_err(|e| ProgramError::IoError(e.to_string()))?;
    writeln!(file, "{}", format_program(image))
        .map_err(|e| ProgramError::IoError(e.to_string()))
}

/// Errors that can occur while reading a listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("item {item} ({text:?}) is not an integer: {message}")]
    ParseError { item: usize, text: String, message: String },

    #[error("program listing is empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_one_line() {
        assert_eq!(parse_program("1,0,0,0,99\n"), Ok(vec![1, 0, 0, 0, 99]));
    }

    #[test]
    fn test_parse_whitespace_and_comments() {
        let source = "# day 2 sample\n1, 9, 10, 3,\n 2,3,11,0,\n99,30,40,50,\n";
        assert_eq!(
            parse_program(source),
            Ok(vec![1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50])
        );
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(parse_program("109,-1,204,-34"), Ok(vec![109, -1, 204, -34]));
    }

    #[test]
    fn test_parse_error_reports_item() {
        match parse_program("1,2,x,4") {
            Err(ProgramError::ParseError { item, text, .. }) => {
                assert_eq!(item, 3);
                assert_eq!(text, "x");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(parse_program("1,,2"), Err(ProgramError::ParseError { item: 2, .. })));
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse_program(""), Err(ProgramError::Empty));
        assert_eq!(parse_program("# nothing\n"), Err(ProgramError::Empty));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_program(&[104, -1, 99]), "104,-1,99");
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("intcode-{}.txt", std::process::id()));
        save_program(&path, &[1101, 4, 5, 0, 99]).unwrap();
        assert_eq!(load_program(&path), Ok(vec![1101, 4, 5, 0, 99]));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_program("/nonexistent/intcode/listing.txt"),
            Err(ProgramError::IoError(_))
        ));
    }
}
