//! Wire format shared by the coordinator and its workers.
//!
//! Every call is a plain `GET`:
//!
//! - `/hello` registers one worker thread
//! - `/tile` returns an empty body or `"<index> <x0> <x1> <y0> <y1>"`
//! - `/done?t=<index>` reports a finished tile
//!
//! Anything else is answered with a 500 and an empty body.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TilefarmError};
use crate::tiles::{TileIndex, TileRect};

pub const HELLO_PATH: &str = "/hello";
pub const TILE_PATH: &str = "/tile";
pub const DONE_PATH: &str = "/done";

/// Query parameter carrying the tile id on [`DONE_PATH`].
pub const DONE_QUERY_KEY: &str = "t";

/// A tile handed to a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileAssignment {
    pub index: TileIndex,
    pub rect: TileRect,
}

impl fmt::Display for TileAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.index, self.rect.x0, self.rect.x1, self.rect.y0, self.rect.y1
        )
    }
}

impl FromStr for TileAssignment {
    type Err = TilefarmError;

    /// Parse a `/tile` response body.
    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<u32> = s
            .split_whitespace()
            .map(str::parse)
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| TilefarmError::malformed_assignment(s))?;

        match fields[..] {
            [index, x0, x1, y0, y1] => Ok(Self {
                index,
                rect: TileRect { x0, x1, y0, y1 },
            }),
            _ => Err(TilefarmError::malformed_assignment(s)),
        }
    }
}

/// Extract the value of `key` from a raw query string.
pub fn query_value<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_wire_format() {
        let assignment = TileAssignment {
            index: 7,
            rect: TileRect { x0: 96, x1: 100, y0: 32, y1: 64 },
        };
        assert_eq!(assignment.to_string(), "7 96 100 32 64");
        assert_eq!("7 96 100 32 64".parse::<TileAssignment>().unwrap(), assignment);
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        assert!("1 2 3 4".parse::<TileAssignment>().is_err());
        assert!("1 2 3 4 5 6".parse::<TileAssignment>().is_err());
        assert!("".parse::<TileAssignment>().is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = "DONE".parse::<TileAssignment>().unwrap_err();
        assert!(matches!(err, TilefarmError::MalformedAssignment { .. }));
        assert!("1 a 3 4 5".parse::<TileAssignment>().is_err());
    }

    #[test]
    fn test_query_value() {
        assert_eq!(query_value("t=5", "t"), Some("5"));
        assert_eq!(query_value("x=1&t=12", "t"), Some("12"));
        assert_eq!(query_value("t", "t"), Some(""));
        assert_eq!(query_value("tt=3", "t"), None);
        assert_eq!(query_value("", "t"), None);
    }
}
