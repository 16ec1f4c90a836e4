//! City description parser
//!
//! The input is a stream of whitespace-separated tokens:
//!
//! ```text
//! <districts> <streets> <taverns>
//! <name> <kind> <start_x> <start_y> <houses> <spacing>   (one per street)
//! <name> <kind>, <house_index>                           (one per tavern)
//! ```
//!
//! A `Road` runs along the Y axis, every other kind (normally `Avenue`) along
//! the X axis. House ids are assigned in input order starting at 0.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{CaveError, Result};
use crate::model::{House, StreetId, Streets};

/// Direction a street runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreetKind {
    Road,
    Avenue,
}

impl StreetKind {
    fn from_token(token: &str) -> Self {
        match token {
            "Road" => Self::Road,
            "Avenue" => Self::Avenue,
            other => {
                tracing::warn!("Unknown street kind '{}', treating it as an avenue", other);
                Self::Avenue
            }
        }
    }

    /// Coordinates of the house `offset` units from the street start
    fn position(self, start_x: i64, start_y: i64, offset: i64) -> Option<(i64, i64)> {
        match self {
            Self::Road => Some((start_x, start_y.checked_add(offset)?)),
            Self::Avenue => Some((start_x.checked_add(offset)?, start_y)),
        }
    }
}

/// A parsed city, before deduplication.
#[derive(Debug, Clone)]
pub struct City {
    /// Number of districts to form
    pub target_districts: usize,
    pub streets: Streets,
    /// Houses generated over all streets, duplicates included
    pub house_count: usize,
    /// Houses upgraded to taverns, in record order
    pub taverns: Vec<House>,
}

/// Parse a city description.
///
/// Tavern records pointing at an unknown street or house index are skipped.
pub fn parse_city(input: &str) -> Result<City> {
    let mut tokens = Tokens::new(input);

    let target_districts: usize = tokens.parse("district count")?;
    let street_count: usize = tokens.parse("street count")?;
    let tavern_count: usize = tokens.parse("tavern count")?;

    let mut streets = Streets::new();
    let mut next_id = 0;

    for _ in 0..street_count {
        let line = tokens.line();
        let name = tokens.word("street name")?;
        let kind_token = tokens.word("street kind")?;
        let start_x: i64 = tokens.parse("street start x")?;
        let start_y: i64 = tokens.parse("street start y")?;
        let count: usize = tokens.parse("house count")?;
        let spacing: i64 = tokens.parse("house spacing")?;

        let id: StreetId = format!("{name}{kind_token}");
        if streets.contains_key(&id) {
            return Err(CaveError::malformed(line, format!("duplicate street '{id}'")));
        }

        let kind = StreetKind::from_token(kind_token);
        let mut houses = BTreeMap::new();
        for index in 0..count {
            let (x, y) = i64::try_from(index)
                .ok()
                .and_then(|i| spacing.checked_mul(i))
                .and_then(|offset| kind.position(start_x, start_y, offset))
                .ok_or_else(|| {
                    CaveError::malformed(line, format!("house {index} of '{id}' is off the grid"))
                })?;
            houses.insert(index, House::new(next_id, x, y));
            next_id += 1;
        }

        tracing::trace!("Street {} with {} houses", id, count);
        streets.insert(id, houses);
    }

    let mut taverns = Vec::with_capacity(tavern_count);

    for _ in 0..tavern_count {
        let line = tokens.line();
        let name = tokens.word("tavern street name")?;
        let kind_token = tokens.word("tavern street kind")?;
        let index: i64 = tokens.parse("tavern house index")?;

        let id = format!("{name}{}", kind_token.trim_end_matches(','));
        let house = usize::try_from(index)
            .ok()
            .and_then(|index| streets.get_mut(&id)?.get_mut(&index));

        match house {
            Some(house) => {
                house.mark_tavern();
                taverns.push(house.clone());
            }
            None => {
                tracing::warn!(
                    "Line {}: no house {} on street '{}', tavern ignored",
                    line,
                    index,
                    id
                );
            }
        }
    }

    tracing::debug!(
        "Parsed {} streets, {} houses, {} taverns, target {} districts",
        streets.len(),
        next_id,
        taverns.len(),
        target_districts
    );

    Ok(City {
        target_districts,
        streets,
        house_count: next_id,
        taverns,
    })
}

/// Token cursor that remembers source lines for error messages
struct Tokens<'a> {
    tokens: Vec<(usize, &'a str)>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        let tokens = input
            .lines()
            .enumerate()
            .flat_map(|(i, line)| line.split_whitespace().map(move |token| (i + 1, token)))
            .collect();
        Self {
            tokens,
            position: 0,
        }
    }

    /// Line of the next token, or of the last one at end of input
    fn line(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(1, |(line, _)| *line)
    }

    fn word(&mut self, what: &str) -> Result<&'a str> {
        match self.tokens.get(self.position) {
            Some(&(_, token)) => {
                self.position += 1;
                Ok(token)
            }
            None => Err(CaveError::malformed(
                self.line(),
                format!("unexpected end of input, expected {what}"),
            )),
        }
    }

    fn parse<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let line = self.line();
        let token = self.word(what)?;
        token.parse().map_err(|_| {
            CaveError::malformed(line, format!("expected {what}, got '{token}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
2 2 1
Main Road 0 0 3 2
First Avenue -2 2 4 2
Main Road, 1
";

    fn coords(city: &City, street: &str) -> Vec<(i64, i64)> {
        city.streets[street]
            .values()
            .map(|h| (h.x(), h.y()))
            .collect()
    }

    #[test]
    fn test_parse_sample() {
        let city = parse_city(SAMPLE).unwrap();

        assert_eq!(city.target_districts, 2);
        assert_eq!(city.house_count, 7);
        assert_eq!(city.streets.len(), 2);
        assert_eq!(coords(&city, "MainRoad"), vec![(0, 0), (0, 2), (0, 4)]);
        assert_eq!(
            coords(&city, "FirstAvenue"),
            vec![(-2, 2), (0, 2), (2, 2), (4, 2)]
        );

        let ids: Vec<usize> = city.streets["FirstAvenue"].values().map(House::id).collect();
        assert_eq!(ids, vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_parse_marks_tavern() {
        let city = parse_city(SAMPLE).unwrap();

        assert!(city.streets["MainRoad"][&1].is_tavern());
        assert!(!city.streets["MainRoad"][&0].is_tavern());
        assert_eq!(city.taverns.len(), 1);
        assert_eq!(city.taverns[0].id(), 1);
    }

    #[test]
    fn test_unknown_tavern_is_ignored() {
        let input = "1 1 3\nMain Road 0 0 2 1\nMain Road, 5\nSide Road, 0\nMain Road, -1\n";
        let city = parse_city(input).unwrap();

        assert!(city.taverns.is_empty());
        assert!(city.streets["MainRoad"].values().all(|h| !h.is_tavern()));
    }

    #[test]
    fn test_tavern_without_comma() {
        let input = "1 1 1\nMain Avenue 0 0 2 1\nMain Avenue 1\n";
        let city = parse_city(input).unwrap();

        assert_eq!(city.taverns.len(), 1);
        assert_eq!((city.taverns[0].x(), city.taverns[0].y()), (1, 0));
    }

    #[test]
    fn test_unknown_kind_runs_along_x() {
        let input = "1 1 0\nHigh Street 1 1 3 5\n";
        let city = parse_city(input).unwrap();

        assert_eq!(coords(&city, "HighStreet"), vec![(1, 1), (6, 1), (11, 1)]);
    }

    #[test]
    fn test_truncated_input() {
        let err = parse_city("2 1 0\nMain Road 0 0\n").unwrap_err();
        match err {
            CaveError::MalformedInput { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("house count"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_token() {
        let err = parse_city("two 1 0\n").unwrap_err();
        match err {
            CaveError::MalformedInput { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("'two'"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_street_rejected() {
        let input = "1 2 0\nMain Road 0 0 1 1\nMain Road 5 5 1 1\n";
        let err = parse_city(input).unwrap_err();
        assert!(matches!(err, CaveError::MalformedInput { line: 3, .. }));
    }

    #[test]
    fn test_empty_input() {
        let err = parse_city("").unwrap_err();
        assert!(matches!(err, CaveError::MalformedInput { line: 1, .. }));
    }
}
