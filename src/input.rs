//! Reader for the plain-text static input format.
//!
//! ```text
//! 3          <- entity count N
//! 20         <- domain size L
//! 0.25 1.0   <- radius of the first entity, shared cutoff rc
//! 0.25       <- one radius per remaining entity; extra columns are ignored
//! 0.37 1.0
//! ```
//!
//! Blank lines are skipped. The number of radius lines must match N.

use crate::core::{CimParameters, Entity, IdIssuer, SurfaceEntity};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Parsed static input: the domain, the shared cutoff and one entity per radius line.
#[derive(Debug, Clone)]
pub struct StaticInput {
    domain_size: f64,
    cutoff: f64,
    entities: Vec<Arc<Entity>>,
}

impl StaticInput {
    /// Parse from a string. Entities are issued from `ids` in file order, and only once the
    /// whole input has been validated.
    pub fn parse(text: &str, ids: &mut IdIssuer) -> Result<Self> {
        let lines = text
            .lines()
            .enumerate()
            .map(|(k, line)| (k + 1, line.to_owned()));
        Self::from_lines(lines, ids)
    }

    /// Parse from any buffered reader.
    pub fn read<R: BufRead>(reader: R, ids: &mut IdIssuer) -> Result<Self> {
        let lines = reader
            .lines()
            .enumerate()
            .map(|(k, line)| line.map(|l| (k + 1, l)))
            .collect::<std::io::Result<Vec<_>>>()?;
        Self::from_lines(lines, ids)
    }

    /// Parse the file at `path`.
    pub fn from_path(path: impl AsRef<Path>, ids: &mut IdIssuer) -> Result<Self> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file), ids)
    }

    fn from_lines(
        lines: impl IntoIterator<Item = (usize, String)>,
        ids: &mut IdIssuer,
    ) -> Result<Self> {
        let mut lines = lines
            .into_iter()
            .filter(|(_, line)| !line.trim().is_empty());

        let (ln, line) = lines.next().ok_or_else(|| Error::parse(1, "missing entity count"))?;
        let count: usize = field(ln, line.trim(), "entity count")?;

        let (ln, line) = lines
            .next()
            .ok_or_else(|| Error::parse(ln + 1, "missing domain size"))?;
        let domain_size: f64 = field(ln, line.trim(), "domain size")?;
        if !domain_size.is_finite() || domain_size <= 0.0 {
            return Err(Error::parse(ln, "domain size must be finite and > 0"));
        }

        let mut cutoff = None;
        let mut radii = Vec::with_capacity(count);
        let mut last = ln;
        for (ln, line) in lines {
            last = ln;
            if radii.len() == count {
                return Err(Error::parse(
                    ln,
                    format!("more radius lines than the declared {count} entities"),
                ));
            }
            let mut columns = line.split_whitespace();
            let radius: f64 = match columns.next() {
                Some(col) => field(ln, col, "radius")?,
                None => return Err(Error::parse(ln, "expected a radius")),
            };
            if !radius.is_finite() || radius < 0.0 {
                return Err(Error::parse(ln, "radius must be finite and >= 0"));
            }
            if cutoff.is_none() {
                let rc: f64 = match columns.next() {
                    Some(col) => field(ln, col, "cutoff")?,
                    None => return Err(Error::parse(ln, "first radius line must also give the cutoff")),
                };
                if !rc.is_finite() || rc < 0.0 {
                    return Err(Error::parse(ln, "cutoff must be finite and >= 0"));
                }
                cutoff = Some(rc);
            }
            radii.push(radius);
        }
        if radii.len() != count {
            return Err(Error::parse(
                last,
                format!("expected {count} radius lines, found {}", radii.len()),
            ));
        }

        let entities = radii
            .into_iter()
            .map(|r| ids.entity(r))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            domain_size,
            // An empty entity list carries no cutoff line.
            cutoff: cutoff.unwrap_or(0.0),
            entities,
        })
    }

    /// Side `L` declared on the second line.
    #[inline]
    pub fn domain_size(&self) -> f64 {
        self.domain_size
    }

    /// Cutoff `rc` from the third line; 0 when the input lists no entities.
    #[inline]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Entities in file order, one per radius line.
    pub fn entities(&self) -> &[Arc<Entity>] {
        &self.entities
    }

    /// Largest radius, 0 when there are no entities.
    pub fn max_radius(&self) -> f64 {
        self.entities.iter().map(|e| e.radius()).fold(0.0, f64::max)
    }

    /// Search parameters for a grid of `num_cells` per side.
    pub fn parameters(&self, num_cells: usize) -> Result<CimParameters> {
        CimParameters::new(self.domain_size, num_cells, self.cutoff)
    }

    /// Search parameters using [`CimParameters::optimal_num_cells`].
    pub fn optimal_parameters(&self) -> Result<CimParameters> {
        let m = CimParameters::optimal_num_cells(self.domain_size, self.cutoff, self.max_radius())?;
        self.parameters(m)
    }

    /// Pair each entity with a position, in order.
    ///
    /// Errors:
    /// - `Error::Configuration` if the counts differ or a position is not finite.
    pub fn place(&self, positions: &[(f64, f64)]) -> Result<Vec<SurfaceEntity>> {
        if positions.len() != self.entities.len() {
            return Err(Error::config(format!(
                "expected {} positions, got {}",
                self.entities.len(),
                positions.len()
            )));
        }
        self.entities
            .iter()
            .zip(positions)
            .map(|(e, &(x, y))| SurfaceEntity::new(Arc::clone(e), x, y))
            .collect()
    }
}

fn field<T: FromStr>(line: usize, text: &str, what: &str) -> Result<T> {
    text.parse()
        .map_err(|_| Error::parse(line, format!("invalid {what}: {text:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "3\n20\n0.25 1.0\n0.25\n\n0.37 1.0\n";

    #[test]
    fn parses_sample() -> Result<()> {
        let mut ids = IdIssuer::new();
        let input = StaticInput::parse(SAMPLE, &mut ids)?;
        assert_eq!(input.domain_size(), 20.0);
        assert_eq!(input.cutoff(), 1.0);
        assert_eq!(input.entities().len(), 3);
        assert_eq!(input.max_radius(), 0.37);
        assert_eq!(ids.issued(), 3);
        Ok(())
    }

    #[test]
    fn reader_matches_string() -> Result<()> {
        let mut ids = IdIssuer::new();
        let input = StaticInput::read(Cursor::new(SAMPLE), &mut ids)?;
        let radii: Vec<f64> = input.entities().iter().map(|e| e.radius()).collect();
        assert_eq!(radii, vec![0.25, 0.25, 0.37]);
        Ok(())
    }

    #[test]
    fn optimal_parameters_from_input() -> Result<()> {
        let mut ids = IdIssuer::new();
        let input = StaticInput::parse(SAMPLE, &mut ids)?;
        let params = input.optimal_parameters()?;
        // reach = 1 + 2 * 0.37 = 1.74 => floor(20 / 1.74) = 11
        assert_eq!(params.num_cells(), 11);
        assert_eq!(params.cutoff(), 1.0);
        Ok(())
    }

    #[test]
    fn errors_point_at_lines() {
        let mut ids = IdIssuer::new();
        let cases = [
            ("", 1, "entity count"),
            ("x\n10\n", 1, "entity count"),
            ("1\n", 2, "domain size"),
            ("1\n-5\n0.1 1\n", 2, "domain size"),
            ("2\n10\n0.1\n0.1\n", 3, "cutoff"),
            ("2\n10\n0.1 1\nabc\n", 4, "radius"),
            ("1\n10\n0.1 1\n0.2\n", 4, "more radius lines"),
            ("3\n10\n0.1 1\n0.2\n", 4, "expected 3"),
            ("1\n10\n-0.1 1\n", 3, "radius"),
        ];
        for (text, line, needle) in cases {
            match StaticInput::parse(text, &mut ids) {
                Err(Error::Parse { line: got, message }) => {
                    assert_eq!(got, line, "{text:?}: {message}");
                    assert!(message.contains(needle), "{text:?}: {message}");
                }
                other => panic!("{text:?}: expected parse error, got {other:?}"),
            }
        }
        // Failed parses issue no entities.
        assert_eq!(ids.issued(), 0);
    }

    #[test]
    fn empty_entity_list() -> Result<()> {
        let mut ids = IdIssuer::new();
        let input = StaticInput::parse("0\n10\n", &mut ids)?;
        assert!(input.entities().is_empty());
        assert_eq!(input.max_radius(), 0.0);
        Ok(())
    }

    #[test]
    fn place_pairs_positions() -> Result<()> {
        let mut ids = IdIssuer::new();
        let input = StaticInput::parse(SAMPLE, &mut ids)?;
        let placed = input.place(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)])?;
        assert_eq!(placed[2].x(), 3.0);
        assert_eq!(placed[2].id(), input.entities()[2].id());
        assert!(input.place(&[(1.0, 1.0)]).is_err());
        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut ids = IdIssuer::new();
        let err = StaticInput::from_path("/nonexistent/static.txt", &mut ids).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
