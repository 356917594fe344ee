//! Import of MovingAI benchmark maps (`.map`) and scenarios (`.scen`).
//!
//! A `.map` file is a four-line header (`type`, `height H`, `width W`,
//! `map`) followed by `H` rows of `W` terrain characters. Passable terrain
//! is `.`, `G` and `S`; everything else (`@`, `O`, `T`, `W`, ...) becomes an
//! obstacle. Maps carry no start or goal; scenarios supply them.

use sapf_core::{Coord, Grid};

use crate::error::GenError;

fn passable(ch: char) -> bool {
    matches!(ch, '.' | 'G' | 'S')
}

/// One benchmark query from a `.scen` file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    pub bucket: u32,
    pub map: String,
    pub width: i32,
    pub height: i32,
    pub start: Coord,
    pub goal: Coord,
    pub optimal_length: Option<f64>,
}

fn header_value(line: Option<(usize, &str)>, key: &str) -> Result<i32, GenError> {
    let (n, line) = line.ok_or_else(|| GenError::parse(0, format!("missing '{key}' header")))?;
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(k), Some(v)) if k == key => v
            .parse()
            .map_err(|_| GenError::parse(n, format!("invalid {key} '{v}'"))),
        _ => Err(GenError::parse(n, format!("expected '{key} <n>', got '{line}'"))),
    }
}

/// Parse the contents of a `.map` file.
pub fn parse_map(text: &str) -> Result<Grid, GenError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim_end()));

    match lines.next() {
        Some((_, l)) if l.starts_with("type") => {}
        Some((n, l)) => return Err(GenError::parse(n, format!("expected 'type', got '{l}'"))),
        None => return Err(GenError::parse(0, "empty map")),
    }
    let height = header_value(lines.next(), "height")?;
    let width = header_value(lines.next(), "width")?;
    match lines.next() {
        Some((_, "map")) => {}
        Some((n, l)) => return Err(GenError::parse(n, format!("expected 'map', got '{l}'"))),
        None => return Err(GenError::parse(0, "missing 'map' header")),
    }

    let mut obstacles = Vec::new();
    let mut rows = 0;
    for (n, row) in lines.filter(|(_, l)| !l.is_empty()) {
        if rows == height {
            return Err(GenError::parse(n, format!("more than {height} rows")));
        }
        let len = row.chars().count() as i32;
        if len != width {
            return Err(GenError::parse(n, format!("row has {len} cells, expected {width}")));
        }
        obstacles.extend(
            row.chars()
                .enumerate()
                .filter(|&(_, ch)| !passable(ch))
                .map(|(x, _)| Coord::new(x as i32, rows)),
        );
        rows += 1;
    }
    if rows != height {
        return Err(GenError::parse(0, format!("expected {height} rows, found {rows}")));
    }

    Ok(Grid::new(width, height, obstacles, None, None)?)
}

/// Parse the contents of a `.scen` file. A leading `version` line and blank
/// lines are skipped.
pub fn parse_scenarios(text: &str) -> Result<Vec<Scenario>, GenError> {
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let n = i + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with("version") {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 8 {
            return Err(GenError::parse(
                n,
                format!("expected at least 8 fields, got {}", fields.len()),
            ));
        }
        let int = |idx: usize| -> Result<i32, GenError> {
            fields[idx]
                .parse()
                .map_err(|_| GenError::parse(n, format!("invalid integer '{}'", fields[idx])))
        };
        let optimal_length = match fields.get(8) {
            Some(v) => Some(
                v.parse::<f64>()
                    .map_err(|_| GenError::parse(n, format!("invalid length '{v}'")))?,
            ),
            None => None,
        };
        out.push(Scenario {
            bucket: int(0)?.max(0) as u32,
            map: fields[1].to_string(),
            width: int(2)?,
            height: int(3)?,
            start: Coord::new(int(4)?, int(5)?),
            goal: Coord::new(int(6)?, int(7)?),
            optimal_length,
        });
    }
    Ok(out)
}

/// The map with start and goal taken from scenario `index`.
pub fn instance(map: &str, scenarios: &str, index: usize) -> Result<Grid, GenError> {
    let grid = parse_map(map)?;
    let scenarios = parse_scenarios(scenarios)?;
    let scen = scenarios.get(index).ok_or_else(|| {
        GenError::invalid(format!(
            "scenario index {index} out of range ({} scenarios)",
            scenarios.len()
        ))
    })?;
    if (scen.width, scen.height) != (grid.width(), grid.height()) {
        return Err(GenError::invalid(format!(
            "scenario is for a {}x{} map, got {}x{}",
            scen.width,
            scen.height,
            grid.width(),
            grid.height()
        )));
    }
    Ok(grid.with_start(Some(scen.start))?.with_goal(Some(scen.goal))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapf_core::{Field, MapValidationError};

    const MAP: &str = "\
type octile
height 3
width 4
map
..@.
.T..
....
";

    const SCEN: &str = "\
version 1
0\tsmall.map\t4\t3\t0\t0\t3\t0\t5.00000000
0\tsmall.map\t4\t3\t0\t2\t3\t2\t3
";

    #[test]
    fn parses_terrain() {
        let grid = parse_map(MAP).unwrap();
        assert_eq!((grid.width(), grid.height()), (4, 3));
        assert_eq!(
            grid.obstacles().collect::<Vec<_>>(),
            vec![Coord::new(1, 1), Coord::new(2, 0)]
        );
        assert_eq!(grid.start(), None);
    }

    #[test]
    fn parses_scenarios() {
        let scen = parse_scenarios(SCEN).unwrap();
        assert_eq!(scen.len(), 2);
        assert_eq!(scen[0].map, "small.map");
        assert_eq!(scen[0].start, Coord::new(0, 0));
        assert_eq!(scen[0].goal, Coord::new(3, 0));
        assert_eq!(scen[0].optimal_length, Some(5.0));
        assert_eq!(scen[1].optimal_length, Some(3.0));
    }

    #[test]
    fn builds_instance() {
        let grid = instance(MAP, SCEN, 1).unwrap();
        assert_eq!(grid.start(), Some(Coord::new(0, 2)));
        assert_eq!(grid.goal(), Some(Coord::new(3, 2)));
        assert!(matches!(instance(MAP, SCEN, 2), Err(GenError::InvalidParameter(_))));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(
            parse_map("type octile\nheight 2\nwidth 3\nmap\n...\n..\n"),
            Err(GenError::parse(6, "row has 2 cells, expected 3"))
        );
        assert!(matches!(
            parse_map("type octile\nheight x\n"),
            Err(GenError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse_scenarios("0 a.map 4 3 0 0"),
            Err(GenError::Parse { line: 1, .. })
        ));
        let on_wall = "0 small.map 4 3 2 0 3 2\n";
        assert_eq!(
            instance(MAP, on_wall, 0).unwrap_err(),
            GenError::Map(MapValidationError::OnObstacle {
                field: Field::Start,
                coord: Coord::new(2, 0)
            })
        );
    }
}
