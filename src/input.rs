use std::{
    collections::HashSet,
    fs,
    io::{self, Read},
    path::Path,
};

use geotour_core::{Error, Point, Result};

const DELIMITER: char = '\t';

/// Loads points from `path`, or stdin when `None`.
pub fn read_points(path: Option<&Path>) -> Result<Vec<Point>> {
    let input = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            Error::invalid_input(format!("failed to read {}: {e}", path.display()))
        })?,
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            input
        }
    };
    parse_points(&input)
}

/// Parses tab-delimited `label, lat, lon` records after a header row.
///
/// Row numbers in errors are 1-based file lines, header included.
pub fn parse_points(input: &str) -> Result<Vec<Point>> {
    let mut lines = input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    if lines.next().is_none() {
        return Err(Error::invalid_input("empty input file"));
    }

    let mut points = Vec::new();
    let mut seen = HashSet::new();
    let mut duplicate_rows = Vec::new();

    for (idx, line) in lines {
        let row = idx + 1;
        let point = parse_record(line, row)?;
        let key = (
            point.label.clone(),
            point.lat.to_bits(),
            point.lon.to_bits(),
        );
        if !seen.insert(key) {
            duplicate_rows.push(row);
            continue;
        }
        if !point.is_valid() {
            return Err(Error::invalid_input(format!(
                "invalid coordinates, row: {row}"
            )));
        }
        points.push(point);
    }

    if !duplicate_rows.is_empty() {
        log::warn!(
            "input: removed duplicates count={} rows={duplicate_rows:?}",
            duplicate_rows.len()
        );
    }
    if points.is_empty() {
        return Err(Error::EmptyPointSet);
    }

    log::info!("input: loaded n={}", points.len());
    Ok(points)
}

fn parse_record(line: &str, row: usize) -> Result<Point> {
    let mut fields = line.split(DELIMITER);
    let label = fields.next().unwrap_or_default().trim();
    let lat = fields.next().unwrap_or_default().trim();
    let lon = fields.next().unwrap_or_default().trim();

    if lat.is_empty() || lon.is_empty() {
        return Err(Error::invalid_input(format!("missing lat/lon, row: {row}")));
    }
    if label.is_empty() {
        return Err(Error::invalid_input(format!(
            "unpopulated record, row: {row} column: label"
        )));
    }

    let lat: f64 = lat
        .parse()
        .map_err(|_| Error::invalid_input(format!("invalid latitude {lat:?}, row: {row}")))?;
    let lon: f64 = lon
        .parse()
        .map_err(|_| Error::invalid_input(format!("invalid longitude {lon:?}, row: {row}")))?;

    if lat == 0.0 {
        return Err(Error::invalid_input(format!(
            "unpopulated record, row: {row} column: lat"
        )));
    }
    if lon == 0.0 {
        return Err(Error::invalid_input(format!(
            "unpopulated record, row: {row} column: lon"
        )));
    }

    Ok(Point::new(lat, lon, label))
}
