use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use geotour_core::{Centroid, Cluster, Point, Result, centroid};

/// Opens `path` for writing, or stdout when `None`.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// Writes the tour as tab-delimited rows.
///
/// With `format`, a `center:` line and an `ord` column are added.
pub fn write_tour<W: Write>(
    out: &mut W,
    tour: &[Point],
    center: &Centroid,
    format: bool,
) -> Result<()> {
    if format {
        write_center(out, "center:", center)?;
        writeln!(out)?;
        writeln!(out, "lab\tlat\tlon\tord")?;
        for (idx, p) in tour.iter().enumerate() {
            writeln!(out, "{}\t{:.6}\t{:.6}\t{}", p.label, p.lat, p.lon, idx + 1)?;
        }
    } else {
        writeln!(out, "label\tlat\tlon")?;
        for p in tour {
            writeln!(out, "{}\t{:.6}\t{:.6}", p.label, p.lat, p.lon)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Writes `cluster, label, lat, lon` rows, each cluster followed by its
/// center line when `format` is on. Clusters are numbered from 1.
pub fn write_clusters<W: Write>(out: &mut W, clusters: &[Cluster], format: bool) -> Result<()> {
    writeln!(out, "cluster\tlabel\tlat\tlon")?;
    for (idx, cluster) in clusters.iter().enumerate() {
        let id = idx + 1;
        for p in &cluster.members {
            writeln!(out, "{id}\t{}\t{:.6}\t{:.6}", p.label, p.lat, p.lon)?;
        }
        if format && !cluster.members.is_empty() {
            let center = centroid(&cluster.members)?;
            write_center(out, &format!("center:{id}"), &center)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_center<W: Write>(out: &mut W, tag: &str, center: &Centroid) -> io::Result<()> {
    writeln!(
        out,
        "{tag}\t{:.6}\t{:.6}\t{:.2}km avg dist",
        center.center.lat,
        center.center.lon,
        center.average_distance()
    )
}
