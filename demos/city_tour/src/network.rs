//! Street-list files.
//!
//! One segment per line, `street;from;to` or
//! `street;from;to;x_from;y_from;x_to;y_to`.  Blank lines and lines starting
//! with `#` are skipped.  A line with coordinates takes one minute per 100
//! coordinate units; a line without gets a random duration and its missing
//! coordinates are auto-assigned by the graph.

use anyhow::{Context, Result, bail};

use wr_core::Point;
use wr_network::City;

/// Add every segment of `text` to `city`, then configure unconfigured
/// streets from their names.  Returns the number of segments read.
pub fn load_streets(city: &mut City, text: &str) -> Result<usize> {
    let mut segments = 0;
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        match fields.as_slice() {
            [street, from, to] => {
                city.add_segment_untimed(street, from, to)?;
            }
            [street, from, to, coords @ ..] if coords.len() == 4 => {
                let c = parse_coords(coords).with_context(|| format!("line {}", n + 1))?;
                city.set_coordinates(from, c[0], c[1])?;
                city.set_coordinates(to, c[2], c[3])?;
                let minutes = Point::new(c[0], c[1]).distance(Point::new(c[2], c[3])) / 100.0;
                if minutes > 0.0 {
                    city.add_segment(street, from, to, minutes)?;
                } else {
                    city.add_segment_untimed(street, from, to)?;
                }
            }
            _ => bail!("line {}: expected 3 or 7 fields, got {}", n + 1, fields.len()),
        }
        segments += 1;
    }
    let inferred = city.infer_orientations();
    log::info!("loaded {segments} segments, {inferred} street orientations inferred from names");
    Ok(segments)
}

fn parse_coords(fields: &[&str]) -> Result<[f64; 4]> {
    let mut out = [0.0; 4];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.parse().with_context(|| format!("bad coordinate {field:?}"))?;
    }
    Ok(out)
}
