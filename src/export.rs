use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::ColorImage;

use crate::data::engine::AggregatedSeries;

// ---------------------------------------------------------------------------
// Chart export (PNG)
// ---------------------------------------------------------------------------

/// Save a viewport screenshot as a PNG file.
///
/// The screenshot arrives asynchronously via `egui::Event::Screenshot` one
/// frame after `ViewportCommand::Screenshot` was sent; the app loop hands
/// the image here together with the path the user picked.
pub fn save_png(image: &ColorImage, path: &Path) -> Result<()> {
    let [width, height] = image.size;
    let mut rgba = Vec::with_capacity(width * height * 4);
    for pixel in &image.pixels {
        rgba.extend_from_slice(&pixel.to_array());
    }

    let buffer = image::RgbaImage::from_raw(width as u32, height as u32, rgba)
        .context("screenshot buffer does not match its reported size")?;
    buffer
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;

    log::info!("chart exported to {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Series export (CSV)
// ---------------------------------------------------------------------------

/// Write the aggregated series as CSV: one row per group, then a footer row
/// with the overall mean (the reference line the chart draws).
pub fn write_series_csv(series: &AggregatedSeries, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    for point in &series.points {
        writer.serialize(point).context("writing series row")?;
    }
    writer
        .write_record(["overall_mean", &series.overall_mean.to_string()])
        .context("writing overall mean row")?;
    writer.flush().context("flushing CSV writer")?;

    log::info!("series exported to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::engine::SeriesPoint;

    #[test]
    fn series_csv_has_groups_and_mean_footer() {
        let series = AggregatedSeries {
            points: vec![
                SeriesPoint {
                    group: "A".into(),
                    value: 200.0,
                },
                SeriesPoint {
                    group: "B".into(),
                    value: 50.0,
                },
            ],
            overall_mean: 125.0,
        };

        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("series.csv");
        write_series_csv(&series, &path).expect("write csv");

        let contents = std::fs::read_to_string(&path).expect("read back");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "group,value");
        assert_eq!(lines[1], "A,200.0");
        assert_eq!(lines[2], "B,50.0");
        assert_eq!(lines[3], "overall_mean,125");
    }
}
