//! CSV Output
//!
//! Chart series for spreadsheets: the density and CDF curves on the shared KDE
//! grid, and the histogram bins.

use crate::report::Report;
use csv::WriterBuilder;
use serde::Serialize;
use std::io;

#[derive(Serialize)]
struct CurveRow {
    x: f64,
    kde_density: f64,
    kde_cdf: f64,
    normal_pdf: f64,
    normal_cdf: f64,
}

#[derive(Serialize)]
struct HistogramRow {
    bin_start: f64,
    bin_end: f64,
    bin_center: f64,
    count: usize,
    density: f64,
}

fn write_rows<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Generate the curve series, one row per grid point
pub fn generate_csv_report(report: &Report) -> Result<String, csv::Error> {
    let curves = &report.result.curves;
    let rows = curves.kde.grid.iter().enumerate().map(|(i, &x)| CurveRow {
        x,
        kde_density: curves.kde.density[i],
        kde_cdf: curves.kde.cdf[i],
        normal_pdf: curves.normal_pdf[i],
        normal_cdf: curves.normal_cdf[i],
    });
    write_rows(rows)
}

/// Generate the histogram, one row per bin
pub fn generate_histogram_csv(report: &Report) -> Result<String, csv::Error> {
    let histogram = &report.result.curves.histogram;
    let centers = histogram.centers();
    let rows = histogram
        .edges
        .windows(2)
        .zip(&centers)
        .zip(histogram.counts.iter().zip(&histogram.density))
        .map(|((edges, &bin_center), (&count, &density))| HistogramRow {
            bin_start: edges[0],
            bin_end: edges[1],
            bin_center,
            count,
            density,
        });
    write_rows(rows)
}
