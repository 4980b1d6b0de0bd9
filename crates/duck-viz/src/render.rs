//! Draws a [`BandChart`] with plotters.
//!
//! The backend follows the output extension: `.svg` keeps text as text
//! (the font family is written into each label), `.png` rasterizes through
//! the system font.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::band::BandChart;
use crate::style::ChartStyle;
use crate::PlotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Result<Self, PlotError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "png" => Ok(ImageFormat::Png),
            other => Err(PlotError::UnsupportedFormat(other.to_string())),
        }
    }
}

pub fn render_chart(chart: &BandChart, style: &ChartStyle, path: &Path) -> Result<(), PlotError> {
    style.validate()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let size = style.pixel_size();
    match ImageFormat::from_path(path)? {
        ImageFormat::Svg => draw(SVGBackend::new(path, size).into_drawing_area(), chart, style)?,
        ImageFormat::Png => draw(BitMapBackend::new(path, size).into_drawing_area(), chart, style)?,
    }
    debug!(path = %path.display(), year = chart.year, "rendered duck curve");
    Ok(())
}

fn drawing_err<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Drawing(err.to_string())
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    chart: &BandChart,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    root.fill(&WHITE).map_err(drawing_err)?;

    let color = style.rgb()?;
    let margins = style.margins();
    let font = (style.font_family.as_str(), style.font_px()).into_font();
    let (y_lo, y_hi) = chart.y_range()?;
    let x_max = chart.x_max();
    // One key point per column; the formatter blanks all but the ticks.
    let key_points = chart.labels.len().max(2);

    let mut ctx = ChartBuilder::on(&root)
        .margin_top(margins.top)
        .margin_right(margins.right)
        .x_label_area_size(margins.bottom)
        .y_label_area_size(margins.left)
        .build_cartesian_2d(0f64..x_max, y_lo..y_hi)
        .map_err(drawing_err)?;

    let label_for = |x: &f64| chart.tick_label(*x);
    ctx.configure_mesh()
        .disable_mesh()
        .x_labels(key_points)
        .x_label_formatter(&label_for)
        .x_label_style(font.clone())
        .y_label_style(font.clone())
        .y_desc(style.y_label.as_str())
        .axis_desc_style(font.clone())
        .draw()
        .map_err(drawing_err)?;

    for (band, alpha, label) in [
        (&chart.outer, style.outer_alpha, "Quantile1"),
        (&chart.inner, style.inner_alpha, "Quantile2"),
    ] {
        let outline = BandChart::band_polygon(band);
        if outline.len() < 3 {
            continue;
        }
        let fill = color.mix(alpha).filled();
        ctx.draw_series(std::iter::once(Polygon::new(outline, fill)))
            .map_err(drawing_err)?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 14, y + 4)], fill));
    }

    let line = color.stroke_width(style.line_width);
    ctx.draw_series(LineSeries::new(chart.median_points(), line))
        .map_err(drawing_err)?
        .label("Average")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 14, y)], line));

    let spine = BLACK.stroke_width(1);
    if style.show_top_spine {
        ctx.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, y_hi), (x_max, y_hi)],
            spine,
        )))
        .map_err(drawing_err)?;
    }
    if style.show_right_spine {
        ctx.draw_series(std::iter::once(PathElement::new(
            vec![(x_max, y_lo), (x_max, y_hi)],
            spine,
        )))
        .map_err(drawing_err)?;
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.0))
        .border_style(&TRANSPARENT)
        .label_font(font)
        .draw()
        .map_err(drawing_err)?;

    root.present().map_err(drawing_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ImageFormat::from_path(Path::new("a/duck.SVG")).unwrap(), ImageFormat::Svg);
        assert_eq!(ImageFormat::from_path(Path::new("duck.png")).unwrap(), ImageFormat::Png);
        assert!(matches!(
            ImageFormat::from_path(Path::new("duck.pdf")),
            Err(PlotError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
    }

    fn sample_chart() -> BandChart {
        BandChart {
            year: 2020,
            labels: (0..24).map(|h| format!("{h:02}:00")).collect(),
            median: (0..24).map(|h| Some(2.0 + 0.01 * h as f64)).collect(),
            outer: (vec![Some(1.5); 24], vec![Some(3.0); 24]),
            inner: (vec![Some(1.8); 24], vec![Some(2.5); 24]),
            ylim: Some((0.9, 3.7)),
            tick_positions: ChartStyle::default().x_tick_positions,
        }
    }

    // plotters writes each label as `<text ...>\nLABEL\n</text>`
    fn has_text(svg: &str, text: &str) -> bool {
        svg.contains(&format!(">\n{text}\n</text>"))
    }

    #[test]
    fn renders_svg_with_bands_and_legend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duck-curve-2020.svg");
        render_chart(&sample_chart(), &ChartStyle::default(), &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();

        assert_eq!(svg.matches("<polygon").count(), 2);
        for legend in ["Average", "Quantile1", "Quantile2"] {
            assert!(has_text(&svg, legend), "missing legend {legend}");
        }
        for hour in [0, 3, 6, 9, 12, 15, 18, 21, 23] {
            let label = format!("{hour:02}:00");
            assert!(has_text(&svg, &label), "missing tick {label}");
        }
        for hour in [1, 2, 4, 13, 22] {
            assert!(!has_text(&svg, &format!("{hour:02}:00")));
        }
        assert!(svg.contains("Arial"));
    }

    #[test]
    fn unknown_extension_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duck.pdf");
        let err = render_chart(&sample_chart(), &ChartStyle::default(), &path).unwrap_err();
        assert!(matches!(err, PlotError::UnsupportedFormat(_)));
        assert!(!path.exists());
    }
}
