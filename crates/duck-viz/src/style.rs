//! Immutable chart styling.
//!
//! A [`ChartStyle`] is built once (usually from the `[chart.style]` config
//! section) and passed by reference to every render call.

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use crate::PlotError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Figure size in inches.
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
    /// Axes rectangle as figure fractions: left, bottom, width, height.
    pub axes_rect: [f64; 4],
    pub font_family: String,
    pub font_size_pt: f64,
    /// Hex color shared by the median line and both bands.
    pub color: String,
    pub line_width: u32,
    pub outer_alpha: f64,
    pub inner_alpha: f64,
    /// Column positions that get an x-axis label. Labels are drawn
    /// horizontally; plotters can only turn text by quarter turns.
    pub x_tick_positions: Vec<usize>,
    pub show_top_spine: bool,
    pub show_right_spine: bool,
    pub y_label: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width_in: 3.0,
            height_in: 3.5,
            dpi: 200,
            axes_rect: [0.18, 0.18, 0.85, 0.75],
            font_family: "Arial".to_string(),
            font_size_pt: 8.0,
            color: "#1f77b4".to_string(),
            line_width: 2,
            outer_alpha: 0.1,
            inner_alpha: 0.2,
            x_tick_positions: vec![0, 3, 6, 9, 12, 15, 18, 21, 23],
            show_top_spine: false,
            show_right_spine: false,
            y_label: "Residual Electricity Consumption (x10^4 MW)".to_string(),
        }
    }
}

/// Pixel margins around the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl ChartStyle {
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f64).round() as u32,
            (self.height_in * self.dpi as f64).round() as u32,
        )
    }

    pub fn font_px(&self) -> f64 {
        self.font_size_pt * self.dpi as f64 / 72.0
    }

    /// Margins implied by `axes_rect`. Axes that overflow the figure are
    /// clipped to its edge.
    pub fn margins(&self) -> Margins {
        let (w, h) = self.pixel_size();
        let [left, bottom, width, height] = self.axes_rect;
        let px = |fraction: f64, total: u32| (fraction.max(0.0) * total as f64).round() as u32;
        Margins {
            left: px(left, w),
            right: px(1.0 - left - width, w),
            top: px(1.0 - bottom - height, h),
            bottom: px(bottom, h),
        }
    }

    pub fn rgb(&self) -> Result<RGBColor, PlotError> {
        parse_hex_color(&self.color)
    }

    pub fn validate(&self) -> Result<(), PlotError> {
        let (w, h) = self.pixel_size();
        if w == 0 || h == 0 {
            return Err(PlotError::Style(format!("figure is {w}x{h} pixels")));
        }
        for alpha in [self.outer_alpha, self.inner_alpha] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(PlotError::Style(format!("alpha {alpha} outside [0, 1]")));
            }
        }
        if self.axes_rect.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PlotError::Style(format!("invalid axes rect {:?}", self.axes_rect)));
        }
        self.rgb().map(|_| ())
    }
}

fn parse_hex_color(raw: &str) -> Result<RGBColor, PlotError> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PlotError::Style(format!("invalid color '{raw}'; expected #rrggbb")));
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    match (channel(0), channel(2), channel(4)) {
        (Ok(r), Ok(g), Ok(b)) => Ok(RGBColor(r, g, b)),
        _ => Err(PlotError::Style(format!("invalid color '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_figure_geometry() {
        let style = ChartStyle::default();
        assert_eq!(style.pixel_size(), (600, 700));
        let m = style.margins();
        assert_eq!(m.left, 108);
        assert_eq!(m.bottom, 126);
        assert_eq!(m.top, 49);
        // 0.18 + 0.85 overflows the figure width
        assert_eq!(m.right, 0);
    }

    #[test]
    fn parses_tab_blue() {
        let style = ChartStyle::default();
        assert_eq!(style.rgb().unwrap(), RGBColor(0x1f, 0x77, 0xb4));
        assert!(parse_hex_color("blue").is_err());
        assert!(parse_hex_color("#12345g").is_err());
    }

    #[test]
    fn validate_rejects_bad_alpha() {
        let style = ChartStyle {
            inner_alpha: 1.5,
            ..ChartStyle::default()
        };
        assert!(style.validate().is_err());
        assert!(ChartStyle::default().validate().is_ok());
    }

    #[test]
    fn partial_style_deserializes_with_defaults() {
        let style: ChartStyle = serde_json::from_str(r#"{"dpi": 100}"#).unwrap();
        assert_eq!(style.pixel_size(), (300, 350));
        assert_eq!(style.font_family, "Arial");
    }
}
