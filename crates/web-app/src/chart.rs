use std::borrow::BorrowMut;

use chrono::prelude::*;
use gloo_utils::window;
use gymlog_domain::{self as domain, MetricSchema, Progress};
use plotters::{
    chart::ChartBuilder,
    prelude::{Circle, IntoDrawingArea, SVGBackend},
    series::LineSeries,
    style::{Color, IntoFont, Palette, Palette99, RGBColor, TextStyle, WHITE},
};
use wasm_bindgen::JsValue;

use crate::Theme;

pub const COLOR_PRIMARY: usize = 8;
pub const COLOR_SECONDARY: usize = 4;

pub const OPACITY_LINE: f64 = 0.9;
pub const OPACITY_POINT: f64 = 0.9;

pub const WIDTH_LINE: u32 = 2;
pub const SIZE_POINT: u32 = 3;

pub const HEIGHT: u32 = 200;

pub const FONT: (&str, u32) = ("Roboto", 11);

#[derive(Debug, Clone, PartialEq)]
pub enum PlotType {
    Circle(usize, f64, u32),
    Line(usize, f64, u32),
}

#[must_use]
pub fn plot_line_with_points(color: usize) -> Vec<PlotType> {
    vec![
        PlotType::Line(color, OPACITY_LINE, WIDTH_LINE),
        PlotType::Circle(color, OPACITY_POINT, SIZE_POINT),
    ]
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PlotParams {
    pub y_min_opt: Option<f32>,
    pub y_max_opt: Option<f32>,
    pub secondary: bool,
}

impl PlotParams {
    pub const PRIMARY: Self = Self {
        y_min_opt: None,
        y_max_opt: None,
        secondary: false,
    };

    pub const SECONDARY: Self = Self {
        y_min_opt: None,
        y_max_opt: None,
        secondary: true,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub label: &'static str,
    pub values: Vec<(NaiveDate, f32)>,
    pub plots: Vec<PlotType>,
    pub params: PlotParams,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Bounds {
    min: f32,
    max: f32,
}

impl Bounds {
    fn min_with_margin(self) -> f32 {
        assert!(0. <= self.min);
        assert!(self.min <= self.max);

        if self.min <= f32::EPSILON {
            return self.min;
        }
        self.min - self.margin()
    }

    fn max_with_margin(self) -> f32 {
        assert!(0. <= self.min);
        assert!(self.min <= self.max);

        self.max + self.margin()
    }

    fn margin(self) -> f32 {
        assert!(0. <= self.min);
        assert!(self.min <= self.max);

        if (self.max - self.min).abs() > f32::EPSILON {
            return (self.max - self.min) * 0.1;
        }
        0.1
    }
}

/// Series of the progress chart of an exercise.
///
/// The primary metric of the schema is plotted on the primary axis, the secondary metric on the
/// secondary axis. Series without any value inside the interval are omitted.
#[must_use]
pub fn progress_plot_data(
    progress: &Progress,
    schema: MetricSchema,
    interval: &domain::Interval,
) -> Vec<PlotData> {
    [
        (schema.primary(), COLOR_PRIMARY, PlotParams::PRIMARY),
        (schema.secondary(), COLOR_SECONDARY, PlotParams::SECONDARY),
    ]
    .into_iter()
    .map(|(metric, color, params)| PlotData {
        label: metric.label(),
        values: progress.series(metric, interval),
        plots: plot_line_with_points(color),
        params,
    })
    .filter(|data| !data.values.is_empty())
    .collect()
}

/// Plot the progress of an exercise.
pub fn plot_progress(
    progress: &Progress,
    schema: MetricSchema,
    interval: &domain::Interval,
    theme: &Theme,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let data = progress_plot_data(progress, schema, interval);
    if all_zeros(&data) {
        return Ok(None);
    }
    plot(&data, interval, theme, chart_width())
}

/// Plot data onto an SVG chart.
///
/// The x domain of the chart is configured by the interval parameter. Each `PlotData` element is
/// drawn with all of its plot types in order, on the primary or secondary axis as determined by
/// its parameters. If there is no series for the secondary axis, the secondary axis is omitted.
///
/// No chart is created if all values are zero.
pub fn plot(
    data: &[PlotData],
    interval: &domain::Interval,
    theme: &Theme,
    width: u32,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    if all_zeros(data) {
        return Ok(None);
    }

    let (Some(primary_bounds), secondary_bounds) = determine_y_bounds(data) else {
        return Ok(None);
    };

    let mut result = String::new();

    {
        let root = SVGBackend::with_string(&mut result, (width, HEIGHT)).into_drawing_area();
        let (color, background_color) = colors(theme);

        root.fill(&background_color)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10f32)
            .x_label_area_size(30f32)
            .y_label_area_size(40f32)
            .right_y_label_area_size(secondary_bounds.map_or_else(|| 0f32, |_| 40f32))
            .build_cartesian_2d(
                interval.first..interval.last,
                primary_bounds.min_with_margin()..primary_bounds.max_with_margin(),
            )?
            .set_secondary_coord(
                interval.first..interval.last,
                secondary_bounds
                    .as_ref()
                    .map_or(0.0..0.0, |b| b.min_with_margin()..b.max_with_margin()),
            );

        chart
            .configure_mesh()
            .disable_x_mesh()
            .set_all_tick_mark_size(3u32)
            .axis_style(color.mix(0.3))
            .bold_line_style(color.mix(0.05))
            .light_line_style(color.mix(0.0))
            .label_style(TextStyle::from(FONT.into_font()).color(&color))
            .x_labels(2)
            .y_labels(6)
            .draw()?;

        if secondary_bounds.is_some() {
            chart
                .configure_secondary_axes()
                .set_all_tick_mark_size(3u32)
                .axis_style(color.mix(0.3))
                .label_style(TextStyle::from(FONT.into_font()).color(&color))
                .draw()?;
        }

        for plot_data in data {
            let mut values = plot_data.values.clone();
            values.sort_by_key(|e| e.0);

            for plot in &plot_data.plots {
                match *plot {
                    PlotType::Circle(color, opacity, size) => {
                        let series = values.iter().map(|(x, y)| {
                            Circle::new((*x, *y), size, Palette99::pick(color).mix(opacity).filled())
                        });
                        if plot_data.params.secondary {
                            chart.draw_secondary_series(series)?;
                        } else {
                            chart.draw_series(series)?;
                        }
                    }
                    PlotType::Line(color, opacity, size) => {
                        let series = LineSeries::new(
                            values.iter().map(|(x, y)| (*x, *y)),
                            Palette99::pick(color).mix(opacity).stroke_width(size),
                        );
                        if plot_data.params.secondary {
                            chart.draw_secondary_series(series)?;
                        } else {
                            chart.draw_series(series)?;
                        }
                    }
                }
            }
        }

        root.present()?;
    }

    Ok(Some(result))
}

fn all_zeros(data: &[PlotData]) -> bool {
    data.iter()
        .all(|d| d.values.iter().all(|(_, v)| *v == 0.0))
}

fn colors(theme: &Theme) -> (RGBColor, RGBColor) {
    let dark = RGBColor(20, 22, 26);
    match theme {
        Theme::System | Theme::Light => (dark, WHITE),
        Theme::Dark => (WHITE, dark),
    }
}

fn determine_y_bounds(data: &[PlotData]) -> (Option<Bounds>, Option<Bounds>) {
    let mut primary_bounds: Option<Bounds> = None;
    let mut secondary_bounds: Option<Bounds> = None;

    for plot in data.iter().filter(|plot| !plot.values.is_empty()) {
        let min = plot
            .values
            .iter()
            .map(|(_, v)| *v)
            .fold(plot.params.y_min_opt.unwrap_or(f32::MAX), f32::min);
        let max = plot
            .values
            .iter()
            .map(|(_, v)| *v)
            .fold(plot.params.y_max_opt.unwrap_or(0.), f32::max);

        assert!(min <= max, "min={min}, max={max}");

        let b = if plot.params.secondary {
            secondary_bounds.borrow_mut()
        } else {
            primary_bounds.borrow_mut()
        }
        .get_or_insert(Bounds { min, max });

        b.min = f32::min(b.min, min);
        b.max = f32::max(b.max, max);
    }

    (primary_bounds, secondary_bounds)
}

/// Width of the chart depending on the window size.
#[must_use]
pub fn chart_width() -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let inner_width = window()
        .inner_width()
        .unwrap_or(JsValue::UNDEFINED)
        .as_f64()
        .unwrap_or(420.) as u32;
    inner_width.saturating_sub(20).clamp(300, 960)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use gymlog_domain::Interval;
    use pretty_assertions::assert_eq;

    use crate::tests::{at, progress};

    use super::*;

    fn march() -> Interval {
        (at(1, 0).date()..=at(31, 0).date()).into()
    }

    fn data(values: &[f32], params: PlotParams) -> PlotData {
        PlotData {
            label: "",
            values: values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    (
                        march().first + chrono::Duration::days(i64::try_from(i).unwrap()),
                        *v,
                    )
                })
                .collect(),
            plots: plot_line_with_points(COLOR_PRIMARY),
            params,
        }
    }

    #[test]
    fn test_progress_plot_data_strength() {
        let data = progress_plot_data(&progress(), MetricSchema::Strength, &march());
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].label, "Weight (kg)");
        assert_eq!(
            data[0].values,
            vec![(at(1, 0).date(), 60.0), (at(8, 0).date(), 62.5)]
        );
        assert!(!data[0].params.secondary);
        assert_eq!(data[1].label, "Repetitions");
        assert_eq!(
            data[1].values,
            vec![(at(1, 0).date(), 8.0), (at(8, 0).date(), 6.0)]
        );
        assert!(data[1].params.secondary);
    }

    #[test]
    fn test_progress_plot_data_omits_empty_series() {
        let data = progress_plot_data(&progress(), MetricSchema::Cardio, &march());
        assert_eq!(data, vec![]);

        let interval: Interval = (at(5, 0).date()..=at(31, 0).date()).into();
        let data = progress_plot_data(&progress(), MetricSchema::Strength, &interval);
        assert_eq!(
            data.iter().map(|d| d.values.len()).collect::<Vec<_>>(),
            vec![1, 1]
        );
    }

    #[test]
    fn test_plot_without_data() {
        assert_eq!(plot(&[], &march(), &Theme::Light, 400).unwrap(), None);
        assert_eq!(
            plot(
                &[data(&[0.0, 0.0], PlotParams::PRIMARY)],
                &march(),
                &Theme::Dark,
                400
            )
            .unwrap(),
            None
        );
    }

    #[test]
    fn test_all_zeros() {
        assert!(all_zeros(&[]));
        assert!(all_zeros(&[data(&[0.0], PlotParams::PRIMARY)]));
        assert!(!all_zeros(&[
            data(&[0.0], PlotParams::PRIMARY),
            data(&[1.0], PlotParams::SECONDARY)
        ]));
    }

    #[test]
    fn test_determine_y_bounds() {
        assert_eq!(determine_y_bounds(&[]), (None, None));
        assert_eq!(
            determine_y_bounds(&[
                data(&[60.0, 62.5], PlotParams::PRIMARY),
                data(&[], PlotParams::SECONDARY),
            ]),
            (
                Some(Bounds {
                    min: 60.0,
                    max: 62.5
                }),
                None
            )
        );
        assert_eq!(
            determine_y_bounds(&[
                data(&[60.0, 62.5], PlotParams::PRIMARY),
                data(&[8.0, 6.0], PlotParams::SECONDARY),
                data(&[7.0], PlotParams::SECONDARY),
            ]),
            (
                Some(Bounds {
                    min: 60.0,
                    max: 62.5
                }),
                Some(Bounds { min: 6.0, max: 8.0 })
            )
        );
        assert_eq!(
            determine_y_bounds(&[data(
                &[60.0],
                PlotParams {
                    y_min_opt: Some(0.0),
                    y_max_opt: Some(100.0),
                    secondary: false,
                }
            )]),
            (
                Some(Bounds {
                    min: 0.0,
                    max: 100.0
                }),
                None
            )
        );
    }

    #[test]
    fn test_bounds_margin() {
        let bounds = Bounds {
            min: 50.0,
            max: 60.0,
        };
        assert_approx_eq!(bounds.min_with_margin(), 49.0);
        assert_approx_eq!(bounds.max_with_margin(), 61.0);

        let bounds = Bounds { min: 0.0, max: 0.0 };
        assert_approx_eq!(bounds.min_with_margin(), 0.0);
        assert_approx_eq!(bounds.max_with_margin(), 0.1);
    }

    #[test]
    fn test_colors() {
        assert_eq!(colors(&Theme::Dark).0.rgb(), (255, 255, 255));
        assert_eq!(colors(&Theme::Light).1.rgb(), (255, 255, 255));
        assert_eq!(colors(&Theme::System).0.rgb(), (20, 22, 26));
    }
}
