use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, PlotUi, Points,
};

use crate::analysis::chart::{build_chart, Chart, ChartData, XySeries};
use crate::color::{generate_palette, series_color};
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 360.0;

// ---------------------------------------------------------------------------
// Selected chart (central panel)
// ---------------------------------------------------------------------------

/// Render the chart chosen in the sidebar, or the reason it cannot be drawn.
pub fn chart_view(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = state.dataset() else {
        return;
    };

    let chart = match build_chart(dataset, &state.chart, &state.settings) {
        Ok(chart) => chart,
        Err(e) => {
            ui.colored_label(Color32::YELLOW, e.to_string());
            return;
        }
    };

    ui.strong(&chart.title);
    draw(ui, &chart);
}

fn draw(ui: &mut Ui, chart: &Chart) {
    let color = series_color();

    match &chart.data {
        ChartData::Histogram { column, bins } => {
            let bars: Vec<Bar> = bins
                .iter()
                .map(|b| {
                    Bar::new((b.start + b.end) / 2.0, b.count as f64)
                        .width(b.end - b.start)
                        .name(format!("{:.3} – {:.3}", b.start, b.end))
                })
                .collect();

            Plot::new("histogram")
                .height(PLOT_HEIGHT)
                .x_axis_label(column.as_str())
                .y_axis_label("count")
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(&chart.title));
                });
        }
        ChartData::Bar(counts) => {
            let palette = generate_palette(counts.counts.len());
            let labels: Vec<String> = counts.counts.iter().map(|(v, _)| v.to_string()).collect();
            let bars: Vec<Bar> = counts
                .counts
                .iter()
                .zip(palette)
                .enumerate()
                .map(|(i, ((value, n), fill))| {
                    Bar::new(i as f64, *n as f64)
                        .width(0.8)
                        .name(value.to_string())
                        .fill(fill)
                })
                .collect();

            Plot::new("bar_chart")
                .height(PLOT_HEIGHT)
                .x_axis_label(counts.column.as_str())
                .y_axis_label("count")
                .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                    category_label(&labels, mark.value)
                })
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).name(&chart.title));
                });
        }
        ChartData::Line(series) => {
            xy_plot(ui, "line_chart", series, |plot_ui| {
                let points: PlotPoints = series.points.clone().into();
                plot_ui.line(Line::new(points).name(&series.y_label).color(color).width(1.5));
            });
        }
        ChartData::Scatter(series) => {
            xy_plot(ui, "scatter_plot", series, |plot_ui| {
                let points: PlotPoints = series.points.clone().into();
                plot_ui.points(Points::new(points).name(&series.y_label).color(color).radius(3.0));
            });
        }
        ChartData::Box(summary) => {
            let elem = BoxElem::new(
                0.0,
                BoxSpread::new(
                    summary.lower_whisker,
                    summary.q1,
                    summary.median,
                    summary.q3,
                    summary.upper_whisker,
                ),
            )
            .name(&summary.column)
            .box_width(0.5)
            .whisker_width(0.3);

            let outliers: Vec<[f64; 2]> = summary.outliers.iter().map(|&v| [0.0, v]).collect();

            Plot::new("box_plot")
                .height(PLOT_HEIGHT)
                .legend(Legend::default())
                .y_axis_label(summary.column.as_str())
                .show(ui, |plot_ui| {
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).color(color).name(&summary.column));
                    if !outliers.is_empty() {
                        plot_ui.points(
                            Points::new(PlotPoints::from(outliers))
                                .color(color)
                                .radius(3.0)
                                .name("outliers"),
                        );
                    }
                });
        }
    }
}

/// Shared frame for line and scatter charts: axis names and, for a
/// non-numeric x, category tick labels.
fn xy_plot(ui: &mut Ui, id: &str, series: &XySeries, add: impl FnOnce(&mut PlotUi)) {
    let mut plot = Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(series.x_label.clone())
        .y_axis_label(series.y_label.clone());

    if let Some(categories) = series.x_categories.clone() {
        plot = plot.x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&categories, mark.value)
        });
    }
    plot.show(ui, add);
}

/// Tick text for integer positions, blank between categories.
fn category_label(labels: &[String], position: f64) -> String {
    if position < 0.0 || position.fract().abs() > 1e-9 {
        return String::new();
    }
    labels.get(position as usize).cloned().unwrap_or_default()
}
