//! Minimal painter-drawn charts for the progress and analytics views.

use super::style;
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Stroke, StrokeKind};

const CHART_HEIGHT: f32 = 180.0;
const AXIS_MARGIN: f32 = 22.0;
const MIN_CHART_WIDTH: f32 = 240.0;

/// Large value with a small caption above it.
pub(super) fn metric(ui: &mut egui::Ui, caption: &str, value: &str) {
    let palette = style::palette();
    ui.vertical(|ui| {
        ui.label(RichText::new(caption).color(palette.text_muted));
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

/// Line chart over labelled points; missing values break the line.
pub(super) fn line_chart(ui: &mut egui::Ui, points: &[(String, Option<f64>)], color: Color32) {
    let (rect, plot) = allocate_chart(ui);
    let values: Vec<Option<f64>> = points.iter().map(|(_, value)| *value).collect();
    let max = axis_max(values.iter().flatten().copied());
    let positions = line_positions(&values, max, plot);
    let painter = ui.painter_at(rect);
    draw_axis_label(&painter, plot, max);

    let stroke = Stroke::new(2.0, color);
    for pair in positions.windows(2) {
        if let [Some(a), Some(b)] = pair {
            painter.line_segment([*a, *b], stroke);
        }
    }
    for position in positions.iter().flatten() {
        painter.circle_filled(*position, 3.0, color);
    }
    let label_positions = label_slots(points.len(), plot);
    for ((label, _), x) in points.iter().zip(label_positions) {
        draw_x_label(&painter, x, plot.bottom(), label);
    }
}

/// Vertical bar chart over labelled counts.
pub(super) fn bar_chart(ui: &mut egui::Ui, bars: &[(String, usize)], color: Color32) {
    let (rect, plot) = allocate_chart(ui);
    let max = axis_max(bars.iter().map(|(_, count)| *count as f64));
    let painter = ui.painter_at(rect);
    draw_axis_label(&painter, plot, max);
    for ((label, count), bar) in bars.iter().zip(bar_rects(bars, max, plot)) {
        painter.rect_filled(bar, 0.0, color);
        painter.text(
            bar.center_top() - egui::vec2(0.0, 2.0),
            Align2::CENTER_BOTTOM,
            count.to_string(),
            FontId::proportional(11.0),
            style::palette().text_primary,
        );
        draw_x_label(&painter, bar.center().x, plot.bottom(), label);
    }
}

fn allocate_chart(ui: &mut egui::Ui) -> (Rect, Rect) {
    let palette = style::palette();
    let width = ui.available_width().max(MIN_CHART_WIDTH);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, CHART_HEIGHT), egui::Sense::hover());
    ui.painter().rect_filled(rect, 0.0, palette.bg_secondary);
    ui.painter()
        .rect_stroke(rect, 0.0, style::chart_border(), StrokeKind::Inside);
    let plot = Rect::from_min_max(
        rect.min + egui::vec2(AXIS_MARGIN * 1.5, AXIS_MARGIN * 0.5),
        rect.max - egui::vec2(AXIS_MARGIN * 0.5, AXIS_MARGIN),
    );
    (rect, plot)
}

fn draw_axis_label(painter: &egui::Painter, plot: Rect, max: f64) {
    let palette = style::palette();
    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        Stroke::new(1.0, palette.panel_outline),
    );
    painter.text(
        plot.left_top() - egui::vec2(4.0, 0.0),
        Align2::RIGHT_TOP,
        format_tick(max),
        FontId::proportional(10.0),
        palette.text_muted,
    );
    painter.text(
        plot.left_bottom() - egui::vec2(4.0, 0.0),
        Align2::RIGHT_BOTTOM,
        "0",
        FontId::proportional(10.0),
        palette.text_muted,
    );
}

fn draw_x_label(painter: &egui::Painter, x: f32, bottom: f32, label: &str) {
    painter.text(
        egui::pos2(x, bottom + 3.0),
        Align2::CENTER_TOP,
        label,
        FontId::proportional(10.0),
        style::palette().text_muted,
    );
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Upper bound of the value axis; never zero.
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if max <= 0.0 { 1.0 } else { max }
}

/// Evenly spaced x centres for `count` slots across the plot.
fn label_slots(count: usize, plot: Rect) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let step = plot.width() / count as f32;
    (0..count)
        .map(|index| plot.left() + step * (index as f32 + 0.5))
        .collect()
}

fn line_positions(values: &[Option<f64>], max: f64, plot: Rect) -> Vec<Option<Pos2>> {
    values
        .iter()
        .zip(label_slots(values.len(), plot))
        .map(|(value, x)| {
            value.map(|value| {
                let ratio = (value / max).clamp(0.0, 1.0) as f32;
                egui::pos2(x, plot.bottom() - ratio * plot.height())
            })
        })
        .collect()
}

fn bar_rects(bars: &[(String, usize)], max: f64, plot: Rect) -> Vec<Rect> {
    if bars.is_empty() {
        return Vec::new();
    }
    let slot = plot.width() / bars.len() as f32;
    let bar_width = (slot * 0.6).min(80.0);
    bars.iter()
        .zip(label_slots(bars.len(), plot))
        .map(|((_, count), x)| {
            let height = (*count as f64 / max).clamp(0.0, 1.0) as f32 * plot.height();
            Rect::from_min_max(
                egui::pos2(x - bar_width / 2.0, plot.bottom() - height),
                egui::pos2(x + bar_width / 2.0, plot.bottom()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot() -> Rect {
        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(100.0, 50.0))
    }

    #[test]
    fn empty_or_zero_series_still_has_an_axis() {
        assert_eq!(axis_max(std::iter::empty()), 1.0);
        assert_eq!(axis_max([0.0, 0.0].into_iter()), 1.0);
        assert_eq!(axis_max([2.5, 4.0].into_iter()), 4.0);
    }

    #[test]
    fn missing_values_leave_gaps() {
        let positions = line_positions(&[Some(4.0), None, Some(2.0), Some(0.0)], 4.0, plot());
        assert_eq!(positions[0], Some(egui::pos2(12.5, 0.0)));
        assert_eq!(positions[1], None);
        assert_eq!(positions[2], Some(egui::pos2(62.5, 25.0)));
        assert_eq!(positions[3], Some(egui::pos2(87.5, 50.0)));
    }

    #[test]
    fn bars_scale_to_tallest() {
        let bars = vec![("Completed".to_string(), 2), ("Missed".to_string(), 1)];
        let rects = bar_rects(&bars, 2.0, plot());
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].height(), 50.0);
        assert_eq!(rects[1].height(), 25.0);
        assert_eq!(rects[0].center().x, 25.0);
        assert_eq!(rects[1].center().x, 75.0);
    }

    #[test]
    fn ticks_drop_trailing_zero() {
        assert_eq!(format_tick(3.0), "3");
        assert_eq!(format_tick(2.5), "2.5");
    }
}
