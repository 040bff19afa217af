use eframe::egui::{pos2, vec2, Align2, Color32, FontId, Rect, Sense, Ui};

use crate::analysis::correlation::{correlation, CorrelationMatrix};
use crate::color::{correlation_color, label_color};
use crate::state::AppState;

const LABEL_WIDTH: f32 = 120.0;
const LABEL_HEIGHT: f32 = 24.0;

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Heatmap of the numeric correlation matrix, or a warning when there is
/// nothing numeric to correlate.
pub fn correlation_view(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = state.dataset() else {
        return;
    };

    match correlation(dataset) {
        Ok(matrix) => {
            ui.strong("Correlation Heatmap");
            heatmap(ui, &matrix, state.settings.heatmap_decimals);
        }
        Err(_) => {
            ui.colored_label(Color32::YELLOW, "No numeric columns to compute correlations.");
        }
    }
}

fn heatmap(ui: &mut Ui, matrix: &CorrelationMatrix, decimals: usize) {
    let n = matrix.len();
    let cell = ((ui.available_width() - LABEL_WIDTH) / n as f32).clamp(28.0, 80.0);
    let size = vec2(LABEL_WIDTH + cell * n as f32, cell * n as f32 + LABEL_HEIGHT);

    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    let text_color = ui.visuals().text_color();
    let font = FontId::proportional(12.0);

    let grid_origin = rect.min + vec2(LABEL_WIDTH, 0.0);
    let cell_rect = |row: usize, col: usize| {
        Rect::from_min_size(
            grid_origin + vec2(col as f32 * cell, row as f32 * cell),
            vec2(cell, cell),
        )
    };

    for (row, name) in matrix.columns.iter().enumerate() {
        painter.text(
            pos2(grid_origin.x - 6.0, grid_origin.y + (row as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            truncate(name, 16),
            font.clone(),
            text_color,
        );
        painter.text(
            pos2(
                grid_origin.x + (row as f32 + 0.5) * cell,
                grid_origin.y + n as f32 * cell + LABEL_HEIGHT / 2.0,
            ),
            Align2::CENTER_CENTER,
            truncate(name, (cell / 7.0) as usize),
            font.clone(),
            text_color,
        );

        for col in 0..n {
            let r = matrix.get(row, col).unwrap_or(f64::NAN);
            let bounds = cell_rect(row, col).shrink(1.0);
            painter.rect_filled(bounds, 0.0, correlation_color(r));
            painter.text(
                bounds.center(),
                Align2::CENTER_CENTER,
                format!("{r:.decimals$}"),
                font.clone(),
                label_color(r),
            );
        }
    }

    if let Some(pointer) = response.hover_pos() {
        let local = pointer - grid_origin;
        if local.x >= 0.0 && local.y >= 0.0 {
            let (row, col) = ((local.y / cell) as usize, (local.x / cell) as usize);
            if row < n && col < n {
                let r = matrix.get(row, col).unwrap_or(f64::NAN);
                let text = format!("{} × {}: {r:.4}", matrix.columns[row], matrix.columns[col]);
                response.on_hover_text_at_pointer(text);
            }
        }
    }
}

fn truncate(name: &str, max_chars: usize) -> String {
    let max_chars = max_chars.max(2);
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(max_chars - 1).collect();
        short.push('…');
        short
    }
}
