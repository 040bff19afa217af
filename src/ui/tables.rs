use eframe::egui::{self, Align, Color32, Layout, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::analysis::summary::{head, overview, SummaryCell};
use crate::data::model::{CellValue, TabularDataset};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Generic grid
// ---------------------------------------------------------------------------

/// Header + `n_rows` rows; `cell(row, col)` supplies the text.
fn grid(
    ui: &mut Ui,
    id: &str,
    header: &[String],
    n_rows: usize,
    max_height: Option<f32>,
    cell: impl Fn(usize, usize) -> RichText,
) {
    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal()
            .id_salt(id)
            .show(ui, |ui: &mut Ui| {
                let mut table = TableBuilder::new(ui)
                    .striped(true)
                    .resizable(true)
                    .cell_layout(Layout::left_to_right(Align::Center))
                    .columns(TableColumn::auto().at_least(60.0), header.len());
                table = match max_height {
                    Some(h) => table.max_scroll_height(h),
                    None => table.vscroll(false),
                };

                table
                    .header(20.0, |mut row| {
                        for name in header {
                            row.col(|ui: &mut Ui| {
                                ui.strong(name);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(ROW_HEIGHT, n_rows, |mut row| {
                            let r = row.index();
                            for c in 0..header.len() {
                                row.col(|ui: &mut Ui| {
                                    ui.label(cell(r, c));
                                });
                            }
                        });
                    });
            });
    });
}

fn cell_text(value: &CellValue) -> RichText {
    match value {
        CellValue::Null => RichText::new("None").weak(),
        other => RichText::new(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Dataset views
// ---------------------------------------------------------------------------

/// First rows of the dataset, with the row index in front.
pub fn preview(ui: &mut Ui, dataset: &TabularDataset, n: usize) {
    let rows = head(dataset, n);
    let mut header = vec![String::new()];
    header.extend(dataset.column_names());

    grid(ui, "preview", &header, rows.len(), None, |r, c| {
        if c == 0 {
            RichText::new(r.to_string()).weak()
        } else {
            cell_text(rows[r][c - 1])
        }
    });
}

/// Every row, scrollable.
pub fn raw_data(ui: &mut Ui, dataset: &TabularDataset) {
    let mut header = vec![String::new()];
    header.extend(dataset.column_names());
    let columns = dataset.columns();

    grid(ui, "raw_data", &header, dataset.n_rows(), Some(400.0), |r, c| {
        if c == 0 {
            RichText::new(r.to_string()).weak()
        } else {
            cell_text(&columns[c - 1].values()[r])
        }
    });
}

/// Shape, column kinds and missing values side by side.
pub fn overview_panel(ui: &mut Ui, dataset: &TabularDataset) {
    let o = overview(dataset);
    ui.columns(3, |cols: &mut [Ui]| {
        cols[0].strong("Shape");
        cols[0].label(format!("{} rows, {} columns", o.n_rows, o.n_columns));

        cols[1].strong("Column Types");
        for (kind, n) in &o.kind_counts {
            cols[1].label(format!("{kind}: {n}"));
        }

        cols[2].strong("Missing Values");
        for (name, n) in &o.missing {
            cols[2].label(format!("{name}: {n}"));
        }
    });
}

/// Descriptive statistics with the "Show all columns" toggle.
pub fn summary_panel(ui: &mut Ui, state: &mut AppState) {
    ui.checkbox(&mut state.show_all_stats, "Show all columns");

    let table = match state.summary() {
        None => return,
        Some(Ok(table)) => table,
        Some(Err(e)) => {
            ui.colored_label(Color32::RED, e.to_string());
            return;
        }
    };

    let mut header = vec![String::new()];
    header.extend(table.columns.iter().map(|c| c.name.clone()));

    grid(ui, "summary", &header, table.statistics.len(), None, |r, c| {
        if c == 0 {
            return RichText::new(table.statistics[r].label()).strong();
        }
        match &table.columns[c - 1].cells[r] {
            SummaryCell::Empty => RichText::new("NaN").weak(),
            other => RichText::new(other.to_string()),
        }
    });
}
