use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::LongRecord;

/// Table of the rows currently plotted.
pub fn rows_table(ui: &mut Ui, rows: &[LongRecord]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Country");
            });
            header.col(|ui| {
                ui.strong("Year");
            });
            header.col(|ui| {
                ui.strong("GDP per Capita");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let r = &rows[row.index()];
                row.col(|ui| {
                    ui.label(&r.country);
                });
                row.col(|ui| {
                    ui.label(r.year.to_string());
                });
                row.col(|ui| {
                    match r.value {
                        Some(v) => ui.label(format!("{v:.1}")),
                        None => ui.weak("–"),
                    };
                });
            });
        });
}
