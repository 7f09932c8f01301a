use std::fmt::Write;

use crate::infra::history::HistoryRecord;

use super::card::format_brl;

const HEADERS: [&str; 6] = ["Data", "Marketplace", "Custo", "Margem", "Preço", "Lucro"];

/// Fixed-width table of saved calculations, newest first.
pub fn render_history(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return "Nenhum cálculo salvo.\n".to_string();
    }

    let rows: Vec<[String; 6]> = records
        .iter()
        .map(|record| {
            let date = record
                .recorded_at()
                .map(|at| {
                    format!(
                        "{:04}-{:02}-{:02} {:02}:{:02}",
                        at.year(),
                        u8::from(at.month()),
                        at.day(),
                        at.hour(),
                        at.minute()
                    )
                })
                .unwrap_or_else(|| record.recorded_at.clone());
            [
                date,
                record.marketplace.name().to_string(),
                format_brl(record.cost_price),
                format!("{}%", record.margin_percent.normalize()),
                format_brl(record.selling_price),
                format_brl(record.profit),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", padded.join("  ").trim_end());
}
