use rust_xlsxwriter::{Chart, ChartType, Workbook, XlsxError};

use crate::analyzer::dashboard::DashboardView;
use crate::analyzer::window::WindowLength;
use crate::error::AppError;
use crate::export::{
    create_date_format, create_header_format, create_integer_format, create_percent_format,
};

const TREND_SHEET: &str = "Trend";

/// Builds the dashboard workbook, 2 sheets:
/// - "Trend"   : one row per series point plus an area chart of the series
/// - "Metrics" : metric cards, then the period comparison when enabled
pub fn generate_dashboard_report(view: &DashboardView) -> Result<Vec<u8>, AppError> {
    let mut wb = Workbook::new();
    write_trend(&mut wb, view)?;
    write_metrics(&mut wb, view)?;
    Ok(wb.save_to_buffer()?)
}

// ── Sheet 1: Trend ───────────────────────────────────────────────────────────

fn write_trend(wb: &mut Workbook, view: &DashboardView) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name(TREND_SHEET)?;

    let hdr = create_header_format();
    let date = create_date_format();
    let int = create_integer_format();

    ws.write_with_format(0, 0, "Date", &hdr)?;
    ws.write_with_format(0, 1, "Panels", &hdr)?;

    for (i, p) in view.series.points.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write_with_format(row, 0, &p.date, &date)?;
        ws.write_with_format(row, 1, p.count as f64, &int)?;
    }

    let last_row = view.series.points.len() as u32;
    if last_row > 0 {
        ws.set_freeze_panes(1, 0)?;

        let mut chart = Chart::new(ChartType::Area);
        chart
            .add_series()
            .set_name("Panels")
            .set_categories((TREND_SHEET, 1, 0, last_row, 0))
            .set_values((TREND_SHEET, 1, 1, last_row, 1));
        chart.title().set_name(&format!(
            "Panel Production Over Time ({})",
            view.series.range.label()
        ));
        chart.legend().set_hidden();
        ws.insert_chart(1, 3, &chart)?;
    }

    ws.set_column_width(0, 14)?;
    ws.set_column_width(1, 12)?;

    Ok(())
}

// ── Sheet 2: Metrics ─────────────────────────────────────────────────────────

fn write_metrics(wb: &mut Workbook, view: &DashboardView) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Metrics")?;

    let hdr = create_header_format();
    let int = create_integer_format();
    let pct = create_percent_format();

    let headers = ["Metric", "Value", "Change"];
    for (col, h) in headers.iter().enumerate() {
        ws.write_with_format(0, col as u16, *h, &hdr)?;
    }

    for (i, card) in view.cards.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write(row, 0, card.title.as_str())?;
        ws.write(row, 1, card.value.as_str())?;
        if let Some(change) = &card.change {
            ws.write(row, 2, change.as_str())?;
        }
    }

    if let Some(cmp) = &view.comparison {
        let start = (view.cards.len() + 2) as u32;
        ws.write_with_format(start, 0, "Comparison", &hdr)?;
        ws.write_with_format(start, 1, cmp.window_label.as_str(), &hdr)?;

        ws.write(start + 1, 0, "Current period")?;
        ws.write_with_format(start + 1, 1, cmp.current as f64, &int)?;
        ws.write(start + 2, 0, format!("Previous period ({})", cmp.comparison_label))?;
        ws.write_with_format(start + 2, 1, cmp.previous as f64, &int)?;
        ws.write(start + 3, 0, "Change")?;
        ws.write_with_format(start + 3, 1, cmp.percentage_change / 100.0, &pct)?;
        ws.write(start + 4, 0, "Trend")?;
        ws.write(start + 4, 1, cmp.trend.label())?;
    }

    ws.set_column_width(0, 32)?;
    ws.set_column_width(1, 16)?;
    ws.set_column_width(2, 12)?;

    Ok(())
}
