use super::ui;
use crate::core::analysis::{AnalysisReport, AnalysisRequest, AnalysisSettings, analyze_stock};
use crate::core::{MetadataProvider, PriceHistoryProvider};
use anyhow::{Context, Result};
use comfy_table::Cell;
use tracing::info;

pub async fn run(
    request: &AnalysisRequest,
    settings: &AnalysisSettings,
    history_provider: &(dyn PriceHistoryProvider + Send + Sync),
    metadata_provider: &(dyn MetadataProvider + Send + Sync),
    json: bool,
) -> Result<()> {
    let pb = ui::new_spinner(&format!("Fetching price history for {}...", request.ticker));
    let result = analyze_stock(history_provider, metadata_provider, request, settings).await;
    pb.finish_and_clear();

    let report = result?;
    info!(ticker = %report.ticker, cagr_pct = report.cagr_pct, "Analysis complete");

    println!("{}", render_report(&report, json)?);
    Ok(())
}

/// Renders `report` as pretty JSON or as the styled text tables.
pub fn render_report(report: &AnalysisReport, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(report).context("Failed to serialize analysis report")
    } else {
        Ok(report.display_as_text())
    }
}

impl AnalysisReport {
    pub fn summary_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Field"), ui::header_cell("Value")]);

        let name = match &self.short_name {
            Some(name) => format!("{name} ({})", self.ticker),
            None => self.ticker.clone(),
        };
        table.add_row(vec![Cell::new("Symbol"), Cell::new(name)]);
        table.add_row(vec![Cell::new("Sector"), Cell::new(&self.sector)]);
        table.add_row(vec![Cell::new("Currency"), Cell::new(&self.currency)]);
        table.add_row(vec![
            Cell::new(format!("{} CAGR", self.period)),
            ui::change_cell(self.cagr_pct),
        ]);
        table.add_row(vec![Cell::new("Buy Price"), ui::amount_cell(self.buy_price)]);
        table.add_row(vec![
            Cell::new("Previous Close"),
            ui::format_optional_cell(self.previous_close, |p| format!("{p:.2}")),
        ]);
        table.add_row(vec![
            Cell::new("Invested"),
            ui::amount_cell(self.invested_amount),
        ]);
        table.to_string()
    }

    pub fn projection_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Year"),
            ui::header_cell(&format!("Projected Price ({})", self.currency)),
            ui::header_cell("Profit"),
            ui::header_cell("Profit (%)"),
        ]);

        for entry in &self.projections {
            table.add_row(vec![
                Cell::new(entry.year),
                ui::amount_cell(entry.projected_price),
                ui::amount_cell(entry.profit_amount),
                ui::change_cell(entry.profit_pct),
            ]);
        }
        table.to_string()
    }

    pub fn display_as_text(&self) -> String {
        let mut out = format!(
            "\nAnalysis for {}\n{}\n\n{}\n{}",
            ui::style_text(&self.ticker, ui::StyleType::Title),
            self.summary_table(),
            ui::style_text("Future Year-by-Year Projections", ui::StyleType::Label),
            self.projection_table(),
        );
        if let Some(warning) = &self.warning {
            out.push_str(&format!(
                "\n{}",
                ui::style_text(&format!("Warning: {warning}"), ui::StyleType::Warning)
            ));
        }
        out.push_str(&format!(
            "\n{}",
            ui::style_text(
                "Projections assume the historical CAGR compounds unchanged every year.",
                ui::StyleType::Subtle
            )
        ));
        out
    }
}
