use super::ui;
use crate::core::config::OutputFormat;
use crate::core::rates::{DateRates, Report};
use anyhow::{Context, Result};
use comfy_table::Cell;

const BANNER_WIDTH: usize = 27;
const NO_DATA: &str = "No data available";

pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Banner => Ok(render_banner(report)),
        OutputFormat::Table => Ok(render_table(report)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report as JSON")
        }
    }
}

/// Plain text rendering, one framed block per date.
pub fn render_banner(report: &Report) -> String {
    let double_rule = "=".repeat(BANNER_WIDTH);
    let single_rule = "-".repeat(BANNER_WIDTH);

    let mut output = String::new();
    for DateRates { date, quotes } in report.iter() {
        output.push_str(&format!("{double_rule}\nDate: {date}\n{single_rule}\n"));
        if quotes.is_empty() {
            output.push_str(&format!("{NO_DATA}\n"));
        } else {
            output.push_str(&format!(
                "{:^10}|{:^8}|{:^8}\n{single_rule}\n",
                "Currency", "Buy", "Sale"
            ));
            for quote in quotes {
                output.push_str(&format!(
                    "{:^10}|{:^8}|{:^8}\n",
                    quote.name,
                    ui::format_rate(quote.buy),
                    ui::format_rate(quote.sale)
                ));
            }
        }
        output.push_str(&format!("{double_rule}\n"));
    }
    output
}

pub fn render_table(report: &Report) -> String {
    let blocks: Vec<String> = report
        .iter()
        .map(|DateRates { date, quotes }| {
            let title = format!("Date: {}", ui::style_text(date, ui::StyleType::Title));
            if quotes.is_empty() {
                return format!(
                    "{title}\n{}",
                    ui::style_text(NO_DATA, ui::StyleType::Subtle)
                );
            }

            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("Currency"),
                ui::header_cell("Buy"),
                ui::header_cell("Sale"),
            ]);
            for quote in quotes {
                table.add_row(vec![
                    Cell::new(&quote.name),
                    ui::rate_cell(quote.buy),
                    ui::rate_cell(quote.sale),
                ]);
            }
            format!("{title}\n{table}")
        })
        .collect();

    blocks.join("\n\n")
}
