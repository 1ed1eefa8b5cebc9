use super::ui;
use crate::core::Quote;
use crate::portfolio::{self, PortfolioSnapshot};
use crate::server::AppState;
use anyhow::Result;
use comfy_table::Table;

/// Fetches one snapshot and prints it, as tables or as raw JSON.
pub async fn run(state: &AppState, json: bool) -> Result<()> {
    let snapshot = portfolio::build_snapshot(
        &state.portfolio,
        state.quote_provider.as_ref(),
        state.rate_provider.as_ref(),
    )
    .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        display_snapshot(&snapshot);
    }
    Ok(())
}

fn display_snapshot(snapshot: &PortfolioSnapshot) {
    for (title, quotes) in snapshot.groups() {
        if quotes.is_empty() {
            continue;
        }
        println!("\n{}", ui::style_text(title, ui::StyleType::Title));
        println!("{}", quotes_table(quotes));
    }

    ui::print_separator();
    println!(
        "\n{}",
        ui::style_text("Exchange Rates", ui::StyleType::Title)
    );
    println!("{}", rates_table(snapshot));

    println!(
        "\n{}",
        ui::style_text(
            &format!("Generated at {}", snapshot.timestamp.to_rfc3339()),
            ui::StyleType::Subtle
        )
    );
}

pub fn quotes_table(quotes: &[Quote]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Ticker"),
        ui::header_cell("Price"),
        ui::header_cell("Change"),
        ui::header_cell("Change %"),
    ]);

    for quote in quotes {
        let sign = if quote.change >= 0.0 { "+" } else { "" };
        table.add_row(vec![
            comfy_table::Cell::new(&quote.name),
            comfy_table::Cell::new(&quote.ticker),
            ui::number_cell(format!("{:.2} {}", quote.current_price, quote.currency)),
            ui::change_cell(format!("{sign}{:.2}", quote.change), quote.change),
            ui::change_cell(
                format!("{sign}{:.2}%", quote.change_percent),
                quote.change,
            ),
        ]);
    }
    table
}

pub fn rates_table(snapshot: &PortfolioSnapshot) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("Rate"),
        ui::header_cell("Updated"),
    ]);

    for (label, rate) in &snapshot.exchange_rates {
        let pair = label.replace('_', "/");
        match rate {
            Some(rate) => table.add_row(vec![
                comfy_table::Cell::new(pair),
                ui::number_cell(format!("{:.4}", rate.rate)),
                comfy_table::Cell::new(&rate.last_update),
            ]),
            None => table.add_row(vec![
                comfy_table::Cell::new(pair),
                comfy_table::Cell::new(ui::style_text("unavailable", ui::StyleType::Error)),
                comfy_table::Cell::new(""),
            ]),
        };
    }
    table
}
