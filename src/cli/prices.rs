use super::ui;
use crate::core::store::PriceStore;
use comfy_table::Cell;

/// Renders the latest price of every currency in the store.
pub fn display_as_table(store: &PriceStore) -> String {
    if store.is_empty() {
        return ui::style_text("No prices available.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Price (USD)"),
        ui::header_cell("As of"),
    ]);

    for currency in store.currencies() {
        if let Some(latest) = store.latest(currency) {
            table.add_row(vec![
                Cell::new(currency),
                ui::number_cell(format!("{:.6}", latest.price())),
                Cell::new(latest.date().format("%Y-%m-%d %H:%M:%S UTC").to_string()),
            ]);
        }
    }

    format!(
        "{}\n\n{}\n\n{} currencies, {} observations",
        ui::style_text("Latest prices", ui::StyleType::Title),
        table,
        store.currencies().len(),
        store.len()
    )
}

pub fn run(store: &PriceStore) {
    println!("{}", display_as_table(store));
}
