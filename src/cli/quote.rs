use super::ui;
use crate::core::convert;
use crate::core::store::PriceStore;
use crate::core::swap::SwapForm;

/// Renders what `amount` of `from` is worth in `to`, along with both USD
/// values and the current rate.
pub fn display_quote(store: &PriceStore, amount: &str, from: &str, to: &str) -> String {
    let form = SwapForm::new(from, to).with_from_amount(amount, store);
    let Some(value) = convert::parse_amount(amount).filter(|_| form.from_amount == amount) else {
        return ui::style_text(
            &format!("Invalid amount: {amount}"),
            ui::StyleType::Error,
        );
    };

    let (from_usd, to_usd) = form.usd_values(store);
    let to_amount = match convert::convert(store, value, from, to) {
        Some(converted) => {
            ui::style_text(&convert::format_amount(converted), ui::StyleType::Value)
        }
        None => ui::style_text("N/A", ui::StyleType::Error),
    };

    format!(
        "{}  {} {} {}\n{}  {} {} {}\n\n{}",
        ui::style_text("From:", ui::StyleType::Label),
        ui::style_text(&form.from_amount, ui::StyleType::Value),
        form.from_currency,
        ui::style_text(&from_usd, ui::StyleType::Subtle),
        ui::style_text("To:  ", ui::StyleType::Label),
        to_amount,
        form.to_currency,
        ui::style_text(&to_usd, ui::StyleType::Subtle),
        display_rate(store, from, to),
    )
}

pub fn display_rate(store: &PriceStore, from: &str, to: &str) -> String {
    let statement = convert::rate_statement(store, from, to);
    if convert::rate(store, from, to).is_some() {
        statement
    } else {
        ui::style_text(&statement, ui::StyleType::Error)
    }
}

pub fn run_quote(store: &PriceStore, amount: &str, from: &str, to: &str) {
    println!("{}", display_quote(store, amount, from, to));
}

pub fn run_rate(store: &PriceStore, from: &str, to: &str) {
    println!("{}", display_rate(store, from, to));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::price::PriceObservation;

    fn sample_store() -> PriceStore {
        PriceStore::load(vec![
            PriceObservation::parse("ETH", "2024-01-01", 2000.0).unwrap(),
            PriceObservation::parse("ETH", "2024-01-02", 2200.0).unwrap(),
            PriceObservation::parse("USD", "2024-01-01", 1.0).unwrap(),
        ])
    }

    #[test]
    fn test_quote_output() {
        let output = display_quote(&sample_store(), "1", "ETH", "USD");
        assert!(output.contains("2200.000000"));
        assert!(output.contains("≈ $2200.00"));
        assert!(output.contains("1 ETH = 2200.000000 USD"));
    }

    #[test]
    fn test_quote_unknown_currency() {
        let output = display_quote(&sample_store(), "5", "BTC", "USD");
        assert!(output.contains("N/A"));
        assert!(output.contains("≈ $0.00"));
        assert!(output.contains(convert::PRICE_UNAVAILABLE));
    }

    #[test]
    fn test_quote_zero_amount() {
        let output = display_quote(&sample_store(), "0", "ETH", "USD");
        assert!(output.contains("0.000000"));
        assert!(!output.contains("N/A"));
    }

    #[test]
    fn test_quote_mixed_case_symbol() {
        let store = PriceStore::load(vec![
            PriceObservation::parse("bNEO", "2023-08-29T07:10:50.000Z", 7.5).unwrap(),
            PriceObservation::parse("USD", "2023-08-29T07:10:30.000Z", 1.0).unwrap(),
        ]);
        let output = display_quote(&store, "2", "bNEO", "USD");
        assert!(output.contains("15.000000"));
        assert!(output.contains("≈ $15.00"));
        assert!(output.contains("1 bNEO = 7.500000 USD"));
    }

    #[test]
    fn test_quote_invalid_amount() {
        assert!(display_quote(&sample_store(), "abc", "ETH", "USD").contains("Invalid amount"));
        assert!(display_quote(&sample_store(), "", "ETH", "USD").contains("Invalid amount"));
    }

    #[test]
    fn test_rate_output() {
        assert!(display_rate(&sample_store(), "USD", "ETH").contains("1 USD = 0.000455 ETH"));
    }
}
