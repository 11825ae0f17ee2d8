use super::ui;
use crate::core::convert;
use crate::core::store::PriceStore;
use crate::core::swap::{self, SwapExecutor, SwapForm, SwapPhase};
use anyhow::{Result, bail};
use tracing::info;

/// Executes a single simulated swap of `amount` from `from` to `to`.
pub async fn run(
    store: &PriceStore,
    executor: &(dyn SwapExecutor + Send + Sync),
    amount: &str,
    from: &str,
    to: &str,
) -> Result<()> {
    let form = SwapForm::new(from, to).with_from_amount(amount, store);
    if form.from_amount != amount {
        bail!(swap::SwapError::EmptyAmount);
    }
    if let Err(e) = form.validate(store) {
        bail!(e);
    }

    println!("{}", super::quote::display_quote(store, amount, from, to));

    let pb = ui::new_spinner("Executing swap...");
    let (form, receipt) = swap::submit(form, store, executor).await;
    pb.finish_and_clear();

    match (&form.phase, receipt) {
        (SwapPhase::Success(_), Some(receipt)) => {
            info!(?receipt, "Swap completed");
            if let Some(line) = ui::status_line(&form.phase) {
                println!("\n{line}");
            }
            println!(
                "Received {} {}",
                ui::style_text(&convert::format_amount(receipt.received), ui::StyleType::Value),
                receipt.request.to_currency
            );
            Ok(())
        }
        (phase, _) => bail!(
            "{}",
            phase.message().unwrap_or(swap::SWAP_FAILURE_MESSAGE)
        ),
    }
}
