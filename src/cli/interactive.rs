//! Line driven swap form.
//!
//! Each line read from the input is one user action on the form. After a
//! submission the status message stays up until the next action or until the
//! status timeout runs out, whichever comes first.

use super::ui;
use crate::core::convert;
use crate::core::store::PriceStore;
use crate::core::swap::{self, Side, SwapExecutor, SwapForm};
use anyhow::{Result, anyhow};
use std::io::Write;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  amount <value>   set the amount to swap
  from <symbol>    select the currency to pay with
  to <symbol>      select the currency to receive
  flip             exchange both sides
  submit           execute the swap
  show             print the form
  list             list available currencies
  help             print this help
  quit             leave";

#[derive(Debug, PartialEq)]
enum FormCommand {
    Amount(String),
    From(String),
    To(String),
    Flip,
    Submit,
    Show,
    List,
    Help,
    Quit,
}

impl FromStr for FormCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(anyhow!("Too many arguments: {}", s));
        }

        match (name.as_str(), arg) {
            ("amount", Some(value)) => Ok(FormCommand::Amount(value.to_string())),
            ("amount", None) => Ok(FormCommand::Amount(String::new())),
            ("from", Some(symbol)) => Ok(FormCommand::From(symbol.to_string())),
            ("to", Some(symbol)) => Ok(FormCommand::To(symbol.to_string())),
            ("flip", None) => Ok(FormCommand::Flip),
            ("submit", None) => Ok(FormCommand::Submit),
            ("show", None) => Ok(FormCommand::Show),
            ("list", None) => Ok(FormCommand::List),
            ("help", None) => Ok(FormCommand::Help),
            ("quit" | "exit", None) => Ok(FormCommand::Quit),
            _ => Err(anyhow!("Unknown command: {}. Type 'help' for usage.", s)),
        }
    }
}

/// Renders both sides of the form, the rate and any status message.
pub fn render(form: &SwapForm, store: &PriceStore) -> String {
    let (from_usd, to_usd) = form.usd_values(store);
    let show = |amount: &str| {
        if amount.is_empty() {
            ui::style_text("0", ui::StyleType::Subtle)
        } else {
            ui::style_text(amount, ui::StyleType::Value)
        }
    };

    let mut output = format!(
        "{} {} {} {}\n{} {} {} {}\n{}",
        ui::style_text("From:", ui::StyleType::Label),
        show(&form.from_amount),
        form.from_currency,
        ui::style_text(&from_usd, ui::StyleType::Subtle),
        ui::style_text("To:  ", ui::StyleType::Label),
        show(&form.to_amount),
        form.to_currency,
        ui::style_text(&to_usd, ui::StyleType::Subtle),
        form.price_info(store),
    );
    if let Some(line) = ui::status_line(&form.phase) {
        output.push_str(&format!("\n{line}"));
    }
    output
}

/// Runs the form against `input` until it is exhausted or the user quits.
/// Returns the form in its final state.
pub async fn run_session<R, W>(
    input: R,
    out: &mut W,
    store: &PriceStore,
    executor: &(dyn SwapExecutor + Send + Sync),
    mut form: SwapForm,
    status_timeout: Duration,
) -> Result<SwapForm>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{}", render(&form, store))?;

    loop {
        let line = if form.phase.message().is_some() {
            tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::time::sleep(status_timeout) => {
                    debug!("Status message expired");
                    form = form.expired();
                    continue;
                }
            }
        } else {
            lines.next_line().await?
        };

        let Some(line) = line else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match line.parse::<FormCommand>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
                continue;
            }
        };
        debug!(?command, "Applying form command");

        // A new action dismisses any status message still on screen
        form = form.expired();
        form = match command {
            FormCommand::Amount(value) => {
                let next = form.with_from_amount(&value, store);
                if next.from_amount != value {
                    writeln!(
                        out,
                        "{}",
                        ui::style_text(&format!("Invalid amount: {value}"), ui::StyleType::Error)
                    )?;
                }
                next
            }
            FormCommand::From(symbol) => select_side(form, Side::From, &symbol, store, out)?,
            FormCommand::To(symbol) => select_side(form, Side::To, &symbol, store, out)?,
            FormCommand::Flip => form.flipped(),
            FormCommand::Submit => {
                writeln!(out, "Submitting swap...")?;
                let (next, receipt) = swap::submit(form, store, executor).await;
                if let Some(receipt) = receipt {
                    writeln!(
                        out,
                        "Received {} {}",
                        convert::format_amount(receipt.received),
                        receipt.request.to_currency
                    )?;
                }
                next
            }
            FormCommand::List => {
                writeln!(out, "{}", store.currencies().join(", "))?;
                continue;
            }
            FormCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            FormCommand::Show => form,
            FormCommand::Quit => break,
        };

        writeln!(out, "{}", render(&form, store))?;
    }

    Ok(form)
}

fn select_side<W: Write>(
    form: SwapForm,
    side: Side,
    symbol: &str,
    store: &PriceStore,
    out: &mut W,
) -> Result<SwapForm> {
    match form.clone().select_currency(side, symbol, store) {
        Ok(next) => Ok(next),
        Err(e) => {
            writeln!(out, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
            Ok(form)
        }
    }
}

pub async fn run(
    store: &PriceStore,
    executor: &(dyn SwapExecutor + Send + Sync),
    form: SwapForm,
    status_timeout: Duration,
) -> Result<()> {
    println!("{HELP}\n");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_session(stdin, &mut stdout, store, executor, form, status_timeout).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::price::PriceObservation;
    use crate::core::swap::{SimulatedExecutor, SwapPhase};
    use tokio::io::AsyncWriteExt;

    fn sample_store() -> PriceStore {
        PriceStore::load(vec![
            PriceObservation::parse("ETH", "2024-01-01", 2000.0).unwrap(),
            PriceObservation::parse("ETH", "2024-01-02", 2200.0).unwrap(),
            PriceObservation::parse("USD", "2024-01-01", 1.0).unwrap(),
            PriceObservation::parse("ATOM", "2024-01-01", 8.0).unwrap(),
        ])
    }

    async fn session(script: &str) -> (SwapForm, String) {
        let store = sample_store();
        let executor = SimulatedExecutor::new(Duration::from_millis(1));
        let mut out = Vec::new();
        let form = run_session(
            script.as_bytes(),
            &mut out,
            &store,
            &executor,
            SwapForm::new("ETH", "USD"),
            Duration::from_secs(3),
        )
        .await
        .unwrap();
        (form, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "amount 1.5".parse::<FormCommand>().unwrap(),
            FormCommand::Amount("1.5".to_string())
        );
        assert_eq!(
            "FROM atom".parse::<FormCommand>().unwrap(),
            FormCommand::From("atom".to_string())
        );
        assert_eq!(
            "to bNEO".parse::<FormCommand>().unwrap(),
            FormCommand::To("bNEO".to_string())
        );
        assert_eq!("exit".parse::<FormCommand>().unwrap(), FormCommand::Quit);
        assert!("flip now".parse::<FormCommand>().is_err());
        assert!("dance".parse::<FormCommand>().is_err());
        assert!("to".parse::<FormCommand>().is_err());
    }

    #[tokio::test]
    async fn test_editing_updates_form() {
        let (form, output) = session("amount 2\nto atom\nflip\nquit\n").await;

        assert_eq!(form.from_currency, "ATOM");
        assert_eq!(form.to_currency, "ETH");
        assert_eq!(form.from_amount, "550.000000");
        assert_eq!(form.to_amount, "2");
        assert!(output.contains("1 ETH = 275.000000 ATOM"));
        assert!(output.contains("≈ $4400.00"));
    }

    #[tokio::test]
    async fn test_mixed_case_symbols_convert() {
        let store = PriceStore::load(vec![
            PriceObservation::parse("bNEO", "2023-08-29T07:10:50.000Z", 7.5).unwrap(),
            PriceObservation::parse("USD", "2023-08-29T07:10:30.000Z", 1.0).unwrap(),
        ]);
        let executor = SimulatedExecutor::new(Duration::from_millis(1));
        let mut out = Vec::new();
        let form = run_session(
            "from bNEO\namount 2\nto usd\n".as_bytes(),
            &mut out,
            &store,
            &executor,
            SwapForm::new("ETH", "USD"),
            Duration::from_secs(3),
        )
        .await
        .unwrap();

        assert_eq!(form.from_currency, "bNEO");
        assert_eq!(form.to_currency, "USD");
        assert_eq!(form.to_amount, "15.000000");
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("1 bNEO = 7.500000 USD"));
        assert!(!output.contains("Unknown currency"));
    }

    #[tokio::test]
    async fn test_rejected_input_keeps_form() {
        let (form, output) = session("amount 1\namount abc\nfrom DOGE\nbogus\n").await;

        assert_eq!(form.from_amount, "1");
        assert_eq!(form.from_currency, "ETH");
        assert!(output.contains("Invalid amount: abc"));
        assert!(output.contains("Unknown currency: DOGE"));
        assert!(output.contains("Unknown command: bogus"));
    }

    #[tokio::test]
    async fn test_submit_flow() {
        let (form, output) = session("submit\namount 1\nsubmit\n").await;

        assert!(output.contains("Please enter a valid amount"));
        assert!(output.contains("Received 2200.000000 USD"));
        assert!(output.contains(swap::SWAP_SUCCESS_MESSAGE));
        assert_eq!(form.phase, SwapPhase::Success(swap::SWAP_SUCCESS_MESSAGE.to_string()));
        assert_eq!(form.from_amount, "");
    }

    #[tokio::test]
    async fn test_status_message_expires() {
        let store = sample_store();
        let executor = SimulatedExecutor::new(Duration::from_millis(1));
        let (reader, mut writer) = tokio::io::duplex(256);

        let feeder = tokio::spawn(async move {
            writer.write_all(b"amount 1\nsubmit\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(200)).await;
            writer.write_all(b"show\n").await.unwrap();
        });

        let mut out = Vec::new();
        let form = run_session(
            BufReader::new(reader),
            &mut out,
            &store,
            &executor,
            SwapForm::new("ETH", "USD"),
            Duration::from_millis(20),
        )
        .await
        .unwrap();
        feeder.await.unwrap();

        assert_eq!(form.phase, SwapPhase::Idle);
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains(swap::SWAP_SUCCESS_MESSAGE));
    }
}
