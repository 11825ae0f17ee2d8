//! The swap form as an explicit state value.
//!
//! Every user action consumes the current [`SwapForm`] and returns the next
//! one, so the conversion logic never touches shared mutable state.

use crate::core::convert::{self, ConversionRequest};
use crate::core::store::PriceStore;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const SWAP_SUCCESS_MESSAGE: &str = "Swap executed successfully!";
pub const SWAP_FAILURE_MESSAGE: &str = "Failed to execute swap. Please try again.";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwapError {
    #[error("Please enter a valid amount")]
    EmptyAmount,
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,
    #[error("Price information unavailable")]
    PriceUnavailable,
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwapPhase {
    Idle,
    Editing,
    Submitting,
    Success(String),
    Error(String),
}

impl SwapPhase {
    /// Status message to show the user, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            SwapPhase::Success(msg) | SwapPhase::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Side {
    From,
    To,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwapForm {
    pub from_amount: String,
    pub to_amount: String,
    pub from_currency: String,
    pub to_currency: String,
    pub phase: SwapPhase,
}

impl SwapForm {
    pub fn new(from_currency: &str, to_currency: &str) -> Self {
        Self {
            from_amount: String::new(),
            to_amount: String::new(),
            from_currency: from_currency.to_string(),
            to_currency: to_currency.to_string(),
            phase: SwapPhase::Idle,
        }
    }

    /// Applies a new from-amount. Input that is not digits with at most one
    /// decimal point leaves the form unchanged.
    pub fn with_from_amount(self, value: &str, store: &PriceStore) -> Self {
        if !is_amount_input(value) {
            debug!(value, "Ignoring non-numeric amount input");
            return self;
        }
        Self {
            from_amount: value.to_string(),
            phase: SwapPhase::Editing,
            ..self
        }
        .recalculated(store)
    }

    pub fn with_currency(self, side: Side, currency: &str, store: &PriceStore) -> Self {
        let currency = currency.to_string();
        let next = match side {
            Side::From => Self {
                from_currency: currency,
                ..self
            },
            Side::To => Self {
                to_currency: currency,
                ..self
            },
        };
        Self {
            phase: SwapPhase::Editing,
            ..next
        }
        .recalculated(store)
    }

    /// Like [`SwapForm::with_currency`] but only accepts currencies the store
    /// offers for selection, stored under the store's spelling of the symbol.
    pub fn select_currency(
        self,
        side: Side,
        currency: &str,
        store: &PriceStore,
    ) -> Result<Self, SwapError> {
        let Some(currency) = store.resolve(currency) else {
            return Err(SwapError::UnknownCurrency(currency.to_string()));
        };
        Ok(self.with_currency(side, currency, store))
    }

    /// Exchanges both currencies and amounts. Amounts move verbatim.
    pub fn flipped(self) -> Self {
        Self {
            from_amount: self.to_amount,
            to_amount: self.from_amount,
            from_currency: self.to_currency,
            to_currency: self.from_currency,
            phase: self.phase,
        }
    }

    fn recalculated(self, store: &PriceStore) -> Self {
        let to_amount = convert::parse_amount(&self.from_amount)
            .and_then(|amount| {
                convert::convert(store, amount, &self.from_currency, &self.to_currency)
            })
            .filter(|converted| *converted != 0.0)
            .map(convert::format_amount)
            .unwrap_or_default();
        Self { to_amount, ..self }
    }

    pub fn validate(&self, store: &PriceStore) -> Result<ConversionRequest, SwapError> {
        let amount = convert::parse_amount(&self.from_amount).ok_or(SwapError::EmptyAmount)?;
        if amount <= 0.0 {
            return Err(SwapError::NonPositiveAmount);
        }
        if store.latest_price(&self.from_currency).is_none()
            || store.latest_price(&self.to_currency).is_none()
        {
            return Err(SwapError::PriceUnavailable);
        }
        Ok(ConversionRequest::new(
            amount,
            &self.from_currency,
            &self.to_currency,
        ))
    }

    pub fn submitting(self) -> Self {
        Self {
            phase: SwapPhase::Submitting,
            ..self
        }
    }

    pub fn succeeded(self) -> Self {
        Self {
            from_amount: String::new(),
            to_amount: String::new(),
            phase: SwapPhase::Success(SWAP_SUCCESS_MESSAGE.to_string()),
            ..self
        }
    }

    pub fn failed(self) -> Self {
        Self {
            phase: SwapPhase::Error(SWAP_FAILURE_MESSAGE.to_string()),
            ..self
        }
    }

    pub fn rejected(self, err: &SwapError) -> Self {
        Self {
            phase: SwapPhase::Error(err.to_string()),
            ..self
        }
    }

    /// Clears a shown status message once its display timeout has passed.
    pub fn expired(self) -> Self {
        match self.phase {
            SwapPhase::Success(_) | SwapPhase::Error(_) => Self {
                phase: SwapPhase::Idle,
                ..self
            },
            _ => self,
        }
    }

    pub fn usd_values(&self, store: &PriceStore) -> (String, String) {
        (
            convert::usd_display(store, &self.from_amount, &self.from_currency),
            convert::usd_display(store, &self.to_amount, &self.to_currency),
        )
    }

    pub fn price_info(&self, store: &PriceStore) -> String {
        convert::rate_statement(store, &self.from_currency, &self.to_currency)
    }
}

fn is_amount_input(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit() || c == '.')
        && value.chars().filter(|c| *c == '.').count() <= 1
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwapReceipt {
    pub request: ConversionRequest,
    pub received: f64,
}

#[async_trait]
pub trait SwapExecutor: Send + Sync {
    async fn execute(
        &self,
        request: &ConversionRequest,
        store: &PriceStore,
    ) -> Result<SwapReceipt>;
}

/// Pretends to execute a swap by waiting a fixed delay.
pub struct SimulatedExecutor {
    delay: Duration,
}

impl SimulatedExecutor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl SwapExecutor for SimulatedExecutor {
    async fn execute(
        &self,
        request: &ConversionRequest,
        store: &PriceStore,
    ) -> Result<SwapReceipt> {
        debug!(?request, delay_ms = self.delay.as_millis() as u64, "Simulating swap");
        tokio::time::sleep(self.delay).await;
        let received = request
            .convert(store)
            .ok_or(SwapError::PriceUnavailable)?;
        Ok(SwapReceipt {
            request: request.clone(),
            received,
        })
    }
}

/// Validates and submits `form`, returning the form in its final phase along
/// with the receipt of a successful swap.
pub async fn submit(
    form: SwapForm,
    store: &PriceStore,
    executor: &(dyn SwapExecutor + Send + Sync),
) -> (SwapForm, Option<SwapReceipt>) {
    let request = match form.validate(store) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Swap rejected");
            return (form.rejected(&e), None);
        }
    };

    let form = form.submitting();
    match executor.execute(&request, store).await {
        Ok(receipt) => (form.succeeded(), Some(receipt)),
        Err(e) => {
            warn!(error = %e, "Swap failed");
            (form.failed(), None)
        }
    }
}
