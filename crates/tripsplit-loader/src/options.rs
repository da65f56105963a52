//! Display options resolved from the command line, the snapshot and the
//! environment.

use crate::Snapshot;
use tripsplit_core::Currency;

/// Environment variable naming the fallback display currency.
pub const CURRENCY_ENV: &str = "TRIPSPLIT_CURRENCY";

/// Where the display currency came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySource {
    /// `--currency` on the command line.
    CommandLine,
    /// `settings.currency` in the snapshot.
    Snapshot,
    /// The `TRIPSPLIT_CURRENCY` environment variable.
    Environment,
    /// Nothing set; USD.
    Default,
}

/// Resolved display options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Currency used to format amounts.
    pub currency: Currency,
    /// Where `currency` was taken from.
    pub currency_source: CurrencySource,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            currency_source: CurrencySource::Default,
        }
    }
}

impl Options {
    /// Resolve options, reading the environment for the last fallback.
    #[must_use]
    pub fn resolve(cli_currency: Option<&str>, snapshot: &Snapshot) -> Self {
        let env = std::env::var(CURRENCY_ENV).ok();
        Self::resolve_with_env(cli_currency, snapshot, env.as_deref())
    }

    /// Resolve options with an explicit environment value.
    ///
    /// The first source that names a known currency wins, in the order
    /// command line, snapshot settings, environment. Unknown codes are
    /// logged and skipped.
    #[must_use]
    pub fn resolve_with_env(
        cli_currency: Option<&str>,
        snapshot: &Snapshot,
        env_currency: Option<&str>,
    ) -> Self {
        let candidates = [
            (cli_currency, CurrencySource::CommandLine),
            (snapshot.currency_code(), CurrencySource::Snapshot),
            (env_currency, CurrencySource::Environment),
        ];

        for (code, source) in candidates {
            let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
                continue;
            };
            match Currency::find(code) {
                Some(currency) => {
                    return Self {
                        currency,
                        currency_source: source,
                    };
                }
                None => tracing::warn!(code, ?source, "unknown currency code, ignoring"),
            }
        }

        Self::default()
    }
}
