//! The instrument store: wave-table resolution with cache-on-first-load.
//!
//! An instrument identifier resolves to a [`WaveTable`] fetched from
//! `GET {base_url}/instruments/{identifier}`, then cached for the life of
//! the store. The store does not de-duplicate in-flight requests:
//! concurrent first resolutions of one identifier may each fetch, and the
//! last insert wins, which is benign because every successful fetch for
//! an identifier carries the same value. Callers that need single-flight
//! behavior can wrap the store with a pending-request map.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::error::InstrumentError;

/// Harmonic content of an instrument.
///
/// Paired Fourier coefficient arrays; index 0 is the DC term, index `k`
/// the `k`-th harmonic of whatever fundamental a voice plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveTable {
    /// Real (cosine) coefficients.
    pub real: Vec<f64>,
    /// Imaginary (sine) coefficients.
    pub imag: Vec<f64>,
}

impl WaveTable {
    /// Amplitude of each harmonic partial, fundamental first, normalized
    /// so the strongest partial is 1.0. The DC term is skipped.
    pub fn partial_amplitudes(&self) -> Vec<f64> {
        let n = self.real.len().max(self.imag.len());
        let mut amplitudes: Vec<f64> = (1..n)
            .map(|k| {
                let re = self.real.get(k).copied().unwrap_or(0.0);
                let im = self.imag.get(k).copied().unwrap_or(0.0);
                (re * re + im * im).sqrt()
            })
            .collect();
        let peak = amplitudes.iter().cloned().fold(0.0_f64, f64::max);
        if peak > 0.0 {
            for a in &mut amplitudes {
                *a /= peak;
            }
        }
        amplitudes
    }

    /// Built-in piano-like timbre, used when no instrument server is
    /// configured.
    pub fn piano() -> Self {
        Self {
            real: vec![0.0; 8],
            imag: vec![0.0, 1.0, 0.45, 0.18, 0.12, 0.06, 0.04, 0.02],
        }
    }
}

/// Keyed, cached wave-table lookup backed by a network fetch.
///
/// The cache is process-lifetime mutable state, written at most once per
/// identifier under normal use; see the module docs for the concurrency
/// caveat.
#[derive(Debug)]
pub struct InstrumentStore {
    base_url: String,
    client: reqwest::Client,
    cache: Mutex<HashMap<String, Arc<WaveTable>>>,
}

impl InstrumentStore {
    /// Creates a store fetching from `{base_url}/instruments/{id}`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, Arc<WaveTable>>> {
        // A panic while holding the lock leaves the map intact, so a
        // poisoned guard is still usable.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns true if the identifier is already cached.
    pub fn contains(&self, identifier: &str) -> bool {
        self.cache().contains_key(identifier)
    }

    /// Seeds the cache directly, bypassing the network.
    ///
    /// Used for built-in instruments and tests; overwrites any cached
    /// value for the identifier.
    pub fn insert(&self, identifier: impl Into<String>, table: WaveTable) -> Arc<WaveTable> {
        let table = Arc::new(table);
        self.cache().insert(identifier.into(), Arc::clone(&table));
        table
    }

    /// Resolves an identifier to its wave table.
    ///
    /// The first call for an identifier fetches and caches; later calls
    /// return the cached table without a network round-trip. A
    /// non-success response fails with the status and raw body.
    pub async fn resolve(&self, identifier: &str) -> Result<Arc<WaveTable>, InstrumentError> {
        if let Some(table) = self.cache().get(identifier) {
            return Ok(Arc::clone(table));
        }

        let url = format!(
            "{}/instruments/{}",
            self.base_url.trim_end_matches('/'),
            identifier
        );
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InstrumentError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let table: WaveTable = response.json().await?;
        Ok(self.insert(identifier, table))
    }
}
