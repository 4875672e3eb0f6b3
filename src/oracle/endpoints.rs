//! Static table of upstream price endpoints
//!
//! One entry per tracked instrument. Paths are relative to the configured
//! DexScreener base URL; the table is fixed at build time.

use crate::types::{AuxField, Instrument};

const CHAIN: &str = "pulsechain";

/// Response layout an endpoint is expected to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `/latest/dex/pairs/{chain}/{pair}` -> `{ "pair": { "priceUsd": .. } }`
    Pair,
    /// `/latest/dex/tokens/{token}` -> `{ "pairs": [ { "priceUsd": .. }, .. ] }`
    PairsList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    pub instrument: Instrument,
    pub path: String,
    pub shape: ResponseShape,
    /// Extra fields to pull from the same response (only honored for `Pair`)
    pub aux: &'static [AuxField],
}

impl EndpointSpec {
    pub fn pair(instrument: Instrument, pair_address: &str) -> Self {
        Self {
            instrument,
            path: format!("latest/dex/pairs/{}/{}", CHAIN, pair_address),
            shape: ResponseShape::Pair,
            aux: &[],
        }
    }

    pub fn token(instrument: Instrument, token_address: &str) -> Self {
        Self {
            instrument,
            path: format!("latest/dex/tokens/{}", token_address),
            shape: ResponseShape::PairsList,
            aux: &[],
        }
    }

    pub fn with_aux(mut self, aux: &'static [AuxField]) -> Self {
        self.aux = aux;
        self
    }

    /// Full request URL for this endpoint
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

const INC_AUX: &[AuxField] = &[AuxField::MarketCap, AuxField::Liquidity];

/// Ordered endpoint table queried by every aggregation run
pub fn default_endpoints() -> Vec<EndpointSpec> {
    vec![
        // PulseX pairs
        EndpointSpec::pair(Instrument::PLS, "0xe56043671df55de5cdf8459710433c10324de0ae"),
        EndpointSpec::pair(Instrument::PLSX, "0x1b45b9148791d3a104184cd5dfe5ce57193a3ee9"),
        EndpointSpec::pair(Instrument::HEX, "0xf1f4ee610b2babb05c635f726ef8b0c568c8dc65"),
        EndpointSpec::pair(Instrument::INC, "0xf808bb6265e9ca27002c0a04562bf50d4fe37eaa")
            .with_aux(INC_AUX),
        // Token lookups (first listed pair wins)
        EndpointSpec::token(Instrument::EHEX, "0x57fde0a71132198BBeC939B98976993d8D89D225"),
        EndpointSpec::token(Instrument::PDAI, "0x6B175474E89094C44Da98b954EedeAC495271d0F"),
        EndpointSpec::token(Instrument::PUSDC, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
        EndpointSpec::token(Instrument::PUSDT, "0xdAC17F958D2ee523a2206206994597C13D831ec7"),
        EndpointSpec::token(Instrument::PWBTC, "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599"),
        EndpointSpec::token(Instrument::PWETH, "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
        EndpointSpec::token(Instrument::HDRN, "0x3819f64f282bf135d62168C1e513280dAF905e06"),
        EndpointSpec::token(Instrument::PLINK, "0x514910771AF9Ca656af840dff83E8264EcF986CA"),
        EndpointSpec::token(Instrument::PUNI, "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984"),
        EndpointSpec::token(Instrument::EWETH, "0x02DcdD04e3F455D838cd1249292C58f3B79e3C3C"),
        EndpointSpec::token(Instrument::EUSDC, "0x15D38573d2feeb82e7ad5187aB8c1D52810B1f07"),
    ]
}
