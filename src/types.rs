//! Core types used throughout Tokenboard
//!
//! Defines the tracked instruments and the flat price snapshot served to the
//! dashboard frontend.

use serde::Serialize;
use std::fmt;

/// Tracked instruments (tokens and trading pairs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    PLS,
    PLSX,
    HEX,
    INC,
    EHEX,
    PDAI,
    PUSDC,
    PUSDT,
    PWBTC,
    PWETH,
    HDRN,
    PLINK,
    PUNI,
    EWETH,
    EUSDC,
}

impl Instrument {
    pub const ALL: [Instrument; 15] = [
        Instrument::PLS,
        Instrument::PLSX,
        Instrument::HEX,
        Instrument::INC,
        Instrument::EHEX,
        Instrument::PDAI,
        Instrument::PUSDC,
        Instrument::PUSDT,
        Instrument::PWBTC,
        Instrument::PWETH,
        Instrument::HDRN,
        Instrument::PLINK,
        Instrument::PUNI,
        Instrument::EWETH,
        Instrument::EUSDC,
    ];

    /// Ticker as shown in the dashboard
    pub fn symbol(&self) -> &'static str {
        match self {
            Instrument::PLS => "PLS",
            Instrument::PLSX => "PLSX",
            Instrument::HEX => "HEX",
            Instrument::INC => "INC",
            Instrument::EHEX => "eHEX",
            Instrument::PDAI => "pDAI",
            Instrument::PUSDC => "pUSDC",
            Instrument::PUSDT => "pUSDT",
            Instrument::PWBTC => "pWBTC",
            Instrument::PWETH => "pWETH",
            Instrument::HDRN => "HDRN",
            Instrument::PLINK => "pLINK",
            Instrument::PUNI => "pUNI",
            Instrument::EWETH => "eWETH",
            Instrument::EUSDC => "eUSDC",
        }
    }

    /// Key of the quote in the serialized snapshot (e.g. "plsPrice")
    pub fn price_field(&self) -> &'static str {
        match self {
            Instrument::PLS => "plsPrice",
            Instrument::PLSX => "plsxPrice",
            Instrument::HEX => "hexPrice",
            Instrument::INC => "incPrice",
            Instrument::EHEX => "ehexPrice",
            Instrument::PDAI => "pdaiPrice",
            Instrument::PUSDC => "pusdcPrice",
            Instrument::PUSDT => "pusdtPrice",
            Instrument::PWBTC => "pwbtcPrice",
            Instrument::PWETH => "pwethPrice",
            Instrument::HDRN => "hdrnPrice",
            Instrument::PLINK => "plinkPrice",
            Instrument::PUNI => "puniPrice",
            Instrument::EWETH => "ewethPrice",
            Instrument::EUSDC => "eusdcPrice",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Auxiliary market fields, extracted for exactly one instrument (INC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxField {
    MarketCap,
    Liquidity,
}

impl fmt::Display for AuxField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuxField::MarketCap => write!(f, "market_cap"),
            AuxField::Liquidity => write!(f, "liquidity"),
        }
    }
}

/// One complete set of USD quotes produced by a single aggregation run.
///
/// Every field is zero until a source supplies a usable value. Writes go
/// through [`PriceSnapshot::set_price`] and [`PriceSnapshot::set_aux`], which
/// drop NaN, infinite and negative inputs, so a snapshot is always fully
/// populated with finite, non-negative numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    pub pls_price: f64,
    pub plsx_price: f64,
    pub hex_price: f64,
    pub inc_price: f64,
    pub ehex_price: f64,
    pub pdai_price: f64,
    pub pusdc_price: f64,
    pub pusdt_price: f64,
    pub pwbtc_price: f64,
    pub pweth_price: f64,
    pub hdrn_price: f64,
    pub plink_price: f64,
    pub puni_price: f64,
    pub eweth_price: f64,
    pub eusdc_price: f64,
    /// INC market capitalization (falls back to FDV upstream)
    pub inc_market_cap: f64,
    /// INC pair liquidity in USD
    pub inc_liquidity: f64,
}

impl PriceSnapshot {
    fn price_slot(&mut self, instrument: Instrument) -> &mut f64 {
        match instrument {
            Instrument::PLS => &mut self.pls_price,
            Instrument::PLSX => &mut self.plsx_price,
            Instrument::HEX => &mut self.hex_price,
            Instrument::INC => &mut self.inc_price,
            Instrument::EHEX => &mut self.ehex_price,
            Instrument::PDAI => &mut self.pdai_price,
            Instrument::PUSDC => &mut self.pusdc_price,
            Instrument::PUSDT => &mut self.pusdt_price,
            Instrument::PWBTC => &mut self.pwbtc_price,
            Instrument::PWETH => &mut self.pweth_price,
            Instrument::HDRN => &mut self.hdrn_price,
            Instrument::PLINK => &mut self.plink_price,
            Instrument::PUNI => &mut self.puni_price,
            Instrument::EWETH => &mut self.eweth_price,
            Instrument::EUSDC => &mut self.eusdc_price,
        }
    }

    pub fn price(&self, instrument: Instrument) -> f64 {
        match instrument {
            Instrument::PLS => self.pls_price,
            Instrument::PLSX => self.plsx_price,
            Instrument::HEX => self.hex_price,
            Instrument::INC => self.inc_price,
            Instrument::EHEX => self.ehex_price,
            Instrument::PDAI => self.pdai_price,
            Instrument::PUSDC => self.pusdc_price,
            Instrument::PUSDT => self.pusdt_price,
            Instrument::PWBTC => self.pwbtc_price,
            Instrument::PWETH => self.pweth_price,
            Instrument::HDRN => self.hdrn_price,
            Instrument::PLINK => self.plink_price,
            Instrument::PUNI => self.puni_price,
            Instrument::EWETH => self.eweth_price,
            Instrument::EUSDC => self.eusdc_price,
        }
    }

    pub fn aux(&self, field: AuxField) -> f64 {
        match field {
            AuxField::MarketCap => self.inc_market_cap,
            AuxField::Liquidity => self.inc_liquidity,
        }
    }

    /// Store a quote. Returns false (leaving the zero default) if the value is unusable.
    pub fn set_price(&mut self, instrument: Instrument, value: f64) -> bool {
        if !is_usable(value) {
            return false;
        }
        *self.price_slot(instrument) = value;
        true
    }

    /// Store an auxiliary field. Same rules as [`set_price`](Self::set_price).
    pub fn set_aux(&mut self, field: AuxField, value: f64) -> bool {
        if !is_usable(value) {
            return false;
        }
        match field {
            AuxField::MarketCap => self.inc_market_cap = value,
            AuxField::Liquidity => self.inc_liquidity = value,
        }
        true
    }

    /// Every numeric field, in serialization order
    pub fn values(&self) -> Vec<f64> {
        let mut values: Vec<f64> = Instrument::ALL.iter().map(|i| self.price(*i)).collect();
        values.push(self.inc_market_cap);
        values.push(self.inc_liquidity);
        values
    }
}

fn is_usable(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
