//! Response normalization
//!
//! Turns the two DexScreener response layouts into a flat [`Quote`]. Any
//! missing or malformed field is reported as `None`; the caller keeps the
//! zero default for it.

use serde_json::Value;

use crate::oracle::endpoints::{EndpointSpec, ResponseShape};
use crate::types::AuxField;

/// Values pulled out of one endpoint response
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quote {
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub liquidity: Option<f64>,
}

impl Quote {
    pub fn aux(&self, field: AuxField) -> Option<f64> {
        match field {
            AuxField::MarketCap => self.market_cap,
            AuxField::Liquidity => self.liquidity,
        }
    }
}

/// Accepts JSON numbers and numeric strings ("0.0000412").
fn parse_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() || number < 0.0 {
        return None;
    }
    Some(number)
}

/// `{ "pair": { "priceUsd", "marketCap", "fdv", "liquidity": { "usd" } } }`
pub fn extract_pair(body: &Value, aux: &[AuxField]) -> Quote {
    let Some(pair) = body.get("pair").filter(|p| p.is_object()) else {
        return Quote::default();
    };

    let mut quote = Quote {
        price: parse_number(pair.get("priceUsd")),
        ..Quote::default()
    };

    if aux.contains(&AuxField::MarketCap) {
        quote.market_cap =
            parse_number(pair.get("marketCap")).or_else(|| parse_number(pair.get("fdv")));
    }
    if aux.contains(&AuxField::Liquidity) {
        quote.liquidity = parse_number(pair.get("liquidity").and_then(|l| l.get("usd")));
    }

    quote
}

/// `{ "pairs": [ { "priceUsd" }, .. ] }`, first element only
pub fn extract_pairs_list(body: &Value) -> Quote {
    let first = body
        .get("pairs")
        .and_then(Value::as_array)
        .and_then(|pairs| pairs.first());

    Quote {
        price: parse_number(first.and_then(|p| p.get("priceUsd"))),
        ..Quote::default()
    }
}

/// Dispatch on the shape the endpoint declares
pub fn extract(spec: &EndpointSpec, body: &Value) -> Quote {
    match spec.shape {
        ResponseShape::Pair => extract_pair(body, spec.aux),
        ResponseShape::PairsList => extract_pairs_list(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Instrument;
    use serde_json::json;

    const BOTH: &[AuxField] = &[AuxField::MarketCap, AuxField::Liquidity];

    #[test]
    fn pair_reads_string_price() {
        let body = json!({
            "schemaVersion": "1.0.0",
            "pair": { "chainId": "pulsechain", "priceUsd": "0.00004123" }
        });
        let quote = extract_pair(&body, &[]);
        assert_eq!(quote.price, Some(0.00004123));
        assert_eq!(quote.market_cap, None);
        assert_eq!(quote.liquidity, None);
    }

    #[test]
    fn pair_ignores_aux_unless_requested() {
        let body = json!({
            "pair": { "priceUsd": "1.5", "marketCap": 900.0, "liquidity": { "usd": 50.0 } }
        });
        let quote = extract_pair(&body, &[]);
        assert_eq!(quote.market_cap, None);
        assert_eq!(quote.liquidity, None);
    }

    #[test]
    fn market_cap_preferred_over_fdv() {
        let body = json!({
            "pair": { "priceUsd": "1.5", "marketCap": 1000.0, "fdv": 2000.0, "liquidity": { "usd": 321.5 } }
        });
        let quote = extract_pair(&body, BOTH);
        assert_eq!(quote.market_cap, Some(1000.0));
        assert_eq!(quote.liquidity, Some(321.5));
    }

    #[test]
    fn fdv_used_when_market_cap_missing() {
        let body = json!({ "pair": { "priceUsd": "1.5", "fdv": 2000.0 } });
        let quote = extract_pair(&body, BOTH);
        assert_eq!(quote.market_cap, Some(2000.0));
        assert_eq!(quote.liquidity, None);
    }

    #[test]
    fn no_market_cap_and_no_fdv_is_none() {
        let body = json!({ "pair": { "priceUsd": "1.5", "liquidity": {} } });
        let quote = extract_pair(&body, BOTH);
        assert_eq!(quote.price, Some(1.5));
        assert_eq!(quote.market_cap, None);
        assert_eq!(quote.liquidity, None);
    }

    #[test]
    fn null_pair_yields_empty_quote() {
        // DexScreener answers unknown pairs with `"pair": null`
        let body = json!({ "schemaVersion": "1.0.0", "pairs": null, "pair": null });
        assert_eq!(extract_pair(&body, BOTH), Quote::default());
    }

    #[test]
    fn pairs_list_takes_first_entry() {
        let body = json!({
            "pairs": [
                { "priceUsd": "0.9998" },
                { "priceUsd": "1.2" }
            ]
        });
        assert_eq!(extract_pairs_list(&body).price, Some(0.9998));
    }

    #[test]
    fn pairs_list_empty_or_missing() {
        assert_eq!(extract_pairs_list(&json!({ "pairs": [] })).price, None);
        assert_eq!(extract_pairs_list(&json!({ "pairs": null })).price, None);
        assert_eq!(extract_pairs_list(&json!({})).price, None);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        for raw in [json!("abc"), json!("-3"), json!(true), json!("NaN"), json!("inf")] {
            let body = json!({ "pairs": [ { "priceUsd": raw } ] });
            assert_eq!(extract_pairs_list(&body).price, None, "accepted {:?}", raw);
        }
    }

    #[test]
    fn extract_dispatches_on_shape() {
        let pair_spec = EndpointSpec::pair(Instrument::INC, "0x1").with_aux(BOTH);
        let list_spec = EndpointSpec::token(Instrument::PDAI, "0x2");
        let body = json!({
            "pair": { "priceUsd": "2.0", "marketCap": 10.0 },
            "pairs": [ { "priceUsd": "3.0" } ]
        });

        let pair = extract(&pair_spec, &body);
        assert_eq!(pair.price, Some(2.0));
        assert_eq!(pair.aux(AuxField::MarketCap), Some(10.0));

        let list = extract(&list_spec, &body);
        assert_eq!(list.price, Some(3.0));
        assert_eq!(list.aux(AuxField::MarketCap), None);
    }
}
