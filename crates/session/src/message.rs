//! Inbound control messages.
//!
//! Every inbound event carries a positional argument list. `Inbound::decode`
//! validates the arguments of one event and produces a typed message.

use crate::convert::{json_to_value, json_to_values};
use serde_json::Value as JsonValue;
use snapshot_core::{Error, Result};
use snapshot_view::{FilterDescriptor, FilterMode, KeyList, SortDirection};

/// Outbound event carrying a page and its statistics.
pub const CONTENT_UPDATED: &str = "contentUpdated";

static MISSING: JsonValue = JsonValue::Null;

/// A decoded inbound message.
#[derive(Clone, Debug, PartialEq)]
pub enum Inbound {
    /// `perPage(value)`; `None` when the page size is not a finite number.
    PerPage(Option<i64>),
    /// `pageNumber(value)`
    PageNumber(i64),
    /// `sortBy(key, direction?)`
    SortBy {
        key: String,
        direction: Option<SortDirection>,
    },
    /// `clearFilter(key)`
    ClearFilter(String),
    /// `clearFilters()`
    ClearFilters,
    /// Any of the filter events.
    Filter {
        keys: KeyList,
        descriptor: FilterDescriptor,
        mode: FilterMode,
    },
}

impl Inbound {
    /// Decodes the arguments of `event`.
    pub fn decode(event: &str, args: &[JsonValue]) -> Result<Self> {
        let arg = |i: usize| args.get(i).unwrap_or(&MISSING);
        let message = match event {
            "perPage" => Inbound::PerPage(optional_integer(arg(0))),
            "pageNumber" => Inbound::PageNumber(
                optional_integer(arg(0))
                    .ok_or_else(|| Error::invalid_message(event, "expected a page number"))?,
            ),
            "sortBy" => decode_sort(event, arg(0), arg(1))?,
            "clearFilter" => Inbound::ClearFilter(string(event, arg(0), "expected a key")?),
            "clearFilters" => Inbound::ClearFilters,
            "exactFilter" => filter(
                event,
                arg(0),
                arg(2),
                FilterDescriptor::Exact(scalar(event, arg(1))?),
            )?,
            "fuzzyFilter" => filter(
                event,
                arg(0),
                arg(2),
                FilterDescriptor::Fuzzy(string(event, arg(1), "expected a pattern")?),
            )?,
            "patternFilter" | "regExpFilter" => {
                let pattern = string(event, arg(1), "expected a pattern")?;
                let flags = match arg(2) {
                    JsonValue::Null => String::new(),
                    other => string(event, other, "expected pattern flags")?,
                };
                filter(
                    event,
                    arg(0),
                    arg(3),
                    FilterDescriptor::Pattern { pattern, flags },
                )?
            }
            "rangeFilter" => {
                let bounds = json_to_values(arg(1)).map_err(|e| Error::invalid_message(event, e.to_string()))?;
                let [low, high]: [_; 2] = bounds
                    .try_into()
                    .map_err(|_| Error::invalid_message(event, "expected [low, high]"))?;
                filter(event, arg(0), arg(2), FilterDescriptor::Range { low, high })?
            }
            "inSetFilter" | "inArrayFilter" => {
                let values = set(event, arg(1))?;
                filter(event, arg(0), arg(2), FilterDescriptor::InSet(values))?
            }
            "notInSetFilter" | "notInArrayFilter" => {
                let values = set(event, arg(1))?;
                filter(event, arg(0), arg(2), FilterDescriptor::NotInSet(values))?
            }
            _ => return Err(Error::unknown_event(event)),
        };
        Ok(message)
    }
}

fn optional_integer(json: &JsonValue) -> Option<i64> {
    match json {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string(event: &str, json: &JsonValue, message: &str) -> Result<String> {
    match json {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        _ => Err(Error::invalid_message(event, message)),
    }
}

fn scalar(event: &str, json: &JsonValue) -> Result<snapshot_core::Value> {
    json_to_value(json).map_err(|e| Error::invalid_message(event, e.to_string()))
}

fn set(event: &str, json: &JsonValue) -> Result<Vec<snapshot_core::Value>> {
    match json {
        JsonValue::Array(_) => json_to_values(json).map_err(|e| Error::invalid_message(event, e.to_string())),
        _ => Err(Error::invalid_message(event, "expected an array of values")),
    }
}

fn keys(event: &str, json: &JsonValue) -> Result<KeyList> {
    let keys: KeyList = serde_json::from_value(json.clone())
        .map_err(|_| Error::invalid_message(event, "expected a key or a list of keys"))?;
    if keys.is_empty() {
        return Err(Error::invalid_message(event, "no keys given"));
    }
    Ok(keys)
}

fn mode(event: &str, json: &JsonValue) -> Result<FilterMode> {
    match json {
        JsonValue::Null => Ok(FilterMode::Replace),
        other => serde_json::from_value(other.clone())
            .map_err(|_| Error::invalid_message(event, "mode must be \"replace\" or \"compose\"")),
    }
}

fn filter(event: &str, key_arg: &JsonValue, mode_arg: &JsonValue, descriptor: FilterDescriptor) -> Result<Inbound> {
    Ok(Inbound::Filter {
        keys: keys(event, key_arg)?,
        descriptor,
        mode: mode(event, mode_arg)?,
    })
}

/// A falsy direction (missing, `null`, `false`, `""`) asks for a toggle.
fn direction(json: &JsonValue) -> Option<SortDirection> {
    match json {
        JsonValue::String(s) if !s.trim().is_empty() => Some(SortDirection::parse(s)),
        _ => None,
    }
}

fn decode_sort(event: &str, first: &JsonValue, second: &JsonValue) -> Result<Inbound> {
    match first {
        JsonValue::Object(map) => {
            let key = map
                .get("key")
                .ok_or_else(|| Error::invalid_message(event, "expected a sort key"))?;
            Ok(Inbound::SortBy {
                key: string(event, key, "expected a sort key")?,
                direction: map.get("direction").and_then(direction),
            })
        }
        other => Ok(Inbound::SortBy {
            key: string(event, other, "expected a sort key")?,
            direction: direction(second),
        }),
    }
}
