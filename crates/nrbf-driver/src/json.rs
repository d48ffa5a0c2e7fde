use chrono::SecondsFormat;
use nrbf_types::PrimitiveValue;
use nrbf_wire::{DateTime, DateTimeKind};
use serde_json::{Map, Number, Value as Json};

/// JSON form of a decoded primitive, shared by the literal and crunched
/// renderings.
///
/// ```text
/// ┌──────────────────────────┬──────────────────────────────────────────┐
/// │ Primitive                │ JSON                                     │
/// ├──────────────────────────┼──────────────────────────────────────────┤
/// │ Boolean                  │ true / false                             │
/// │ integers, TimeSpan       │ number (TimeSpan as its tick count)      │
/// │ Single, Double           │ number, or null when NaN or infinite     │
/// │ Char, String             │ string                                   │
/// │ Decimal                  │ string, every digit kept                 │
/// │ DateTime                 │ {"Kind", "Ticks", "Timestamp"}           │
/// │ Null                     │ null                                     │
/// └──────────────────────────┴──────────────────────────────────────────┘
/// ```
#[must_use]
pub fn primitive_to_json(value: &PrimitiveValue) -> Json {
    match value {
        PrimitiveValue::Boolean(b) => Json::Bool(*b),
        PrimitiveValue::Byte(n) => Json::from(*n),
        PrimitiveValue::SByte(n) => Json::from(*n),
        PrimitiveValue::Int16(n) => Json::from(*n),
        PrimitiveValue::UInt16(n) => Json::from(*n),
        PrimitiveValue::Int32(n) => Json::from(*n),
        PrimitiveValue::UInt32(n) => Json::from(*n),
        PrimitiveValue::Int64(n) => Json::from(*n),
        PrimitiveValue::UInt64(n) => Json::from(*n),
        PrimitiveValue::Single(f) => float(f64::from(*f)),
        PrimitiveValue::Double(f) => float(*f),
        PrimitiveValue::Char(c) => Json::String(c.to_string()),
        PrimitiveValue::String(s) => Json::String(s.clone()),
        PrimitiveValue::Decimal(d) => Json::String(d.to_string()),
        PrimitiveValue::TimeSpan(span) => Json::from(span.0),
        PrimitiveValue::DateTime(dt) => datetime(*dt),
        PrimitiveValue::Null => Json::Null,
    }
}

fn float(value: f64) -> Json {
    Number::from_f64(value).map_or(Json::Null, Json::Number)
}

/// `Kind` is left out for unspecified DateTimes. `Timestamp` is left
/// out when the ticks fall outside the calendar range chrono supports.
fn datetime(value: DateTime) -> Json {
    let mut map = Map::new();
    if value.kind != DateTimeKind::Unspecified {
        map.insert("Kind".into(), Json::from(value.kind.name()));
    }
    map.insert("Ticks".into(), Json::from(value.ticks));
    if let Some(naive) = value.to_naive() {
        let text = match value.kind {
            DateTimeKind::Utc => naive
                .and_utc()
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            DateTimeKind::Local | DateTimeKind::Unspecified => {
                naive.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
            }
        };
        map.insert("Timestamp".into(), Json::String(text));
    }
    Json::Object(map)
}
