use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque drink identifier, unique within one snapshot.
///
/// The queue server hands out numeric identifiers; they are normalized to
/// their decimal string form so selection never depends on the wire type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DrinkId(pub String);

impl DrinkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DrinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DrinkId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DrinkId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for DrinkId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// Enum-like milk identifier as sent by the server, e.g. `OatMilk`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilkType(pub String);

impl MilkType {
    pub fn new(milk: impl Into<String>) -> Self {
        Self(milk.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable form: `OatMilk` becomes `Oat Milk`.
    pub fn label(&self) -> String {
        let base = self.0.strip_suffix("Milk").unwrap_or(&self.0).trim();
        if base.is_empty() {
            "Milk".to_string()
        } else {
            format!("{base} Milk")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    pub identifier: DrinkId,
    #[serde(rename = "drink", alias = "drinkName")]
    pub drink_name: String,
    #[serde(
        rename = "milk",
        alias = "milkType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub milk_type: Option<MilkType>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(
        rename = "customer",
        alias = "customerName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_name: Option<String>,
}

impl Drink {
    pub fn milk_label(&self) -> String {
        self.milk_type
            .as_ref()
            .map(MilkType::label)
            .unwrap_or_else(|| "No Milk".to_string())
    }
}

const RECEIVED_TIME_FORMAT: &str = "%H:%M:%S";

/// When an order reached the queue, kept exactly as the server sent it.
///
/// The server normally sends `HH:MM:SS`. Anything else still decodes and is
/// shown verbatim rather than failing the whole snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceivedTime(pub String);

impl ReceivedTime {
    pub fn from_time(time: NaiveTime) -> Self {
        Self(time.format(RECEIVED_TIME_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Clock time, accepting a bare time or a full timestamp.
    pub fn time(&self) -> Option<NaiveTime> {
        let raw = self.0.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
                    .map(|at| at.time())
                    .ok()
            })
            .or_else(|| DateTime::parse_from_rfc3339(raw).map(|at| at.time()).ok())
    }

    /// `HH:MM:SS` when the value reads as a time, the raw text otherwise.
    pub fn display(&self) -> String {
        match self.time() {
            Some(time) => time.format(RECEIVED_TIME_FORMAT).to_string(),
            None => self.0.trim().to_string(),
        }
    }
}

impl From<&str> for ReceivedTime {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single customer's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEntry {
    #[serde(rename = "orderID", default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(rename = "customer", alias = "customerName")]
    pub customer_name: String,
    #[serde(
        rename = "dateReceived",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_received: Option<NaiveDate>,
    #[serde(rename = "timeReceived", alias = "time")]
    pub time_received: ReceivedTime,
    pub drinks: Vec<Drink>,
}

/// Drinks from several customers grouped because they share a milk type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    #[serde(rename = "milk", alias = "milkType")]
    pub milk_type: MilkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    pub volume: f64,
    pub drinks: Vec<Drink>,
}

impl BatchEntry {
    pub fn heading(&self) -> String {
        format!("{} Batch", self.milk_type.label())
    }
}

/// One rendering slot on the board. The presence of `volume` on the wire
/// marks a batch; everything else is an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueueEntry {
    Order(OrderEntry),
    Batch(BatchEntry),
}

impl QueueEntry {
    pub fn drinks(&self) -> &[Drink] {
        match self {
            Self::Order(order) => &order.drinks,
            Self::Batch(batch) => &batch.drinks,
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }
}

impl<'de> Deserialize<'de> for QueueEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let is_batch = value
            .as_object()
            .map(|fields| fields.contains_key("volume"))
            .ok_or_else(|| de::Error::custom("queue entry must be a JSON object"))?;

        if is_batch {
            let batch: BatchEntry = serde_json::from_value(value).map_err(de::Error::custom)?;
            if batch.volume.is_nan() || batch.volume < 0.0 {
                return Err(de::Error::custom(format!(
                    "batch volume must be non-negative, got {}",
                    batch.volume
                )));
            }
            Ok(Self::Batch(batch))
        } else {
            serde_json::from_value(value)
                .map(Self::Order)
                .map_err(de::Error::custom)
        }
    }
}

/// Complete queue state at one instant. Entries are identified by position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueueSnapshot {
    pub entries: Vec<QueueEntry>,
    pub total_orders: u32,
    pub total_drinks: u32,
}

impl QueueSnapshot {
    pub fn new(entries: Vec<QueueEntry>, total_orders: u32, total_drinks: u32) -> Self {
        Self {
            entries,
            total_orders,
            total_drinks,
        }
    }
}
