use std::num::ParseIntError;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{DrinkId, QueueEntry, QueueSnapshot},
    error::DecodeError,
};

/// Push-channel message. Each element of `orders` is itself a JSON document
/// describing one queue entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueFeedMessage {
    pub orders: Vec<String>,
    pub total_orders: u32,
    #[serde(default)]
    pub total_drinks: u32,
}

impl QueueFeedMessage {
    pub fn decode(raw: &str) -> Result<QueueSnapshot, DecodeError> {
        serde_json::from_str::<Self>(raw)
            .map_err(DecodeError::Envelope)?
            .into_snapshot()
    }

    pub fn into_snapshot(self) -> Result<QueueSnapshot, DecodeError> {
        Ok(QueueSnapshot::new(
            decode_entries(&self.orders)?,
            self.total_orders,
            self.total_drinks,
        ))
    }

    pub fn from_snapshot(snapshot: &QueueSnapshot) -> Result<Self, serde_json::Error> {
        Ok(Self {
            orders: encode_entries(&snapshot.entries)?,
            total_orders: snapshot.total_orders,
            total_drinks: snapshot.total_drinks,
        })
    }
}

/// Body returned by `POST /complete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub updated_order_list: Vec<String>,
    pub updated_total_orders: u32,
    #[serde(default)]
    pub updated_total_drinks: u32,
}

impl CompletionResponse {
    pub fn decode(raw: &str) -> Result<QueueSnapshot, DecodeError> {
        serde_json::from_str::<Self>(raw)
            .map_err(DecodeError::Envelope)?
            .into_snapshot()
    }

    pub fn into_snapshot(self) -> Result<QueueSnapshot, DecodeError> {
        Ok(QueueSnapshot::new(
            decode_entries(&self.updated_order_list)?,
            self.updated_total_orders,
            self.updated_total_drinks,
        ))
    }

    pub fn from_snapshot(snapshot: &QueueSnapshot) -> Result<Self, serde_json::Error> {
        Ok(Self {
            updated_order_list: encode_entries(&snapshot.entries)?,
            updated_total_orders: snapshot.total_orders,
            updated_total_drinks: snapshot.total_drinks,
        })
    }
}

/// Form-encoded body of `POST /complete`.
///
/// `selectedDrinkIDs` carries a JSON array of string identifiers and
/// `selectedItemIndex` an integer, or the empty string when no entry is
/// selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionForm {
    #[serde(rename = "selectedDrinkIDs")]
    pub selected_drink_ids: String,
    #[serde(rename = "selectedItemIndex")]
    pub selected_item_index: String,
}

impl CompletionForm {
    pub fn new<'a>(
        drink_ids: impl IntoIterator<Item = &'a DrinkId>,
        entry_index: Option<usize>,
    ) -> Self {
        let ids = drink_ids
            .into_iter()
            .map(|id| Value::String(id.as_str().to_string()))
            .collect();
        Self {
            selected_drink_ids: Value::Array(ids).to_string(),
            selected_item_index: entry_index.map(|i| i.to_string()).unwrap_or_default(),
        }
    }

    pub fn drink_ids(&self) -> Result<Vec<DrinkId>, serde_json::Error> {
        serde_json::from_str(&self.selected_drink_ids)
    }

    pub fn entry_index(&self) -> Result<Option<usize>, ParseIntError> {
        let raw = self.selected_item_index.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some)
    }
}

fn decode_entries(encoded: &[String]) -> Result<Vec<QueueEntry>, DecodeError> {
    encoded
        .iter()
        .enumerate()
        .map(|(position, raw)| {
            serde_json::from_str(raw).map_err(|source| DecodeError::Entry { position, source })
        })
        .collect()
}

fn encode_entries(entries: &[QueueEntry]) -> Result<Vec<String>, serde_json::Error> {
    entries.iter().map(serde_json::to_string).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::MilkType;

    fn order_json() -> String {
        json!({
            "orderID": 4,
            "customer": "Alex",
            "dateReceived": "2024-05-01",
            "timeReceived": "09:15:00",
            "drinks": [
                {"identifier": 140234, "drink": "Latte", "milk": "OatMilk", "options": ["Extra Hot"], "customer": "Alex"},
                {"identifier": "b-2", "drink": "Espresso", "milk": null, "options": []}
            ]
        })
        .to_string()
    }

    fn batch_json() -> String {
        json!({
            "milk": "OatMilk",
            "texture": "Silky",
            "volume": 3,
            "drinks": [
                {"identifier": "d1", "drinkName": "Flat White", "milkType": "OatMilk", "options": [], "customerName": "Sam"},
                {"identifier": "d2", "drinkName": "Latte", "milkType": "OatMilk", "options": [], "customerName": "Kim"}
            ]
        })
        .to_string()
    }

    #[test]
    fn decodes_double_encoded_feed_message() {
        let raw = json!({
            "orders": [order_json(), batch_json()],
            "totalOrders": 3,
            "totalDrinks": 4
        })
        .to_string();

        let snapshot = QueueFeedMessage::decode(&raw).expect("decode");
        assert_eq!(snapshot.total_orders, 3);
        assert_eq!(snapshot.total_drinks, 4);
        assert_eq!(snapshot.entries.len(), 2);
        assert!(!snapshot.entries[0].is_batch());
        assert!(snapshot.entries[1].is_batch());
    }

    #[test]
    fn numeric_identifiers_become_strings() {
        let entry: QueueEntry = serde_json::from_str(&order_json()).expect("entry");
        let ids: Vec<_> = entry.drinks().iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(ids, vec!["140234", "b-2"]);
        assert_eq!(entry.drinks()[1].milk_type, None);
        assert_eq!(entry.drinks()[1].milk_label(), "No Milk");
    }

    #[test]
    fn unusual_received_times_still_decode() {
        let raw = json!({
            "orders": [
                json!({"customer": "Ana", "timeReceived": "2024-05-01T09:15:42", "drinks": []})
                    .to_string(),
                json!({"customer": "Ben", "time": "9:15 AM", "drinks": []}).to_string(),
                order_json(),
            ],
            "totalOrders": 3
        })
        .to_string();

        let snapshot = QueueFeedMessage::decode(&raw).expect("decode");
        let times: Vec<_> = snapshot
            .entries
            .iter()
            .map(|entry| match entry {
                QueueEntry::Order(order) => order.time_received.display(),
                QueueEntry::Batch(_) => panic!("expected order"),
            })
            .collect();
        assert_eq!(times, vec!["09:15:42", "9:15 AM", "09:15:00"]);
    }

    #[test]
    fn volume_discriminates_batches_and_accepts_descriptive_names() {
        let QueueEntry::Batch(batch) = serde_json::from_str(&batch_json()).expect("entry") else {
            panic!("expected batch");
        };
        assert_eq!(batch.milk_type, MilkType::new("OatMilk"));
        assert_eq!(batch.heading(), "Oat Milk Batch");
        assert_eq!(batch.drinks[1].customer_name.as_deref(), Some("Kim"));
    }

    #[test]
    fn rejects_negative_batch_volume() {
        let raw = json!({"milk": "OatMilk", "volume": -1, "drinks": []}).to_string();
        assert!(serde_json::from_str::<QueueEntry>(&raw).is_err());
    }

    #[test]
    fn reports_position_of_malformed_entry() {
        let raw = json!({
            "orders": [order_json(), "{\"customer\": 12"],
            "totalOrders": 2,
            "totalDrinks": 2
        })
        .to_string();

        let err = QueueFeedMessage::decode(&raw).expect_err("must fail");
        assert_eq!(err.entry_position(), Some(1));
    }

    #[test]
    fn rejects_structured_entries_that_were_not_encoded_as_strings() {
        let raw = json!({
            "orders": [{"customer": "Alex"}],
            "totalOrders": 1,
            "totalDrinks": 0
        })
        .to_string();

        let err = QueueFeedMessage::decode(&raw).expect_err("must fail");
        assert!(matches!(err, DecodeError::Envelope(_)));
    }

    #[test]
    fn completion_response_uses_updated_field_names() {
        let raw = json!({
            "updatedOrderList": [batch_json()],
            "updatedTotalOrders": 2,
            "updatedTotalDrinks": 2
        })
        .to_string();

        let snapshot = CompletionResponse::decode(&raw).expect("decode");
        assert_eq!(snapshot.total_orders, 2);
        assert_eq!(snapshot.entries.len(), 1);
    }

    #[test]
    fn completion_form_serializes_empty_index_as_empty_string() {
        let ids = [DrinkId::from("d1"), DrinkId::from("d2")];
        let form = CompletionForm::new(&ids, None);
        assert_eq!(form.selected_drink_ids, r#"["d1","d2"]"#);
        assert_eq!(form.selected_item_index, "");
        assert_eq!(form.entry_index().expect("index"), None);

        let form = CompletionForm::new(std::iter::empty(), Some(2));
        assert_eq!(form.selected_drink_ids, "[]");
        assert_eq!(form.entry_index().expect("index"), Some(2));
    }
}
