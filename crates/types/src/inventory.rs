//! Inventory record shapes
//!
//! Two related shapes travel through the relay: [`InventoryRecord`] is what
//! lands on the source topic and what gets published downstream, and
//! [`TransformedInventoryRecord`] is what a transformer emits. The transformed
//! shape keeps the original quantity next to the updated one so the publishing
//! side can rebuild an [`InventoryRecord`] that only retains the update.

use serde::{Deserialize, Serialize};

/// One unit-of-inventory snapshot
///
/// Example JSON:
/// ```json
/// {
///   "_comment": "cycle count",
///   "item_number": "X1",
///   "actual_qty": 42,
///   "wh_id": "W1",
///   "location_id": "L1"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Free-form comment
    #[serde(rename = "_comment")]
    pub comment: String,

    /// Item number
    pub item_number: String,

    /// Counted quantity
    pub actual_qty: i64,

    /// Warehouse identifier
    #[serde(rename = "wh_id")]
    pub warehouse_id: String,

    /// Location inside the warehouse
    pub location_id: String,
}

impl InventoryRecord {
    /// Create a new inventory record
    pub fn new(
        comment: impl Into<String>,
        item_number: impl Into<String>,
        actual_qty: i64,
        warehouse_id: impl Into<String>,
        location_id: impl Into<String>,
    ) -> Self {
        Self {
            comment: comment.into(),
            item_number: item_number.into(),
            actual_qty,
            warehouse_id: warehouse_id.into(),
            location_id: location_id.into(),
        }
    }

    /// Carry this record into the transformed shape with an updated quantity
    pub fn with_updated_qty(self, actual_qty_updated: i64) -> TransformedInventoryRecord {
        TransformedInventoryRecord {
            comment: self.comment,
            item_number: self.item_number,
            actual_qty: self.actual_qty,
            actual_qty_updated,
            warehouse_id: self.warehouse_id,
            location_id: self.location_id,
        }
    }
}

/// Inventory record after a transformer has run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformedInventoryRecord {
    /// Free-form comment
    #[serde(rename = "_comment")]
    pub comment: String,

    /// Item number
    pub item_number: String,

    /// Quantity as consumed from the source topic
    pub actual_qty: i64,

    /// Quantity after transformation
    pub actual_qty_updated: i64,

    /// Warehouse identifier
    #[serde(rename = "wh_id")]
    pub warehouse_id: String,

    /// Location inside the warehouse
    pub location_id: String,
}

impl TransformedInventoryRecord {
    /// Rebuild the publishable record, keeping only the updated quantity
    pub fn into_inventory_record(self) -> InventoryRecord {
        InventoryRecord {
            comment: self.comment,
            item_number: self.item_number,
            actual_qty: self.actual_qty_updated,
            warehouse_id: self.warehouse_id,
            location_id: self.location_id,
        }
    }
}

impl From<TransformedInventoryRecord> for InventoryRecord {
    fn from(record: TransformedInventoryRecord) -> Self {
        record.into_inventory_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InventoryRecord {
        InventoryRecord::new("a", "X1", 5, "W1", "L1")
    }

    #[test]
    fn test_with_updated_qty_keeps_original() {
        let transformed = sample().with_updated_qty(0);

        assert_eq!(transformed.actual_qty, 5);
        assert_eq!(transformed.actual_qty_updated, 0);
        assert_eq!(transformed.item_number, "X1");
    }

    #[test]
    fn test_reconstruction_promotes_updated_qty() {
        let transformed = TransformedInventoryRecord {
            comment: "recount".to_string(),
            item_number: "X9".to_string(),
            actual_qty: 3,
            actual_qty_updated: 17,
            warehouse_id: "W2".to_string(),
            location_id: "L7".to_string(),
        };

        let record: InventoryRecord = transformed.into();

        assert_eq!(record, InventoryRecord::new("recount", "X9", 17, "W2", "L7"));
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["_comment"], "a");
        assert_eq!(json["item_number"], "X1");
        assert_eq!(json["actual_qty"], 5);
        assert_eq!(json["wh_id"], "W1");
        assert_eq!(json["location_id"], "L1");
        assert!(json.get("comment").is_none());
    }
}
