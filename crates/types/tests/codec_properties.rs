//! Property tests for the record codec

use inventory_relay_types::{
    decode, decode_transformed, encode, InventoryRecord, TransformedInventoryRecord,
};
use proptest::prelude::*;

fn inventory_record() -> impl Strategy<Value = InventoryRecord> {
    (
        ".{0,24}",
        "[A-Z0-9-]{1,12}",
        any::<i64>(),
        "[A-Z0-9]{1,6}",
        "[A-Z0-9-]{1,8}",
    )
        .prop_map(|(comment, item, qty, wh, loc)| InventoryRecord::new(comment, item, qty, wh, loc))
}

fn transformed_record() -> impl Strategy<Value = TransformedInventoryRecord> {
    (inventory_record(), any::<i64>()).prop_map(|(record, updated)| record.with_updated_qty(updated))
}

proptest! {
    #[test]
    fn inventory_record_survives_the_wire(record in inventory_record()) {
        prop_assert_eq!(decode(&encode(&record)).unwrap(), record);
    }

    #[test]
    fn transformed_record_survives_the_wire(record in transformed_record()) {
        prop_assert_eq!(decode_transformed(&encode(&record)).unwrap(), record);
    }

    #[test]
    fn reconstruction_keeps_only_updated_qty(record in transformed_record()) {
        let rebuilt = record.clone().into_inventory_record();

        prop_assert_eq!(rebuilt.actual_qty, record.actual_qty_updated);
        prop_assert_eq!(rebuilt.comment, record.comment);
        prop_assert_eq!(rebuilt.item_number, record.item_number);
        prop_assert_eq!(rebuilt.warehouse_id, record.warehouse_id);
        prop_assert_eq!(rebuilt.location_id, record.location_id);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let _ = decode(&bytes);
        let _ = decode_transformed(&bytes);
    }
}
