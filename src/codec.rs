//! Mapping between [`ArtifactRecord`] and the legacy flat row layout.
//!
//! The row layout is wire-compatible with the stored schema: scalar columns
//! plus one column per slot of each bounded sequence. Slots past the end of a
//! sequence are written as empty strings and skipped again on decode, so
//! placeholder emptiness never surfaces as data. Sequences longer than their
//! slot count are truncated to the first N on encode; that loss is by design
//! and happens nowhere else.

use serde_json::{Map, Value};
use sqlx::{sqlite::SqliteRow, Column, Row, TypeInfo, ValueRef};

use crate::model::{ArtifactRecord, SizeTriple, IMAGE_SLOTS, REFERENCE_SLOTS, TAG_SLOTS};

pub const TITLE_COLUMN: &str = "title";
pub const DESCRIPTION_COLUMN: &str = "description";
pub const LOCATION_COLUMN: &str = "location";
pub const LENGTH_COLUMN: &str = "length";
pub const WIDTH_COLUMN: &str = "width";
/// The stored schema misspells this column. Kept verbatim so the crate stays
/// compatible with existing tables; only this constant knows the spelling.
pub const HEIGHT_COLUMN: &str = "hight";

/// Image slot columns, slot order. Contiguous 1-based numbering.
pub const IMAGE_COLUMNS: [&str; IMAGE_SLOTS] = ["img_1", "img_2", "img_3", "img_4", "img_5"];

/// Reference slot columns. The legacy source skipped `reference_5` in one
/// fetch query; that was a defect, and the numbering here is contiguous.
pub const REFERENCE_COLUMNS: [&str; REFERENCE_SLOTS] = [
    "reference_1",
    "reference_2",
    "reference_3",
    "reference_4",
    "reference_5",
    "reference_6",
    "reference_7",
    "reference_8",
    "reference_9",
    "reference_10",
];

pub const TAG_COLUMNS: [&str; TAG_SLOTS] = [
    "tag_1", "tag_2", "tag_3", "tag_4", "tag_5", "tag_6", "tag_7", "tag_8", "tag_9", "tag_10",
    "tag_11", "tag_12", "tag_13", "tag_14", "tag_15",
];

/// Every column of the flat row, in persisted order.
pub fn all_columns() -> Vec<&'static str> {
    let mut cols = vec![TITLE_COLUMN, DESCRIPTION_COLUMN];
    cols.extend(IMAGE_COLUMNS);
    cols.extend(REFERENCE_COLUMNS);
    cols.extend([LOCATION_COLUMN, LENGTH_COLUMN, WIDTH_COLUMN, HEIGHT_COLUMN]);
    cols.extend(TAG_COLUMNS);
    cols
}

fn slot_value(items: &[String], slot: usize) -> Value {
    Value::String(items.get(slot).cloned().unwrap_or_default())
}

fn optional_value(value: &Option<String>) -> Value {
    Value::String(value.clone().unwrap_or_default())
}

/// Encode a record into its flat row shape.
///
/// Sequences beyond capacity are truncated to the first N elements.
pub fn encode(record: &ArtifactRecord) -> Map<String, Value> {
    let mut row = Map::new();
    row.insert(TITLE_COLUMN.into(), Value::String(record.title.clone()));
    row.insert(
        DESCRIPTION_COLUMN.into(),
        Value::String(record.description.clone()),
    );
    for (slot, column) in IMAGE_COLUMNS.iter().enumerate() {
        row.insert((*column).into(), slot_value(&record.images, slot));
    }
    for (slot, column) in REFERENCE_COLUMNS.iter().enumerate() {
        row.insert((*column).into(), slot_value(&record.references, slot));
    }
    row.insert(LOCATION_COLUMN.into(), optional_value(&record.location));
    row.insert(LENGTH_COLUMN.into(), optional_value(&record.size.length));
    row.insert(WIDTH_COLUMN.into(), optional_value(&record.size.width));
    row.insert(HEIGHT_COLUMN.into(), optional_value(&record.size.height));
    for (slot, column) in TAG_COLUMNS.iter().enumerate() {
        row.insert((*column).into(), slot_value(&record.tags, slot));
    }
    row
}

fn text(row: &Map<String, Value>, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        // Legacy rows occasionally hold numerics in text columns.
        Some(other) => other.to_string(),
    }
}

fn optional_text(row: &Map<String, Value>, column: &str) -> Option<String> {
    let value = text(row, column);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn collect_slots(row: &Map<String, Value>, columns: &[&str]) -> Vec<String> {
    columns
        .iter()
        .map(|column| text(row, column))
        .filter(|value| !value.is_empty())
        .collect()
}

/// Decode a flat row back into a record, skipping empty slots while keeping
/// slot order as sequence order. NULL and empty string are both "empty".
pub fn decode(row: &Map<String, Value>) -> ArtifactRecord {
    ArtifactRecord {
        title: text(row, TITLE_COLUMN),
        description: text(row, DESCRIPTION_COLUMN),
        images: collect_slots(row, &IMAGE_COLUMNS),
        references: collect_slots(row, &REFERENCE_COLUMNS),
        location: optional_text(row, LOCATION_COLUMN),
        size: SizeTriple {
            length: optional_text(row, LENGTH_COLUMN),
            width: optional_text(row, WIDTH_COLUMN),
            height: optional_text(row, HEIGHT_COLUMN),
        },
        tags: collect_slots(row, &TAG_COLUMNS),
    }
}

/// Bridge a fetched SQLite row to the decodable map shape.
pub fn row_to_map(row: &SqliteRow) -> Map<String, Value> {
    let mut map = Map::new();
    for col in row.columns() {
        let idx = col.ordinal();
        let raw = row.try_get_raw(idx).ok();
        let val = match raw {
            Some(raw) => {
                if raw.is_null() {
                    Value::Null
                } else {
                    match raw.type_info().name() {
                        "INTEGER" => row
                            .try_get::<i64, _>(idx)
                            .map(Value::from)
                            .unwrap_or(Value::Null),
                        "REAL" => row
                            .try_get::<f64, _>(idx)
                            .map(Value::from)
                            .unwrap_or(Value::Null),
                        _ => row
                            .try_get::<String, _>(idx)
                            .map(Value::from)
                            .unwrap_or(Value::Null),
                    }
                }
            }
            None => Value::Null,
        };
        map.insert(col.name().to_string(), val);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ArtifactRecord {
        ArtifactRecord {
            title: "Vase A".into(),
            description: "A blue vase.".into(),
            images: vec!["front.png".into(), "back.png".into()],
            references: vec!["Smith 1990".into()],
            location: Some("Hall 3".into()),
            size: SizeTriple {
                length: Some("10".into()),
                width: None,
                height: Some("3".into()),
            },
            tags: vec!["ceramic".into(), "17th century".into()],
        }
    }

    #[test]
    fn encode_pads_every_slot() {
        let row = encode(&sample_record());
        assert_eq!(row.len(), all_columns().len());
        assert_eq!(row.get("img_2").and_then(Value::as_str), Some("back.png"));
        assert_eq!(row.get("img_3").and_then(Value::as_str), Some(""));
        assert_eq!(row.get("reference_10").and_then(Value::as_str), Some(""));
        assert_eq!(row.get("hight").and_then(Value::as_str), Some("3"));
        assert_eq!(row.get("width").and_then(Value::as_str), Some(""));
    }

    #[test]
    fn decode_inverts_encode_within_capacity() {
        let record = sample_record();
        assert_eq!(decode(&encode(&record)), record);
    }

    #[test]
    fn encode_truncates_to_first_n_in_order() {
        let mut record = sample_record();
        record.images = (1..=6).map(|i| format!("img{i}.png")).collect();
        let row = encode(&record);
        let decoded = decode(&row);
        assert_eq!(decoded.images.len(), 5);
        assert_eq!(decoded.images[0], "img1.png");
        assert_eq!(decoded.images[4], "img5.png");
    }

    #[test]
    fn decode_treats_null_and_empty_alike() {
        let mut row = encode(&sample_record());
        row.insert("img_2".into(), Value::Null);
        row.insert("location".into(), Value::Null);
        let decoded = decode(&row);
        assert_eq!(decoded.images, vec!["front.png".to_string()]);
        assert_eq!(decoded.location, None);
    }

    #[test]
    fn reference_numbering_is_contiguous() {
        for (i, column) in REFERENCE_COLUMNS.iter().enumerate() {
            assert_eq!(*column, format!("reference_{}", i + 1));
        }
    }
}
