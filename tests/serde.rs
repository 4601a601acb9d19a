#![cfg(feature = "serde")]

use avl_dict::compare::Reverse;
use avl_dict::{AvlMap, TraversalOrder};

#[test]
fn map_serializes_in_key_order() {
    let map = AvlMap::from([(3, "c"), (1, "a"), (2, "b")]);
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"1":"a","2":"b","3":"c"}"#);
}

#[test]
fn map_round_trips() {
    let map: AvlMap<String, Vec<u8>> = (0..50u8).map(|i| (format!("key{i:02}"), vec![i; usize::from(i % 4)])).collect();
    let json = serde_json::to_string(&map).unwrap();
    let back: AvlMap<String, Vec<u8>> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, map);
}

#[test]
fn deserialize_uses_the_comparator() {
    let map: AvlMap<String, u8, Reverse> = serde_json::from_str(r#"{"a":1,"b":2,"c":3}"#).unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, ["c", "b", "a"]);
}

#[test]
fn duplicate_keys_keep_the_last_value() {
    let map: AvlMap<String, u8> = serde_json::from_str(r#"{"a":1,"a":2}"#).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map["a"], 2);
}

#[test]
fn traversal_order_uses_lowercase_names() {
    assert_eq!(serde_json::to_string(&TraversalOrder::Breadth).unwrap(), r#""breadth""#);
    let order: TraversalOrder = serde_json::from_str(r#""descending""#).unwrap();
    assert_eq!(order, TraversalOrder::Descending);
    assert!(serde_json::from_str::<TraversalOrder>(r#""Ascending""#).is_err());
}
