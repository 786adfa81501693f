#![cfg(feature = "config")]

use ferrous_locator::{Container, DiError};
use serde::Deserialize;
use serde_json::json;

#[test]
fn test_load_json_flattens_objects() {
    let container = Container::new();
    container
        .load_json(&json!({
            "database": {
                "url": "postgres://localhost",
                "pool": { "size": 8, "timeout": 1.5 },
                "replicas": ["a", "b"]
            },
            "debug": true,
            "nothing": null
        }))
        .unwrap();

    assert_eq!(
        container.ids(),
        vec![
            "database.pool.size",
            "database.pool.timeout",
            "database.replicas",
            "database.url",
            "debug",
            "nothing",
        ]
    );
    assert_eq!(*container.get::<String>("database.url").unwrap(), "postgres://localhost");
    assert_eq!(*container.get::<i64>("database.pool.size").unwrap(), 8);
    assert_eq!(*container.get::<f64>("database.pool.timeout").unwrap(), 1.5);
    assert!(*container.get::<bool>("debug").unwrap());
    assert_eq!(
        *container.get::<serde_json::Value>("database.replicas").unwrap(),
        json!(["a", "b"])
    );
    assert!(container.get::<serde_json::Value>("nothing").unwrap().is_null());
}

#[test]
fn test_load_json_str() {
    let container = Container::new();
    container.load_json_str(r#"{"name": "api", "workers": 4}"#).unwrap();

    assert_eq!(*container.get::<String>("name").unwrap(), "api");
    assert_eq!(*container.get::<i64>("workers").unwrap(), 4);
}

#[test]
fn test_load_json_rejects_non_objects_and_bad_input() {
    let container = Container::new();

    assert!(matches!(container.load_json(&json!([1, 2])), Err(DiError::Config(_))));
    assert!(matches!(container.load_json_str("{not json"), Err(DiError::Config(_))));
    assert!(container.ids().is_empty());
}

#[test]
fn test_load_json_on_frozen_container() {
    let container = Container::new();
    container.freeze();

    let err = container.load_json(&json!({ "a": 1, "b": 2 })).unwrap_err();
    assert!(matches!(err, DiError::Frozen(_)));
    assert!(container.ids().is_empty());
}

#[test]
fn test_set_json_typed_value() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Smtp {
        host: String,
        port: u16,
    }

    let container = Container::new();
    container
        .set_json::<Smtp>("smtp", r#"{"host": "mail.local", "port": 2525}"#)
        .unwrap();

    assert_eq!(
        *container.get::<Smtp>("smtp").unwrap(),
        Smtp { host: "mail.local".to_string(), port: 2525 }
    );
    assert!(matches!(
        container.set_json::<Smtp>("broken", r#"{"host": 1}"#),
        Err(DiError::Config(_))
    ));
}
