use ferrous_locator::{Container, DiError};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Service;

#[test]
fn test_alias() {
    let container = Container::new();
    assert!(!container.has("original"));
    assert!(!container.has("alias"));

    container.set_factory("original", |_| Service).unwrap();
    container.alias("alias", "original");

    assert!(container.has("original"));
    assert!(container.has("alias"));
    assert!(Arc::ptr_eq(
        &container.get::<Service>("original").unwrap(),
        &container.get::<Service>("alias").unwrap()
    ));
    assert!(container
        .raw("original")
        .unwrap()
        .ptr_eq(&container.raw("alias").unwrap()));
    assert!(container.get_new::<Service>("alias").is_ok());
}

#[test]
fn test_alias_returns_the_container() {
    let container = Container::new();
    container.set_value("original", "value").unwrap();

    assert!(std::ptr::eq(container.alias("alias", "original"), &container));
}

#[test]
fn test_alias_chain_is_flattened() {
    let container = Container::new();
    assert!(!container.has("original"));
    assert!(!container.has("alias1"));
    assert!(!container.has("alias2"));

    container.alias("alias1", "original");
    container.alias("alias2", "alias1");

    container.set_factory("original", |_| Service).unwrap();

    assert!(container.has("original"));
    assert!(container.has("alias1"));
    assert!(container.has("alias2"));

    let original = container.get::<Service>("original").unwrap();
    assert!(Arc::ptr_eq(&original, &container.get::<Service>("alias1").unwrap()));
    assert!(Arc::ptr_eq(&original, &container.get::<Service>("alias2").unwrap()));
}

#[test]
fn test_realiasing_target_does_not_move_existing_alias() {
    let container = Container::new();
    container.set_value("first", 1u8).unwrap();
    container.set_value("second", 2u8).unwrap();

    container.alias("mid", "first");
    container.alias("outer", "mid");
    container.alias("mid", "second");

    assert_eq!(*container.get::<u8>("mid").unwrap(), 2);
    assert_eq!(*container.get::<u8>("outer").unwrap(), 1);
}

#[test]
fn test_set_an_already_aliased_service() {
    let container = Container::new();
    container.alias("alias", "original");

    assert!(!container.has("original"));
    assert!(!container.has("alias"));

    container.set_factory("original", |_| Service).unwrap();

    assert!(container.has("original"));
    assert!(container.has("alias"));
    assert!(Arc::ptr_eq(
        &container.get::<Service>("original").unwrap(),
        &container.get::<Service>("alias").unwrap()
    ));
}

#[test]
fn test_override_an_alias() {
    let container = Container::new();
    container.set_factory("original", |_| Service).unwrap();

    assert!(container.has("original"));
    assert!(!container.has("alias"));

    container.alias("alias", "original");

    assert!(container.has("alias"));
    assert!(Arc::ptr_eq(
        &container.get::<Service>("original").unwrap(),
        &container.get::<Service>("alias").unwrap()
    ));

    container.set_factory("alias", |_| Service).unwrap();

    assert!(container.has("original"));
    assert!(container.has("alias"));
    assert!(!Arc::ptr_eq(
        &container.get::<Service>("original").unwrap(),
        &container.get::<Service>("alias").unwrap()
    ));
    assert!(container.descriptors().iter().all(|d| d.aliases.is_empty()));
}

#[test]
fn test_alias_to_undefined_reports_target() {
    let container = Container::new();
    container.alias("alias", "missing");

    assert!(!container.has("alias"));
    assert_eq!(
        container.get::<Service>("alias").unwrap_err(),
        DiError::NotFound("missing".to_string())
    );
    assert_eq!(
        container.raw("alias").unwrap_err(),
        DiError::NotFound("missing".to_string())
    );
}

#[test]
fn test_alias_allowed_when_frozen() {
    let container = Container::new();
    container.set_value("original", 5i64).unwrap();
    container.freeze();

    container.alias("late", "original");
    assert_eq!(*container.get::<i64>("late").unwrap(), 5);
}

#[test]
fn test_descriptor_lists_aliases() {
    let container = Container::new();
    container.set_value("db", 1u8).unwrap();
    container.alias("primary", "db").alias("database", "primary");

    let descriptors = container.descriptors();
    assert_eq!(descriptors[0].aliases, vec!["database", "primary"]);
}
