use ferrous_locator::{Container, DiError};
use serial_test::serial;
use std::env;

#[test]
#[serial]
fn test_load_env_with_prefix() {
    env::set_var("FLTEST_DATABASE__URL", "postgres://localhost");
    env::set_var("FLTEST_PORT", "8080");

    let container = Container::new();
    container.load_env("FLTEST_").unwrap();

    assert_eq!(
        *container.get::<String>("database.url").unwrap(),
        "postgres://localhost"
    );
    // Environment parameters are always strings.
    assert_eq!(*container.get::<String>("port").unwrap(), "8080");
    assert!(container.get::<i64>("port").is_err());

    env::remove_var("FLTEST_DATABASE__URL");
    env::remove_var("FLTEST_PORT");
}

#[test]
#[serial]
fn test_load_env_replaces_existing_definitions() {
    env::set_var("FLTEST_MODE", "production");

    let container = Container::new();
    container.set_value("mode", "development".to_string()).unwrap();
    assert_eq!(*container.get::<String>("mode").unwrap(), "development");

    container.load_env("FLTEST_").unwrap();
    assert_eq!(*container.get::<String>("mode").unwrap(), "production");

    env::remove_var("FLTEST_MODE");
}

#[test]
#[serial]
fn test_load_env_on_frozen_container() {
    env::set_var("FLTEST_LATE", "1");

    let container = Container::new();
    container.freeze();
    assert!(matches!(container.load_env("FLTEST_"), Err(DiError::Frozen(_))));
    assert!(!container.has("late"));

    env::remove_var("FLTEST_LATE");
}

#[test]
fn test_load_vars_ignores_other_prefixes() {
    let container = Container::new();
    container
        .load_vars(
            "SVC_",
            vec![
                ("SVC_CACHE__TTL".to_string(), "30".to_string()),
                ("OTHER_CACHE__TTL".to_string(), "60".to_string()),
                ("SVC_".to_string(), "empty".to_string()),
            ],
        )
        .unwrap();

    assert_eq!(container.ids(), vec!["cache.ttl"]);
    assert_eq!(*container.get::<String>("cache.ttl").unwrap(), "30");
}

#[test]
fn test_loaded_parameters_feed_factories() {
    struct Pool {
        size: usize,
    }

    let container = Container::new();
    container
        .load_vars("APP_", vec![("APP_POOL__SIZE".to_string(), "4".to_string())])
        .unwrap()
        .try_set_factory("pool", |c| {
            let size = c
                .get::<String>("pool.size")?
                .parse::<usize>()
                .map_err(DiError::factory)?;
            Ok(Pool { size })
        })
        .unwrap();

    assert_eq!(container.get::<Pool>("pool").unwrap().size, 4);
}
