//! Cache de permissões de rota
//!
//! Expiração controlada por relógio manual

use chrono::{Duration, TimeZone, Utc};
use maxfama::config::Config;
use maxfama_common::cache::{permission_cache, route_cache, route_key};
use maxfama_common::ManualClock;

#[test]
fn test_route_cache_expires_after_ttl() {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap());
    let mut cache = route_cache(&clock);

    cache.insert(route_key("u1", "/dashboard"), true);
    assert_eq!(cache.get(&route_key("u1", "/dashboard")), Some(true));

    clock.advance(Duration::seconds(29));
    assert_eq!(cache.get(&route_key("u1", "/dashboard")), Some(true));

    clock.advance(Duration::seconds(1));
    assert_eq!(cache.get(&route_key("u1", "/dashboard")), None);
}

#[test]
fn test_permission_cache_is_shorter() {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap());
    let mut routes = route_cache(&clock);
    let mut permissions = permission_cache(&clock);

    routes.insert(route_key("u1", "/leads"), true);
    permissions.insert(route_key("u1", "/leads"), false);

    clock.advance(Duration::seconds(6));
    assert_eq!(permissions.get(&route_key("u1", "/leads")), None);
    assert_eq!(routes.get(&route_key("u1", "/leads")), Some(true));
    assert_eq!(permissions.purge_expired(), 1);
    assert!(permissions.is_empty());
}

#[test]
fn test_keys_are_per_user() {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap());
    let mut cache = route_cache(&clock);

    cache.insert(route_key("u1", "/admin"), true);
    assert_eq!(cache.get(&route_key("u2", "/admin")), None);

    assert!(cache.invalidate(&route_key("u1", "/admin")));
    assert!(!cache.invalidate(&route_key("u1", "/admin")));
}

#[test]
fn test_configured_cache_ttl() {
    let config = Config {
        route_cache_ttl_seconds: 10,
        ..Default::default()
    };
    let cache = config.route_cache();
    assert_eq!(cache.ttl(), Duration::seconds(10));
    assert!(cache.is_empty());
}
