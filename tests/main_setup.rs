use competitions_portal::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic};

// --- Setup/Teardown Utilities ---

const CONFIG_VARS: [&str; 4] = ["APP_ENV", "DATABASE_URL", "JWT_SECRET", "BIND_ADDR"];

/// Runs `test` with the given variables set (and every other config variable unset), restoring
/// the original environment afterwards even if the test panics.
fn run_with_env<T, R>(vars: &[(&str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals {
        unsafe {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    // JWT_SECRET is missing.
    let result = panic::catch_unwind(|| {
        run_with_env(
            &[("APP_ENV", "production"), ("DATABASE_URL", "sqlite://prod.db")],
            AppConfig::load,
        )
    });

    assert!(
        result.is_err(),
        "Production config loading should panic on missing secrets"
    );
}

#[test]
#[serial]
fn test_app_config_production_requires_database_url() {
    let result = panic::catch_unwind(|| {
        run_with_env(
            &[("APP_ENV", "production"), ("JWT_SECRET", "prod-secret")],
            AppConfig::load,
        )
    });

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_app_config_production_complete() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("DATABASE_URL", "sqlite://prod.db"),
            ("JWT_SECRET", "prod-secret"),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ],
        AppConfig::load,
    );

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.db_url, "sqlite://prod.db");
    assert_eq!(config.jwt_secret, "prod-secret");
    assert_eq!(config.bind_addr, "127.0.0.1:8080");
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(&[("APP_ENV", "local")], AppConfig::load);

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.db_url, "sqlite://competitions.db");
    assert_eq!(config.jwt_secret, "super-secure-test-secret-value-local");
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_unknown_app_env_falls_back_to_local() {
    let config = run_with_env(&[("APP_ENV", "staging")], AppConfig::load);
    assert_eq!(config.env, Env::Local);
}

#[test]
fn test_default_config_is_in_memory() {
    let config = AppConfig::default();
    assert_eq!(config.env, Env::Local);
    assert!(config.db_url.contains(":memory:"));
}
