use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_cover_a_fresh_checkout() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.database.path, PathBuf::from(DEFAULT_DATABASE_PATH));
    assert_eq!(settings.admin.username, DEFAULT_ADMIN_USERNAME);
    assert_eq!(settings.admin.password, DEFAULT_ADMIN_PASSWORD);
    assert!(settings.admin.session_secret.is_none());
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_port_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(0);

    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid { key: "server.port", .. })
    ));
}

#[test]
fn short_session_secret_is_rejected() {
    let mut raw = RawSettings::default();
    raw.admin.session_secret = Some("short".to_string());

    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "admin.session_secret",
            ..
        })
    ));
}

#[test]
fn long_session_secret_is_kept() {
    let mut raw = RawSettings::default();
    let secret = "s".repeat(MIN_SESSION_SECRET_BYTES);
    raw.admin.session_secret = Some(secret.clone());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.admin.session_secret.as_deref(), Some(secret.as_str()));
}
