#![allow(clippy::unwrap_used)]
// Loading, saving, and credential resolution against real files and env.

use std::path::Path;
use std::time::Duration;

use figment::Jail;
use secrecy::ExposeSecret;

use printfleet_config::{
    Config, LogFormat, Profile, active_profile, load_config_from, profile_to_fleet_config,
    resolve_api_key, save_config_to,
};

const SAMPLE: &str = r#"
default_profile = "farm"

[defaults]
timeout = 12
recursive_listing = true

[defaults.log]
level = "printfleet_core=debug"
format = "json"

[profiles.farm]
server = "http://printfarm.local:4000"
api_key = "plain-key"

[profiles.lab]
server = "http://lab.local"
api_key_env = "LAB_PRINT_KEY"
timeout = 3
"#;

#[test]
fn test_load_from_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", SAMPLE)?;

        let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;

        assert_eq!(cfg.default_profile.as_deref(), Some("farm"));
        assert_eq!(cfg.defaults.timeout, 12);
        assert!(cfg.defaults.recursive_listing);
        assert_eq!(cfg.defaults.log.format, LogFormat::Json);
        assert_eq!(cfg.profiles.len(), 2);
        Ok(())
    });
}

#[test]
fn test_missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let cfg = load_config_from(Path::new("absent.toml")).map_err(|e| e.to_string())?;

        assert_eq!(cfg.default_profile, None);
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
        Ok(())
    });
}

#[test]
fn test_single_profile_file_needs_no_default() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[profiles.farm]
server = "http://printfarm.local:4000"
"#,
        )?;

        let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
        let (name, profile) = active_profile(&cfg, None).map_err(|e| e.to_string())?;

        assert_eq!(name, "farm");
        assert_eq!(profile.server, "http://printfarm.local:4000");
        Ok(())
    });
}

#[test]
fn test_env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", SAMPLE)?;
        jail.set_env("PRINTFLEET_DEFAULTS__TIMEOUT", "45");
        jail.set_env("PRINTFLEET_DEFAULT_PROFILE", "lab");

        let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;

        assert_eq!(cfg.defaults.timeout, 45);
        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
        Ok(())
    });
}

#[test]
fn test_api_key_chain_order() {
    Jail::expect_with(|jail| {
        let mut profile = Profile {
            server: "http://lab.local".into(),
            api_key: Some("plain".into()),
            api_key_env: Some("LAB_PRINT_KEY".into()),
            ..Profile::default()
        };

        assert_eq!(resolve_api_key(&profile).unwrap().expose_secret(), "plain");

        jail.set_env("PRINTFLEET_API_KEY", "global");
        assert_eq!(resolve_api_key(&profile).unwrap().expose_secret(), "global");

        jail.set_env("LAB_PRINT_KEY", "from-profile-env");
        assert_eq!(
            resolve_api_key(&profile).unwrap().expose_secret(),
            "from-profile-env"
        );

        profile.api_key_env = None;
        assert_eq!(resolve_api_key(&profile).unwrap().expose_secret(), "global");
        Ok(())
    });
}

#[test]
fn test_profile_to_fleet_config_applies_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", SAMPLE)?;
        let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;

        let (name, _) = active_profile(&cfg, None).map_err(|e| e.to_string())?;
        let farm = profile_to_fleet_config(&cfg, name).map_err(|e| e.to_string())?;
        assert_eq!(farm.timeout, Duration::from_secs(12));
        assert!(farm.recursive_file_listing);
        assert_eq!(farm.api_key.unwrap().expose_secret(), "plain-key");

        let lab = profile_to_fleet_config(&cfg, "lab").map_err(|e| e.to_string())?;
        assert_eq!(lab.timeout, Duration::from_secs(3));
        assert!(lab.api_key.is_none());
        Ok(())
    });
}

#[test]
fn test_save_then_load() {
    Jail::expect_with(|_jail| {
        let path = Path::new("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                server: "http://printfarm.local:4000".into(),
                timeout: Some(7),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).map_err(|e| e.to_string())?;

        let loaded = load_config_from(&path).map_err(|e| e.to_string())?;
        let (name, profile) = active_profile(&loaded, None).map_err(|e| e.to_string())?;
        assert_eq!(name, "default");
        assert_eq!(profile.timeout, Some(7));
        Ok(())
    });
}
