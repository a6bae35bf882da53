// tests/config_env.rs
//
// Environment layering for the assistant config. These tests mutate process
// env, so they run serially.

use std::env;
use std::time::Duration;

use archana_assistant::config::assistant::{
    ENV_ASSISTANT_CONFIG_PATH, ENV_ASSISTANT_MODE, ENV_ASSISTANT_MODEL,
    ENV_ASSISTANT_TIMEOUT_SECS, ENV_OPENAI_API_KEY,
};
use archana_assistant::{AssistantConfig, Mode};
use serial_test::serial;

fn clear_env() {
    for name in [
        ENV_ASSISTANT_CONFIG_PATH,
        ENV_ASSISTANT_MODE,
        ENV_ASSISTANT_MODEL,
        ENV_ASSISTANT_TIMEOUT_SECS,
        ENV_OPENAI_API_KEY,
    ] {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn missing_file_falls_back_to_defaults() {
    clear_env();
    env::set_var(ENV_ASSISTANT_CONFIG_PATH, "config/does-not-exist.toml");

    let cfg = AssistantConfig::from_env().expect("defaults");
    assert_eq!(cfg.mode, Mode::Rule);
    assert_eq!(cfg.model, "gpt-4o-mini");
    assert!(cfg.api_key.is_none());

    clear_env();
}

#[test]
#[serial]
fn unreadable_file_falls_back_to_defaults() {
    clear_env();
    // A directory exists but cannot be read as a file.
    env::set_var(ENV_ASSISTANT_CONFIG_PATH, "src");

    let cfg = AssistantConfig::from_env().expect("defaults");
    assert_eq!(cfg.mode, Mode::Rule);
    assert_eq!(cfg.timeout(), Duration::from_secs(20));

    clear_env();
}

#[test]
#[serial]
fn malformed_file_is_an_error() {
    clear_env();
    // Valid path, not TOML.
    env::set_var(ENV_ASSISTANT_CONFIG_PATH, "knowledge_base.json");

    assert!(AssistantConfig::from_env().is_err());

    clear_env();
}

#[test]
#[serial]
fn bundled_config_file_loads() {
    clear_env();
    env::set_var(ENV_ASSISTANT_CONFIG_PATH, "config/assistant.toml");

    let cfg = AssistantConfig::from_env().expect("bundled config");
    assert_eq!(cfg.mode, Mode::Rule);
    assert_eq!(cfg.timeout(), Duration::from_secs(20));

    clear_env();
}

#[test]
#[serial]
fn env_overrides_win() {
    clear_env();
    env::set_var(ENV_ASSISTANT_CONFIG_PATH, "config/does-not-exist.toml");
    env::set_var(ENV_ASSISTANT_MODE, "generative");
    env::set_var(ENV_ASSISTANT_MODEL, "gpt-4.1-mini");
    env::set_var(ENV_ASSISTANT_TIMEOUT_SECS, "7");
    env::set_var(ENV_OPENAI_API_KEY, "sk-test");

    let cfg = AssistantConfig::from_env().expect("env config");
    assert_eq!(cfg.mode, Mode::Generative);
    assert_eq!(cfg.model, "gpt-4.1-mini");
    assert_eq!(cfg.timeout(), Duration::from_secs(7));
    assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));

    let resolver = cfg.build_resolver().expect("resolver");
    assert_eq!(resolver.mode(), Mode::Generative);

    clear_env();
}

#[test]
#[serial]
fn invalid_env_values_are_errors() {
    clear_env();
    env::set_var(ENV_ASSISTANT_CONFIG_PATH, "config/does-not-exist.toml");

    env::set_var(ENV_ASSISTANT_MODE, "psychic");
    assert!(AssistantConfig::from_env().is_err());
    env::remove_var(ENV_ASSISTANT_MODE);

    env::set_var(ENV_ASSISTANT_TIMEOUT_SECS, "soon");
    assert!(AssistantConfig::from_env().is_err());

    clear_env();
}

#[test]
#[serial]
fn blank_api_key_counts_as_missing() {
    clear_env();
    env::set_var(ENV_ASSISTANT_CONFIG_PATH, "config/does-not-exist.toml");
    env::set_var(ENV_OPENAI_API_KEY, "   ");

    let cfg = AssistantConfig::from_env().expect("config");
    assert!(cfg.api_key.is_none());

    clear_env();
}
