// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample_config() -> WorkspaceConfig {
    serde_json::from_str(
        r#"{
            "name": "dev",
            "defaultEnv": "default",
            "environments": {
                "default": {
                    "recipe": {"type": "dockerfile", "contentType": "text/x-dockerfile"},
                    "machines": {
                        "dev-machine": {
                            "attributes": {"memoryLimitBytes": 2147483648},
                            "agents": ["exec", "terminal"]
                        }
                    }
                }
            },
            "projects": [{"name": "api", "path": "/api"}],
            "commands": [{"name": "build", "type": "exec", "commandLine": "cargo build"}]
        }"#,
    )
    .unwrap()
}

#[test]
fn config_equality_is_structural() {
    let a = sample_config();
    let b = sample_config();
    assert_eq!(a, b);
}

#[test]
fn config_inequality_on_nested_change() {
    let a = sample_config();
    let mut b = sample_config();
    let env = b.environments.get_mut("default").unwrap();
    let machine = env.machines.get_mut("dev-machine").unwrap();
    machine.attributes.insert("memoryLimitBytes".to_string(), serde_json::json!(4294967296u64));

    assert_ne!(a, b);
}

#[test]
fn config_round_trips_camel_case_fields() {
    let config = sample_config();
    let json = serde_json::to_value(&config).unwrap();

    assert_eq!(json["defaultEnv"], "default");
    assert_eq!(json["environments"]["default"]["recipe"]["contentType"], "text/x-dockerfile");

    let back: WorkspaceConfig = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn missing_collections_default_to_empty() {
    let config: WorkspaceConfig =
        serde_json::from_str(r#"{"name": "bare", "defaultEnv": "default"}"#).unwrap();

    assert!(config.environments.is_empty());
    assert!(config.projects.is_empty());
    assert!(config.commands.is_empty());
}
