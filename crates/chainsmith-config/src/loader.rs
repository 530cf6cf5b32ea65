//! Configuration loading and validation.

use std::fs;
use std::path::Path;

use thiserror::Error;

use chainsmith_core::types::VERIFY_ALL;

use crate::NetworksConfig;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),
}

/// Load the full network configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<NetworksConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: NetworksConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &NetworksConfig) -> Result<(), ConfigError> {
    for (network_name, actions) in &config.networks {
        if network_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "network name must not be empty".to_string(),
            ));
        }

        for entry in &actions.deploy {
            if entry.contract_name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "networks.{network_name}.deploy[].contract_name must not be empty"
                )));
            }
        }

        for entry in &actions.initialize {
            if entry.contract_name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "networks.{network_name}.initialize[].contract_name must not be empty"
                )));
            }
            if entry.function_name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "networks.{network_name}.initialize[{}].function_name must not be empty",
                    entry.contract_name
                )));
            }
        }

        // ALL is only meaningful as the sole verify entry.
        if actions.verify.len() > 1 && actions.verify.iter().any(|name| name == VERIFY_ALL) {
            return Err(ConfigError::Invalid(format!(
                "networks.{network_name}.verify: '{VERIFY_ALL}' must be the only entry"
            )));
        }
        for name in &actions.verify {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "networks.{network_name}.verify[] entries must not be empty"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_config(yaml: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), yaml).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
networks:
  localhost:
    deploy:
      - contract_name: DN404Mirror
        args: ["SIGNER[0]"]
      - contract_name: SimpleDN404
        args: ["SimpleDN404", "DN404", 10000, 18, "SIGNER[0]", "DN404Mirror.address"]
    initialize: []
    verify: []
  sepolia:
    deploy:
      - contract_name: DN404Mirror
        args: ["SIGNER[0]"]
    initialize:
      - contract_name: DN404Mirror
        function_name: setOwner
        args: ["SIGNER[1]"]
    verify: ["ALL"]
"#,
        );

        let config = load_config(file.path()).unwrap();
        let localhost = config.network("localhost").unwrap();
        assert_eq!(localhost.deploy.len(), 2);
        assert_eq!(localhost.deploy[1].contract_name, "SimpleDN404");
        assert_eq!(
            localhost.deploy[1].args.as_ref().unwrap()[5],
            json!("DN404Mirror.address")
        );

        let sepolia = config.network("sepolia").unwrap();
        assert_eq!(sepolia.verify, vec!["ALL"]);
        assert_eq!(sepolia.initialize[0].function_name, "setOwner");
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let file = write_config(
            r#"
networks:
  localhost:
    deploy:
      - contract_name: Token
"#,
        );
        let config = load_config(file.path()).unwrap();
        let localhost = config.network("localhost").unwrap();
        assert!(localhost.initialize.is_empty());
        assert!(localhost.verify.is_empty());
        assert!(localhost.deploy[0].args.is_none());
    }

    #[test]
    fn test_unknown_network_is_an_error() {
        let file = write_config("networks: {}\n");
        let config = load_config(file.path()).unwrap();
        assert!(matches!(
            config.network("mainnet"),
            Err(ConfigError::UnknownNetwork(_))
        ));
    }

    #[test]
    fn test_empty_contract_name_rejected() {
        let file = write_config(
            r#"
networks:
  localhost:
    deploy:
      - contract_name: ""
"#,
        );
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_all_sentinel_must_be_alone() {
        let file = write_config(
            r#"
networks:
  sepolia:
    verify: ["ALL", "Token"]
"#,
        );
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }
}
