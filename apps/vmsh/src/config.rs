// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Load and validate optional vmsh TOML configuration.
// Author: Lukas Bower

//! Optional TOML configuration for the vmsh shell.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use vmsh_core::{NamespaceOptions, DEFAULT_MAC, DEFAULT_ROOT_LABEL};

/// Prompt printed before every interactive command.
pub const DEFAULT_PROMPT: &str = "vmsh> ";

const DEFAULT_CONFIG_FILE: &str = "vmsh.toml";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VmshConfig {
    /// Shell presentation settings.
    pub shell: ShellConfig,
    /// NIC construction defaults.
    pub nic: NicConfig,
}

/// `[shell]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Interactive prompt.
    pub prompt: String,
    /// Label of the root shell node.
    pub root_label: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_owned(),
            root_label: DEFAULT_ROOT_LABEL.to_owned(),
        }
    }
}

/// `[nic]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NicConfig {
    /// MAC assigned to NICs created without one.
    pub default_mac: String,
}

impl Default for NicConfig {
    fn default() -> Self {
        Self {
            default_mac: DEFAULT_MAC.to_owned(),
        }
    }
}

impl VmshConfig {
    /// Engine options derived from this configuration.
    pub fn namespace_options(&self) -> NamespaceOptions {
        NamespaceOptions {
            root_label: self.shell.root_label.clone(),
            default_mac: self.nic.default_mac.clone(),
        }
    }
}

/// Config file looked up in the working directory when none is given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<VmshConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read vmsh config {}", path.display()))?;
    let config: VmshConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse vmsh config {}", path.display()))?;
    validate_config(&config)
        .with_context(|| format!("invalid vmsh config {}", path.display()))?;
    Ok(config)
}

/// Reject settings the shell cannot honour.
pub fn validate_config(config: &VmshConfig) -> Result<()> {
    if config.shell.prompt.is_empty() {
        return Err(anyhow!("shell.prompt must not be empty"));
    }
    let label = config.shell.root_label.as_str();
    if label.is_empty() {
        return Err(anyhow!("shell.root_label must not be empty"));
    }
    if label.contains('/') || label.chars().any(char::is_whitespace) {
        return Err(anyhow!(
            "shell.root_label '{label}' must not contain '/' or whitespace"
        ));
    }
    if !is_mac(&config.nic.default_mac) {
        return Err(anyhow!(
            "nic.default_mac '{}' is not of the form xx:xx:xx:xx:xx:xx",
            config.nic.default_mac
        ));
    }
    Ok(())
}

fn is_mac(text: &str) -> bool {
    let octets: Vec<&str> = text.split(':').collect();
    octets.len() == 6
        && octets
            .iter()
            .all(|octet| octet.len() == 2 && octet.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: VmshConfig = toml::from_str("").expect("parse");
        assert_eq!(config, VmshConfig::default());
        assert_eq!(config.namespace_options(), NamespaceOptions::default());
        validate_config(&config).expect("defaults are valid");
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config: VmshConfig = toml::from_str("[shell]\nroot_label = \"lab\"\n").expect("parse");
        assert_eq!(config.shell.root_label, "lab");
        assert_eq!(config.shell.prompt, DEFAULT_PROMPT);
        assert_eq!(config.nic.default_mac, DEFAULT_MAC);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = toml::from_str::<VmshConfig>("[shell]\ncolour = \"red\"\n")
            .expect_err("unknown key");
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = VmshConfig::default();
        config.shell.root_label = "my lab".to_owned();
        assert!(validate_config(&config).is_err());

        let mut config = VmshConfig::default();
        config.shell.prompt.clear();
        assert!(validate_config(&config).is_err());

        let mut config = VmshConfig::default();
        config.nic.default_mac = "52:54:00:0d:ae".to_owned();
        let err = validate_config(&config).expect_err("short mac");
        assert!(err.to_string().contains("nic.default_mac"));

        config.nic.default_mac = "52:54:00:0d:ae:zz".to_owned();
        assert!(validate_config(&config).is_err());
    }
}
