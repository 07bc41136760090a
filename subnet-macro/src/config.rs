use std::net::Ipv4Addr;

use anyhow::{bail, Context};

const DEFAULT_CIDR_BLOCK: &str = "10.2.0.0/16";
const CIDR_BLOCK_ENV: &str = "DEFAULT_CIDR_BLOCK";

/// Values used when the template author leaves a parameter out.
#[derive(Debug, Clone, PartialEq)]
pub struct SubnetDefaults {
    pub cidr_block: String,
}

impl SubnetDefaults {
    pub fn from_env() -> anyhow::Result<Self> {
        let cidr_block = match std::env::var(CIDR_BLOCK_ENV) {
            Ok(value) => value,
            Err(std::env::VarError::NotPresent) => DEFAULT_CIDR_BLOCK.to_string(),
            Err(err) => return Err(err).context(CIDR_BLOCK_ENV),
        };

        if let Err(reason) = check_cidr(&cidr_block) {
            bail!("{CIDR_BLOCK_ENV}={cidr_block} is not usable: {reason}");
        }

        Ok(Self { cidr_block })
    }
}

impl Default for SubnetDefaults {
    fn default() -> Self {
        Self {
            cidr_block: DEFAULT_CIDR_BLOCK.to_string(),
        }
    }
}

/// Accepts IPv4 CIDR notation (`a.b.c.d/n`).
pub fn check_cidr(value: &str) -> Result<(), String> {
    let (address, prefix) = value
        .split_once('/')
        .ok_or_else(|| "expected a.b.c.d/n".to_string())?;

    if address.parse::<Ipv4Addr>().is_err() {
        return Err(format!("{address} is not an IPv4 address"));
    }

    // `u8::from_str` also takes a leading `+`.
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("/{prefix} is not a valid prefix length"));
    }

    match prefix.parse::<u8>() {
        Ok(bits) if bits <= 32 => Ok(()),
        _ => Err(format!("/{prefix} is not a valid prefix length")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn from_env_uses_default_when_unset() {
        std::env::remove_var(CIDR_BLOCK_ENV);
        assert_eq!(SubnetDefaults::from_env().unwrap(), SubnetDefaults::default());
    }

    #[test]
    #[serial]
    fn from_env_reads_override() {
        std::env::set_var(CIDR_BLOCK_ENV, "172.16.0.0/20");
        let defaults = SubnetDefaults::from_env().unwrap();
        std::env::remove_var(CIDR_BLOCK_ENV);

        assert_eq!(defaults.cidr_block, "172.16.0.0/20");
    }

    #[test]
    #[serial]
    fn from_env_rejects_bad_cidr() {
        std::env::set_var(CIDR_BLOCK_ENV, "10.0.0.0");
        let result = SubnetDefaults::from_env();
        std::env::remove_var(CIDR_BLOCK_ENV);

        assert!(result.is_err());
    }

    #[test]
    fn check_cidr_accepts_valid_blocks() {
        assert!(check_cidr("10.2.0.0/16").is_ok());
        assert!(check_cidr("0.0.0.0/0").is_ok());
        assert!(check_cidr("255.255.255.255/32").is_ok());
    }

    #[test]
    fn check_cidr_rejects_invalid_blocks() {
        assert!(check_cidr("10.2.0.0").is_err());
        assert!(check_cidr("10.2.0/16").is_err());
        assert!(check_cidr("10.2.0.256/16").is_err());
        assert!(check_cidr("10.2.0.0/33").is_err());
        assert!(check_cidr("10.2.0.0/x").is_err());
        assert!(check_cidr("10.2.0.0/").is_err());
    }

    #[test]
    fn check_cidr_rejects_signs_and_padding() {
        assert!(check_cidr("10.+2.0.0/16").is_err());
        assert!(check_cidr("10.2.0.0/+16").is_err());
        assert!(check_cidr("10.02.0.0/16").is_err());
        assert!(check_cidr(" 10.2.0.0/16").is_err());
    }
}
