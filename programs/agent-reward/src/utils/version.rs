//! Version checking for reward configuration upgrades

use crate::errors::RewardError;
use crate::state::{RewardConfig, CURRENT_PROTOCOL_VERSION, MIN_SUPPORTED_VERSION};
use anchor_lang::prelude::*;

/// Check that the reward configuration can be read by this program build
///
/// # Returns
/// * `Ok(())` if version is compatible
/// * `Err(RewardError::AccountVersionTooOld)` if the account needs migration
/// * `Err(RewardError::AccountVersionTooNew)` if the program needs upgrade
/// * `Err(RewardError::VersionMismatchProtocol)` if the config is inconsistent
pub fn check_version_compatible(config: &RewardConfig) -> Result<()> {
    if config.protocol_version < config.min_supported_version {
        msg!(
            "Account version {} is below its minimum supported {}",
            config.protocol_version,
            config.min_supported_version
        );
        return Err(RewardError::AccountVersionTooOld.into());
    }

    if config.protocol_version > CURRENT_PROTOCOL_VERSION {
        msg!(
            "Account version {} is newer than program version {}",
            config.protocol_version,
            CURRENT_PROTOCOL_VERSION
        );
        return Err(RewardError::AccountVersionTooNew.into());
    }

    if config.min_supported_version < MIN_SUPPORTED_VERSION
        || config.min_supported_version > CURRENT_PROTOCOL_VERSION
    {
        msg!(
            "Account min_supported_version {} is outside supported range {}-{}",
            config.min_supported_version,
            MIN_SUPPORTED_VERSION,
            CURRENT_PROTOCOL_VERSION
        );
        return Err(RewardError::VersionMismatchProtocol.into());
    }

    Ok(())
}
