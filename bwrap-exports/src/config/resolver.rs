//! Profile resolution with support for composition and validation

use super::schema::{Config, ExportProfile};
use crate::error::{ExportError, Result};

/// Resolve an export profile by name, handling extends/composition
pub fn resolve_profile(config: &Config, name: &str) -> Result<ExportProfile> {
    let mut chain = Vec::new();
    resolve_profile_recursive(config, name, &mut chain)
}

fn resolve_profile_recursive(
    config: &Config,
    name: &str,
    chain: &mut Vec<String>,
) -> Result<ExportProfile> {
    if chain.iter().any(|seen| seen == name) {
        chain.push(name.to_string());
        return Err(ExportError::ConfigError(format!(
            "Circular reference in export profiles: {}",
            chain.join(" -> ")
        )));
    }

    let profile = config
        .profiles
        .get(name)
        .ok_or_else(|| ExportError::ConfigError(format!("Export profile not found: {}", name)))?
        .clone();

    // If no extends, return as-is
    if profile.extends.is_empty() {
        return Ok(profile);
    }

    chain.push(name.to_string());

    // Resolve all extended profiles and merge
    let mut merged = ExportProfile::default();
    for parent_name in &profile.extends {
        let parent = resolve_profile_recursive(config, parent_name, chain)?;
        merged = merge_profiles(merged, parent);
    }

    chain.pop();

    // Current profile overrides parents
    Ok(merge_profiles(merged, profile))
}

fn merge_profiles(base: ExportProfile, override_profile: ExportProfile) -> ExportProfile {
    // Path lists are concatenated, parents first; requests merge in the
    // export table anyway
    let mut ro_paths = base.ro_paths;
    ro_paths.extend(override_profile.ro_paths);

    let mut rw_paths = base.rw_paths;
    rw_paths.extend(override_profile.rw_paths);

    let mut hidden_paths = base.hidden_paths;
    hidden_paths.extend(override_profile.hidden_paths);

    let mut dirs = base.dirs;
    dirs.extend(override_profile.dirs);

    ExportProfile {
        description: override_profile.description.or(base.description),
        ro_paths,
        rw_paths,
        hidden_paths,
        dirs,
        host_fs: override_profile.host_fs.or(base.host_fs),
        extends: vec![], // Resolved, so clear extends
    }
}
