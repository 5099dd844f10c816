//! Demo settings loaded via OrthoConfig.

#![expect(
    missing_docs,
    reason = "the OrthoConfig derive emits undocumented CLI items"
)]

use std::ffi::OsString;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use super::DemoError;

/// Settings controlling the demo output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FIXTURE_DEMO")]
pub struct DemoSettings {
    /// Seed for the person fixture.
    #[ortho_config(default = 38)]
    pub person_seed: u64,
    /// Seed for the developer fixture.
    #[ortho_config(default = 7)]
    pub developer_seed: u64,
    /// Emit single-line JSON instead of pretty output.
    #[ortho_config(default = false)]
    pub compact: bool,
    /// Optional fixture config file; only its policy and depth limit apply.
    pub config_path: Option<PathBuf>,
}

/// Loads settings from arguments, environment, and configuration files.
///
/// # Errors
///
/// Returns [`DemoError::Settings`] when any source fails to parse.
pub fn load_settings<I>(args: I) -> Result<DemoSettings, DemoError>
where
    I: IntoIterator<Item = OsString>,
{
    let args: Vec<OsString> = args.into_iter().collect();
    DemoSettings::load_from_iter(args).map_err(|e| DemoError::Settings {
        message: e.to_string(),
    })
}
