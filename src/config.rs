// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for topology synthesis.

/// The lossflow label given to converters that don't declare one.
pub const DEFAULT_LOSSFLOW: &str = "waste_heat";

/// Configuration options for [`synthesize`][crate::synthesize].
#[derive(Clone, Default, Debug)]
pub struct SynthesisConfig {
    /// Whether to allow flows that have endpoints on only one side at a
    /// location, for example a source whose flow nobody consumes.  When this
    /// is `true`, such endpoints are left unwired and a warning is logged.
    /// Otherwise synthesis fails.
    pub allow_idle_flows: bool,

    /// The lossflow label for converters that don't declare one.  Falls back
    /// to [`DEFAULT_LOSSFLOW`] when `None`.
    pub lossflow: Option<String>,
}

impl SynthesisConfig {
    pub(crate) fn lossflow(&self) -> &str {
        self.lossflow.as_deref().unwrap_or(DEFAULT_LOSSFLOW)
    }
}
