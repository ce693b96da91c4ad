pub mod http;
pub mod imf;
pub mod util;
pub mod world_bank;

use crate::core::adapter::ProviderAdapter;
use crate::core::config::ProvidersConfig;
use clap::ValueEnum;
use std::fmt::Display;
use std::sync::Arc;

/// Upstream providers the proxy can front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ProviderKind {
    Imf,
    WorldBank,
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ProviderKind::Imf => "imf",
                ProviderKind::WorldBank => "world-bank",
            }
        )
    }
}

impl ProviderKind {
    pub fn adapter(&self, providers: &ProvidersConfig) -> Arc<dyn ProviderAdapter> {
        match self {
            ProviderKind::Imf => Arc::new(imf::ImfAdapter::new(&providers.imf.base_url)),
            ProviderKind::WorldBank => Arc::new(world_bank::WorldBankAdapter::new(
                &providers.world_bank.base_url,
            )),
        }
    }
}
