//! Asset ambiguity reporting
//!
//! The resolver and well-behaved route engines report ambiguity as the
//! structured `AmbiguousAsset` error. Some engines only produce free text of
//! the form `Ambiguity Error ... value:<symbol> chainName:<chain>`; those are
//! parsed here and converted to the structured variant, with candidates taken
//! from the local registry.

use crate::error::OrchestratorError;
use crate::registry::{AssetDescriptor, ChainRegistry};

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Write;
use tracing::debug;

lazy_static! {
    static ref AMBIGUITY_RE: Regex =
        Regex::new(r"Ambiguity Error.*value:([^\s.]+)\s+chainName:([^\s.]+)")
            .expect("ambiguity pattern must compile");
}

/// Extract `(value, chain_name)` from a free-text ambiguity message
pub fn parse_ambiguity(message: &str) -> Option<(String, String)> {
    AMBIGUITY_RE
        .captures(message)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
}

/// Convert free-text ambiguity errors to `AmbiguousAsset`; other errors pass through
pub fn translate(error: OrchestratorError, registry: &ChainRegistry) -> OrchestratorError {
    if matches!(error, OrchestratorError::AmbiguousAsset { .. }) {
        return error;
    }

    match parse_ambiguity(&error.to_string()) {
        Some((value, chain_name)) => {
            debug!("Engine reported ambiguous {} on {}", value, chain_name);
            let candidates = registry.resolver().candidates(&value, &chain_name);
            OrchestratorError::AmbiguousAsset {
                value,
                chain_name,
                candidates,
            }
        }
        None => error,
    }
}

/// User-facing prompt asking which of several assets was meant
pub fn disambiguation_prompt(value: &str, chain_name: &str, candidates: &[AssetDescriptor]) -> String {
    let mut prompt = format!(
        "Ambiguous asset \"{}\" on chain {}. Several assets share this symbol, \
         please specify the denom you want to use.",
        value, chain_name
    );

    if !candidates.is_empty() {
        prompt.push_str("\nAvailable options:");
        for (i, asset) in candidates.iter().enumerate() {
            let _ = write!(
                prompt,
                "\n{}. Symbol: {} Desc: {} Denom: {}",
                i + 1,
                asset.symbol,
                asset.description.as_deref().unwrap_or("-"),
                asset.base
            );
        }
    }

    prompt
}
