//! Ordering policies — decide in which order one dispatch cycle tries the pool.
//!
//! Default: `RandomOrder` (uniform shuffle per request, spreads load without coordination).
//! `SequentialOrder` keeps the configured order; tests use it for deterministic rotation.
//!
//! The dispatcher holds an `Arc<dyn OrderingPolicy>`, chosen at startup via config.

use std::str::FromStr;
use std::sync::Arc;

use rand::seq::SliceRandom;

use super::credentials::{Credential, CredentialPool};

pub trait OrderingPolicy: Send + Sync {
    /// Returns every credential of the pool exactly once, in attempt order.
    fn order<'a>(&self, pool: &'a CredentialPool) -> Vec<&'a Credential>;

    fn name(&self) -> &'static str;
}

/// Uniform random permutation, fresh for every call.
pub struct RandomOrder;

impl OrderingPolicy for RandomOrder {
    fn order<'a>(&self, pool: &'a CredentialPool) -> Vec<&'a Credential> {
        let mut order: Vec<&Credential> = pool.as_slice().iter().collect();
        order.shuffle(&mut rand::rng());
        order
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// The pool's own order, unchanged.
pub struct SequentialOrder;

impl OrderingPolicy for SequentialOrder {
    fn order<'a>(&self, pool: &'a CredentialPool) -> Vec<&'a Credential> {
        pool.as_slice().iter().collect()
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}

/// Config-level selector for the ordering policy (`CREDENTIAL_ORDER`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderingKind {
    #[default]
    Random,
    Sequential,
}

impl OrderingKind {
    pub fn policy(self) -> Arc<dyn OrderingPolicy> {
        match self {
            OrderingKind::Random => Arc::new(RandomOrder),
            OrderingKind::Sequential => Arc::new(SequentialOrder),
        }
    }
}

impl FromStr for OrderingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(OrderingKind::Random),
            "sequential" => Ok(OrderingKind::Sequential),
            other => Err(format!(
                "unknown credential order '{other}' (expected 'random' or 'sequential')"
            )),
        }
    }
}
