//! Proxy rotation over a configured list

use crate::proxy::models::Proxy;
use rand::Rng;

/// How the next proxy is chosen from the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationStrategy {
    /// Walk the list in order, wrapping at the end
    #[default]
    RoundRobin,
    /// Pick uniformly at random
    Random,
}

/// Cursor over the configured proxy list.
///
/// An empty list always yields `None`, which callers treat as a direct
/// connection. The cursor is plain owned state; there is no shared or
/// global rotation index.
#[derive(Debug, Clone)]
pub struct ProxyCursor {
    proxies: Vec<Proxy>,
    strategy: RotationStrategy,
    index: usize,
}

impl ProxyCursor {
    pub fn new(proxies: Vec<Proxy>, strategy: RotationStrategy) -> Self {
        Self {
            proxies,
            strategy,
            index: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Next proxy according to the strategy, or `None` if the list is empty
    pub fn next(&mut self) -> Option<Proxy> {
        if self.proxies.is_empty() {
            return None;
        }

        let picked = match self.strategy {
            RotationStrategy::RoundRobin => {
                let current = self.index;
                self.index = (self.index + 1) % self.proxies.len();
                current
            }
            RotationStrategy::Random => rand::thread_rng().gen_range(0..self.proxies.len()),
        };

        Some(self.proxies[picked].clone())
    }
}
