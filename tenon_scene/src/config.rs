// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time configuration.

use tenon_responder::OrderPolicy;

use crate::layout::Direction;

/// Fanout of the R-tree behind the interactive registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Minimum entries per non-root node.
    pub min_children: usize,
    /// Maximum entries per node.
    pub max_children: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            min_children: 25,
            max_children: 50,
        }
    }
}

impl RegistryConfig {
    /// The configuration with out-of-range values clamped.
    ///
    /// `max_children` is at least 3 and `min_children` lies in
    /// `2..=(max_children + 1) / 2`, so an overflowing node can always split into
    /// two legal halves.
    pub fn normalized(self) -> Self {
        let max_children = self.max_children.max(3);
        Self {
            min_children: self.min_children.clamp(2, max_children.div_ceil(2)),
            max_children,
        }
    }
}

/// How the root is sized when layout runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RootSizing {
    /// Fixed pixel dimensions taken from the viewport.
    #[default]
    Viewport,
    /// Unconstrained; the root takes its content size.
    Auto,
}

/// Configuration of a [`Context`](crate::Context).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextConfig {
    /// Spatial index tuning.
    pub registry: RegistryConfig,
    /// Dispatch order among overlapping hits.
    pub order: OrderPolicy,
    /// Root sizing mode.
    pub sizing: RootSizing,
    /// Horizontal layout direction.
    pub direction: Direction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_fanout() {
        let c = RegistryConfig::default();
        assert_eq!((c.min_children, c.max_children), (25, 50));
        assert_eq!(c.normalized(), c);
    }

    #[test]
    fn normalization_clamps() {
        let c = RegistryConfig {
            min_children: 40,
            max_children: 50,
        }
        .normalized();
        assert_eq!(c.min_children, 25);

        let c = RegistryConfig {
            min_children: 0,
            max_children: 0,
        }
        .normalized();
        assert_eq!((c.min_children, c.max_children), (2, 3));
    }
}
