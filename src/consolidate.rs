//! Fold sparse layers into the combined layer.

use tracing::debug;

use crate::config::PipelineConfig;
use crate::types::{LayerFeatures, LayerSet, PublishedLayers, StaticLayers};

/// Reserved name of the catch-all layer.
pub const COMBINED_LAYER: &str = "Address Update";

/// Layers with fewer features than this are folded into [`COMBINED_LAYER`].
pub const CONSOLIDATION_THRESHOLD: usize = 50;

/// Merge every layer below [`CONSOLIDATION_THRESHOLD`] into the combined layer.
///
/// Folded layers are removed. Features already in the combined layer are kept
/// and folded features are appended after them, in layer-name order. In
/// deterministic mode nothing is folded. Either way an empty combined layer is
/// removed.
pub fn consolidate(layers: &mut LayerSet, config: &PipelineConfig) {
    let mut combined = layers.remove(COMBINED_LAYER).unwrap_or_default();

    if config.consolidates() {
        let small: Vec<String> = layers
            .iter()
            .filter(|(_, features)| features.len() < CONSOLIDATION_THRESHOLD)
            .map(|(name, _)| name.clone())
            .collect();

        for name in small {
            if let Some(features) = layers.remove(&name) {
                debug!(layer = %name, features = features.len(), "Folding small layer into combined layer");
                combined.extend(features);
            }
        }
    }

    if !combined.is_empty() {
        layers.insert(COMBINED_LAYER.to_string(), combined);
    }
}

/// Merge static special layers into the computed layers.
///
/// Static features are published exactly as read. A static layer replaces any
/// computed layer of the same name.
pub fn merge_static_layers(layers: LayerSet, special: Option<StaticLayers>) -> PublishedLayers {
    let mut published: PublishedLayers = layers
        .into_iter()
        .map(|(name, features)| (name, LayerFeatures::Computed(features)))
        .collect();

    for (name, features) in special.unwrap_or_default() {
        published.insert(name, LayerFeatures::Static(features));
    }

    published
}
