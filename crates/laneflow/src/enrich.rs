//! Presentation-time metric resolution against the shared catalog.
//!
//! Documents store metric *references* (a `definition_id` plus optional
//! per-node overrides); display name, unit, and default thresholds live in
//! the catalog and are joined here, at render time. Editing a catalog entry
//! therefore updates every referencing node without touching the document.
//! A reference to a missing definition resolves to a visible fallback
//! instead of failing.

use laneflow_schema::schema::{MetricBinding, Resources, Thresholds};

use crate::visual::VisualNode;

/// A metric binding joined with its catalog definition, ready to display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetric {
    pub binding_id: String,
    pub definition_id: String,
    pub name: String,
    pub unit: String,
    pub target: Option<String>,
    pub thresholds: Thresholds,
    /// True when the catalog has no matching definition; `name` then shows
    /// the raw id as a fallback.
    pub dangling: bool,
}

/// Resolves one binding against the catalog.
///
/// Per-node overrides win over catalog values for unit and thresholds. A
/// dangling reference yields the definition id as the display name and an
/// empty unit.
pub fn resolve(resources: &Resources, binding: &MetricBinding) -> ResolvedMetric {
    let definition = resources
        .kpi_definitions
        .iter()
        .find(|def| def.id == binding.definition_id);

    match definition {
        Some(def) => ResolvedMetric {
            binding_id: binding.id.clone(),
            definition_id: binding.definition_id.clone(),
            name: def.name.clone(),
            unit: binding.unit.clone().unwrap_or_else(|| def.unit.clone()),
            target: binding.target.clone(),
            thresholds: binding
                .thresholds
                .or(def.thresholds)
                .unwrap_or_default(),
            dangling: false,
        },
        None => ResolvedMetric {
            binding_id: binding.id.clone(),
            definition_id: binding.definition_id.clone(),
            name: binding.definition_id.clone(),
            unit: binding.unit.clone().unwrap_or_default(),
            target: binding.target.clone(),
            thresholds: binding.thresholds.unwrap_or_default(),
            dangling: true,
        },
    }
}

/// Resolves every metric bound to a visual element, in binding order.
pub fn resolve_all(resources: &Resources, node: &VisualNode) -> Vec<ResolvedMetric> {
    node.metrics
        .iter()
        .map(|binding| resolve(resources, binding))
        .collect()
}
