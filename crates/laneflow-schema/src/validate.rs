//! Document shape validation.
//!
//! Validation runs on load and again before every save. Structural problems
//! (duplicate ids, edges pointing at nothing, non-finite coordinates) are
//! fatal and abort the save with a field-path list. Dangling catalog/lane
//! references are collected as non-fatal warnings: they may transiently
//! exist during editing and the presentation layer substitutes a fallback,
//! but they must be flagged, never silently dropped.

use std::collections::HashSet;
use std::fmt;

use log::debug;

use crate::error::{SchemaError, Violation};
use crate::schema::{Document, EdgeDef, NodeLayout, ProcessGraph};

/// What a dangling reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Role,
    KpiDefinition,
    DataSource,
    Lane,
    Band,
    ProcessGraph,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefKind::Role => "role",
            RefKind::KpiDefinition => "kpi definition",
            RefKind::DataSource => "data source",
            RefKind::Lane => "lane",
            RefKind::Band => "band",
            RefKind::ProcessGraph => "process graph",
        };
        f.write_str(name)
    }
}

/// A non-fatal reference to a missing catalog/lane/band/graph id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub path: String,
    pub referenced_id: String,
    pub kind: RefKind,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: references missing {} `{}`",
            self.path, self.kind, self.referenced_id
        )
    }
}

/// Result of a successful validation pass: the document is structurally
/// sound, possibly with dangling references to be surfaced to the user.
#[derive(Debug, Default)]
pub struct ValidationReport {
    warnings: Vec<DanglingReference>,
}

impl ValidationReport {
    pub fn warnings(&self) -> &[DanglingReference] {
        &self.warnings
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Validates a document's shape.
///
/// # Errors
///
/// Returns [`SchemaError::Validation`] with one [`Violation`] per structural
/// problem. Dangling references never cause an error; they are reported on
/// the [`ValidationReport`].
pub fn validate(doc: &Document) -> Result<ValidationReport, SchemaError> {
    let mut violations = Vec::new();
    let mut report = ValidationReport::default();

    if doc.version.is_empty() {
        violations.push(Violation::new("version", "must not be empty"));
    }
    if doc.meta.project_id.is_empty() {
        violations.push(Violation::new("meta.project_id", "must not be empty"));
    }

    check_unique(
        doc.resources.roles.iter().map(|r| r.id.as_str()),
        "resources.roles",
        &mut violations,
    );
    check_unique(
        doc.resources.kpi_definitions.iter().map(|k| k.id.as_str()),
        "resources.kpi_definitions",
        &mut violations,
    );
    check_unique(
        doc.resources.data_sources.iter().map(|d| d.id.as_str()),
        "resources.data_sources",
        &mut violations,
    );

    let role_ids: HashSet<&str> = doc.resources.roles.iter().map(|r| r.id.as_str()).collect();
    let kpi_ids: HashSet<&str> = doc
        .resources
        .kpi_definitions
        .iter()
        .map(|k| k.id.as_str())
        .collect();
    let source_ids: HashSet<&str> = doc
        .resources
        .data_sources
        .iter()
        .map(|d| d.id.as_str())
        .collect();

    for (graph_id, graph) in &doc.process_graphs {
        let prefix = format!("process_graphs.{graph_id}");
        validate_process_graph(
            graph,
            &prefix,
            &role_ids,
            &kpi_ids,
            &source_ids,
            &mut violations,
            &mut report.warnings,
        );
    }

    if let Some(org) = &doc.org_graph {
        validate_org_graph(doc, org, &mut violations, &mut report.warnings);
    }

    if !violations.is_empty() {
        return Err(SchemaError::validation(violations));
    }

    debug!(warnings = report.warnings.len(); "Document validated");
    Ok(report)
}

fn validate_process_graph(
    graph: &ProcessGraph,
    prefix: &str,
    role_ids: &HashSet<&str>,
    kpi_ids: &HashSet<&str>,
    source_ids: &HashSet<&str>,
    violations: &mut Vec<Violation>,
    warnings: &mut Vec<DanglingReference>,
) {
    check_unique(
        graph.lanes.iter().map(|l| l.id.as_str()),
        &format!("{prefix}.lanes"),
        violations,
    );
    check_unique(
        graph.nodes.iter().map(|n| n.id.as_str()),
        &format!("{prefix}.nodes"),
        violations,
    );
    check_unique(
        graph.edges.iter().map(|e| e.id.as_str()),
        &format!("{prefix}.edges"),
        violations,
    );

    let lane_ids: HashSet<&str> = graph.lanes.iter().map(|l| l.id.as_str()).collect();

    for (idx, lane) in graph.lanes.iter().enumerate() {
        let path = format!("{prefix}.lanes[{idx}]");
        if !lane.layout.y.is_finite()
            || !lane.layout.h.is_finite()
            || !lane.layout.w.is_none_or(f32::is_finite)
        {
            violations.push(Violation::new(
                format!("{path}.layout"),
                "coordinates must be finite",
            ));
        } else if lane.layout.h < 0.0 {
            violations.push(Violation::new(
                format!("{path}.layout.h"),
                "must be non-negative",
            ));
        }
        if let Some(role_ref) = &lane.role_ref {
            if !role_ids.contains(role_ref.as_str()) {
                warnings.push(DanglingReference {
                    path: format!("{path}.role_ref"),
                    referenced_id: role_ref.clone(),
                    kind: RefKind::Role,
                });
            }
        }
    }

    for (idx, node) in graph.nodes.iter().enumerate() {
        let path = format!("{prefix}.nodes[{idx}]");
        check_layout_finite(&node.layout, &path, violations);

        if let Some(lane_id) = &node.lane_id {
            if !lane_ids.contains(lane_id.as_str()) {
                warnings.push(DanglingReference {
                    path: format!("{path}.lane_id"),
                    referenced_id: lane_id.clone(),
                    kind: RefKind::Lane,
                });
            }
        }

        if let Some(binding) = &node.runtime_binding {
            if let Some(source_ref) = &binding.source_ref {
                if !source_ids.contains(source_ref.as_str()) {
                    warnings.push(DanglingReference {
                        path: format!("{path}.runtime_binding.source_ref"),
                        referenced_id: source_ref.clone(),
                        kind: RefKind::DataSource,
                    });
                }
            }
            for (midx, metric) in binding.metrics.iter().enumerate() {
                if !kpi_ids.contains(metric.definition_id.as_str()) {
                    warnings.push(DanglingReference {
                        path: format!("{path}.runtime_binding.metrics[{midx}].definition_id"),
                        referenced_id: metric.definition_id.clone(),
                        kind: RefKind::KpiDefinition,
                    });
                }
            }
        }
    }

    let node_ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    check_edges(&graph.edges, &node_ids, prefix, violations);
}

fn validate_org_graph(
    doc: &Document,
    org: &crate::schema::OrgGraph,
    violations: &mut Vec<Violation>,
    warnings: &mut Vec<DanglingReference>,
) {
    check_unique(
        org.nodes.iter().map(|n| n.id.as_str()),
        "org_graph.nodes",
        violations,
    );
    check_unique(
        org.edges.iter().map(|e| e.id.as_str()),
        "org_graph.edges",
        violations,
    );

    const BAND_IDS: [&str; 5] = [
        "layer-customer",
        "layer-management",
        "layer-core",
        "layer-support",
        "layer-supplier",
    ];

    for (idx, node) in org.nodes.iter().enumerate() {
        let path = format!("org_graph.nodes[{idx}]");
        check_layout_finite(&node.layout, &path, violations);

        // layer_id is re-inferred on save, so a stale one is only a warning
        if !BAND_IDS.contains(&node.layer_id.as_str()) {
            warnings.push(DanglingReference {
                path: format!("{path}.layer_id"),
                referenced_id: node.layer_id.clone(),
                kind: RefKind::Band,
            });
        }

        if let Some(drill) = &node.drill_down_ref {
            if !doc.process_graphs.contains_key(drill) {
                warnings.push(DanglingReference {
                    path: format!("{path}.drill_down_ref"),
                    referenced_id: drill.clone(),
                    kind: RefKind::ProcessGraph,
                });
            }
        }
    }

    let node_ids: HashSet<&str> = org.nodes.iter().map(|n| n.id.as_str()).collect();
    check_edges(&org.edges, &node_ids, "org_graph", violations);
}

fn check_layout_finite(layout: &NodeLayout, path: &str, violations: &mut Vec<Violation>) {
    let finite = layout.x.is_finite()
        && layout.y.is_finite()
        && layout.w.is_none_or(f32::is_finite)
        && layout.h.is_none_or(f32::is_finite);
    if !finite {
        violations.push(Violation::new(
            format!("{path}.layout"),
            "coordinates must be finite",
        ));
    }
}

fn check_edges(
    edges: &[EdgeDef],
    node_ids: &HashSet<&str>,
    prefix: &str,
    violations: &mut Vec<Violation>,
) {
    for (idx, edge) in edges.iter().enumerate() {
        for (field, endpoint) in [("source", &edge.source), ("target", &edge.target)] {
            if !node_ids.contains(endpoint.as_str()) {
                violations.push(Violation::new(
                    format!("{prefix}.edges[{idx}].{field}"),
                    format!("references unknown node `{endpoint}`"),
                ));
            }
        }
    }
}

fn check_unique<'a>(
    ids: impl Iterator<Item = &'a str>,
    prefix: &str,
    violations: &mut Vec<Violation>,
) {
    let mut seen = HashSet::new();
    for (idx, id) in ids.enumerate() {
        if id.is_empty() {
            violations.push(Violation::new(
                format!("{prefix}[{idx}].id"),
                "must not be empty",
            ));
        } else if !seen.insert(id) {
            violations.push(Violation::new(
                format!("{prefix}[{idx}].id"),
                format!("duplicate id `{id}`"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::*;

    use super::*;

    fn base_document() -> Document {
        let mut doc = Document::new("p1", "Order Flow");
        doc.resources.roles.push(Role {
            id: "role_1".into(),
            name: "Sales".into(),
            description: None,
        });
        doc.resources.kpi_definitions.push(KpiDefinition {
            id: "kpi_1".into(),
            name: "合格率".into(),
            unit: "%".into(),
            thresholds: None,
        });

        let graph = ProcessGraph {
            meta: None,
            lanes: vec![LaneDef {
                id: "lane_a".into(),
                role_ref: Some("role_1".into()),
                name: "Sales".into(),
                layout: LaneLayout {
                    y: 100.0,
                    h: 220.0,
                    w: Some(1200.0),
                },
            }],
            nodes: vec![NodeDef {
                id: "n1".into(),
                kind: NodeKind::Activity,
                name: "Approve".into(),
                lane_id: Some("lane_a".into()),
                layout: NodeLayout {
                    x: 50.0,
                    y: 20.0,
                    w: Some(160.0),
                    h: Some(60.0),
                    z_index: None,
                },
                runtime_binding: None,
            }],
            edges: vec![],
        };
        doc.process_graphs.insert("pg_main".into(), graph);
        doc
    }

    #[test]
    fn test_well_formed_document_is_clean() {
        let report = validate(&base_document()).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_duplicate_node_id_is_fatal() {
        let mut doc = base_document();
        let graph = doc.process_graphs.get_mut("pg_main").unwrap();
        let mut dup = graph.nodes[0].clone();
        dup.lane_id = None;
        graph.nodes.push(dup);

        let err = validate(&doc).unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path(), "process_graphs.pg_main.nodes[1].id");
    }

    #[test]
    fn test_edge_to_unknown_node_is_fatal() {
        let mut doc = base_document();
        let graph = doc.process_graphs.get_mut("pg_main").unwrap();
        graph.edges.push(EdgeDef {
            id: "e1".into(),
            source: "n1".into(),
            target: "ghost".into(),
            source_handle: None,
            target_handle: None,
            label: None,
            kind: None,
        });

        let err = validate(&doc).unwrap_err();
        assert!(err.to_string().contains("unknown node `ghost`"));
    }

    #[test]
    fn test_nan_coordinate_is_fatal() {
        let mut doc = base_document();
        let graph = doc.process_graphs.get_mut("pg_main").unwrap();
        graph.nodes[0].layout.x = f32::NAN;

        let err = validate(&doc).unwrap_err();
        assert!(err.violations()[0].path().ends_with(".layout"));
    }

    #[test]
    fn test_non_finite_lane_width_is_fatal() {
        let mut doc = base_document();
        let graph = doc.process_graphs.get_mut("pg_main").unwrap();
        graph.lanes[0].layout.w = Some(f32::INFINITY);

        let err = validate(&doc).unwrap_err();
        assert_eq!(
            err.violations()[0].path(),
            "process_graphs.pg_main.lanes[0].layout"
        );
    }

    #[test]
    fn test_dangling_lane_and_kpi_refs_are_warnings() {
        let mut doc = base_document();
        let graph = doc.process_graphs.get_mut("pg_main").unwrap();
        graph.nodes[0].lane_id = Some("lane_missing".into());
        graph.nodes[0].runtime_binding = Some(RuntimeBinding {
            source_ref: None,
            external_id: None,
            metrics: vec![MetricBinding {
                id: "m1".into(),
                definition_id: "kpi_missing".into(),
                target: None,
                unit: None,
                thresholds: None,
            }],
        });

        let report = validate(&doc).unwrap();
        assert_eq!(report.warnings().len(), 2);
        assert_eq!(report.warnings()[0].kind, RefKind::Lane);
        assert_eq!(report.warnings()[1].kind, RefKind::KpiDefinition);
        assert_eq!(report.warnings()[1].referenced_id, "kpi_missing");
    }

    #[test]
    fn test_org_graph_stale_layer_is_warning() {
        let mut doc = base_document();
        doc.org_graph = Some(OrgGraph {
            layers: vec![],
            nodes: vec![OrgNode {
                id: "o1".into(),
                kind: OrgNodeKind::ProcessNode,
                layer_id: "layer-retired".into(),
                name: "Fulfilment".into(),
                drill_down_ref: Some("pg_main".into()),
                layout: NodeLayout::default(),
            }],
            edges: vec![],
        });

        let report = validate(&doc).unwrap();
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.warnings()[0].kind, RefKind::Band);
    }
}
