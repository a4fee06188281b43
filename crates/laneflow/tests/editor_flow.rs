//! End-to-end tests for the editing flow: open a document, pan/zoom, drag
//! nodes between lanes, merge telemetry, and save through the store.

use float_cmp::assert_approx_eq;

use laneflow::core::drag::DragOutcome;
use laneflow::core::drag::ClickSink;
use laneflow::core::geometry::{Point, Size};
use laneflow::core::lane::LaneConfig;
use laneflow::schema::legacy::{AnyDocument, UPGRADED_GRAPH_ID};
use laneflow::schema::schema::{
    Document, KpiDefinition, LaneDef, LaneLayout, MetricBinding, NodeDef, NodeKind, NodeLayout,
    ProcessGraph, RuntimeBinding,
};
use laneflow::telemetry::{StatsPatch, TelemetryFeed, TelemetryMessage};
use laneflow::transform::process;
use laneflow::{DocumentStore, EditorSession, MemoryStore, enrich};

/// Two lanes: lane_a spans [100, 320), lane_b spans [400, 620). One node in
/// lane_a at relative (50, 50), so world (150, 150).
fn document() -> Document {
    let mut doc = Document::new("p1", "Order Flow");
    doc.resources.kpi_definitions.push(KpiDefinition {
        id: "kpi_1".into(),
        name: "合格率".into(),
        unit: "%".into(),
        thresholds: None,
    });

    doc.process_graphs.insert(
        "pg_main".into(),
        ProcessGraph {
            meta: None,
            lanes: vec![
                LaneDef {
                    id: "lane_a".into(),
                    role_ref: None,
                    name: "Sales".into(),
                    layout: LaneLayout {
                        y: 100.0,
                        h: 220.0,
                        w: Some(1200.0),
                    },
                },
                LaneDef {
                    id: "lane_b".into(),
                    role_ref: None,
                    name: "Ops".into(),
                    layout: LaneLayout {
                        y: 400.0,
                        h: 220.0,
                        w: Some(1200.0),
                    },
                },
            ],
            nodes: vec![NodeDef {
                id: "n1".into(),
                kind: NodeKind::Activity,
                name: "Approve".into(),
                lane_id: Some("lane_a".into()),
                layout: NodeLayout {
                    x: 50.0,
                    y: 50.0,
                    w: Some(160.0),
                    h: Some(60.0),
                    z_index: None,
                },
                runtime_binding: Some(RuntimeBinding {
                    source_ref: None,
                    external_id: None,
                    metrics: vec![MetricBinding {
                        id: "m1".into(),
                        definition_id: "kpi_1".into(),
                        target: Some("95".into()),
                        unit: None,
                        thresholds: None,
                    }],
                }),
            }],
            edges: vec![],
        },
    );
    doc
}

fn open_session() -> EditorSession {
    EditorSession::open(
        document(),
        "pg_main",
        LaneConfig::default(),
        Size::new(1600.0, 900.0),
    )
    .expect("session should open")
}

#[derive(Default)]
struct RecordingSink(Vec<String>);

impl ClickSink for RecordingSink {
    fn forward_click(&mut self, node_id: &str) {
        self.0.push(node_id.to_owned());
    }
}

#[test]
fn lane_relative_position_deserializes_to_world() {
    let session = open_session();
    let node = session.visual().node("n1").unwrap();
    assert_approx_eq!(f32, node.position.x(), 150.0);
    assert_approx_eq!(f32, node.position.y(), 150.0);
}

#[test]
fn drag_across_lanes_reassigns_membership() {
    let mut session = open_session();

    // Grab the node near its corner and pull it down into lane_b
    session
        .begin_drag("n1", Point::new(160.0, 160.0), false)
        .unwrap();
    session.drag_move(Point::new(160.0, 510.0));
    let outcome = session.end_drag(Point::new(160.0, 510.0)).unwrap();
    assert!(matches!(outcome, DragOutcome::Commit(_)));

    let node = &session.document().process_graphs["pg_main"].nodes[0];
    assert_eq!(node.lane_id.as_deref(), Some("lane_b"));
    // Final world (150, 500) relative to lane_b's origin (100, 400)
    assert_approx_eq!(f32, node.layout.x, 50.0);
    assert_approx_eq!(f32, node.layout.y, 100.0);

    // The re-derived visual graph agrees
    let visual = session.visual().node("n1").unwrap();
    assert_approx_eq!(f32, visual.position.y(), 500.0);
}

#[test]
fn drag_commits_correctly_under_zoom() {
    let mut session = open_session();
    // Scale 2x anchored at the origin: world = screen / 2
    session.viewport_mut().zoom_at(2.0, Point::new(0.0, 0.0));

    session
        .begin_drag("n1", Point::new(300.0, 300.0), false)
        .unwrap();
    // 700 screen pixels of travel is 350 world units at this zoom
    session.drag_move(Point::new(300.0, 1000.0));
    let outcome = session.end_drag(Point::new(300.0, 1000.0)).unwrap();
    assert!(matches!(outcome, DragOutcome::Commit(_)));

    let node = &session.document().process_graphs["pg_main"].nodes[0];
    assert_eq!(node.lane_id.as_deref(), Some("lane_b"));
    assert_approx_eq!(f32, node.layout.y, 100.0);
}

#[test]
fn sub_threshold_gesture_is_a_click_and_never_mutates() {
    let mut session = open_session();
    let before = session.document().clone();

    session
        .begin_drag("n1", Point::new(160.0, 160.0), false)
        .unwrap();
    // ~6px of travel: optimistic visual move only
    session.drag_move(Point::new(165.0, 163.0));
    let outcome = session.end_drag(Point::new(165.0, 163.0)).unwrap();

    assert_eq!(
        outcome,
        DragOutcome::Click {
            node_id: "n1".into()
        }
    );
    assert_eq!(session.document(), &before);

    // Visual delta discarded: the node is back at its committed position
    let node = session.visual().node("n1").unwrap();
    assert_approx_eq!(f32, node.position.y(), 150.0);

    // And the click reaches the alternate handler
    let mut sink = RecordingSink::default();
    outcome.hand_off(&mut sink);
    assert_eq!(sink.0, vec!["n1".to_owned()]);
}

#[test]
fn cancelled_drag_snaps_back() {
    let mut session = open_session();

    session
        .begin_drag("n1", Point::new(160.0, 160.0), false)
        .unwrap();
    session.drag_move(Point::new(160.0, 510.0));
    assert!(session.is_dragging());

    let outcome = session.cancel_drag();
    assert_eq!(
        outcome,
        DragOutcome::Reverted {
            node_id: "n1".into()
        }
    );

    let node = session.visual().node("n1").unwrap();
    assert_approx_eq!(f32, node.position.y(), 150.0);
    assert_eq!(
        session.document().process_graphs["pg_main"].nodes[0]
            .lane_id
            .as_deref(),
        Some("lane_a")
    );
}

#[test]
fn pan_modifier_blocks_dragging() {
    let mut session = open_session();
    let err = session
        .begin_drag("n1", Point::new(160.0, 160.0), true)
        .unwrap_err();
    assert!(matches!(
        err,
        laneflow::LaneflowError::Gesture(
            laneflow::core::GestureError::PanModifierEngaged
        )
    ));
}

#[test]
fn save_roundtrip_reproduces_document() {
    let mut session = open_session();
    let mut store = MemoryStore::new();

    session.save_to(&mut store).unwrap();
    let saved = store.load("p1").unwrap();

    let original = document();
    assert_eq!(
        saved.process_graphs["pg_main"].lanes,
        original.process_graphs["pg_main"].lanes
    );
    assert_eq!(
        saved.process_graphs["pg_main"].nodes,
        original.process_graphs["pg_main"].nodes
    );
    assert_eq!(
        saved.process_graphs["pg_main"].edges,
        original.process_graphs["pg_main"].edges
    );
}

#[test]
fn metric_enrichment_follows_catalog_edits() {
    let mut session = open_session();
    let resolved = enrich::resolve_all(
        &session.document().resources,
        session.visual().node("n1").unwrap(),
    );
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].name, "合格率");
    assert_eq!(resolved[0].unit, "%");
    assert_eq!(resolved[0].target.as_deref(), Some("95"));

    // Editing the catalog changes every referencing node's display without
    // touching the stored binding
    let mut resources = session.document().resources.clone();
    resources.kpi_definitions[0].unit = "pct".into();
    let updated = enrich::resolve_all(&resources, session.visual().node("n1").unwrap());
    assert_eq!(updated[0].unit, "pct");

    session.refresh();
    let node = &session.document().process_graphs["pg_main"].nodes[0];
    let binding = node.runtime_binding.as_ref().unwrap();
    assert_eq!(binding.metrics[0].unit, None);
}

#[test]
fn telemetry_for_removed_node_is_dropped() {
    let doc = document();
    let view = process::to_visual(
        &doc.process_graphs["pg_main"],
        &doc.resources,
        LaneConfig::default(),
    );
    let mut visual = view.visual;
    let feed = TelemetryFeed::new("p1");

    // The node exists: stats merge in
    let message = TelemetryMessage {
        node_id: "n1".into(),
        stats: StatsPatch {
            active_count: Some(2),
            avg_wait_time: None,
            status: Some("normal".into()),
        },
    };
    assert!(feed.apply(&mut visual, &message));

    // A concurrent edit removes the node; the next update is dropped
    visual.remove_node("n1");
    assert!(!feed.apply(&mut visual, &message));
    assert_eq!(visual.node_count(), 2);
}

#[test]
fn legacy_document_upgrades_and_opens() {
    let legacy = r#"{
        "nodes": [
            {
                "id": "lane_a", "type": "lane",
                "position": { "x": 0.0, "y": 100.0 },
                "data": { "label": "Sales" },
                "width": 1200.0, "height": 220.0
            },
            {
                "id": "n1", "type": "activity",
                "position": { "x": 200.0, "y": 150.0 },
                "data": { "label": "Approve" },
                "width": 160.0, "height": 60.0
            }
        ],
        "edges": []
    }"#;

    let doc = AnyDocument::from_json_str(legacy)
        .unwrap()
        .upgrade("p1", "Order Flow");

    let session = EditorSession::open(
        doc,
        UPGRADED_GRAPH_ID,
        LaneConfig::default(),
        Size::new(1600.0, 900.0),
    )
    .unwrap();

    // The node was rebased onto the legacy lane's origin (0, 100); on load
    // it resolves against the standard lane left edge instead
    let node = session.visual().node("n1").unwrap();
    assert_eq!(node.lane_id.as_deref(), Some("lane_a"));
    assert_approx_eq!(f32, node.position.x(), 300.0);
    assert_approx_eq!(f32, node.position.y(), 150.0);
}
