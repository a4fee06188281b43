use std::fs;

use log::LevelFilter;
use tempfile::tempdir;

use laneflow_cli::{Args, CliError, run};

use laneflow_schema::legacy::UPGRADED_GRAPH_ID;
use laneflow_schema::schema::Document;

fn args(input: &str, output: &str) -> Args {
    Args {
        input: input.to_owned(),
        output: output.to_owned(),
        config: None,
        project_id: None,
        name: None,
        log_level: LevelFilter::Warn,
    }
}

const TIERED_DOC: &str = r#"{
    "version": "1.0.0",
    "meta": { "project_id": "p1", "name": "Order Flow" },
    "process_graphs": {
        "pg_main": {
            "lanes": [{
                "id": "lane_a", "name": "Sales",
                "layout": { "y": 100.0, "h": 220.0, "w": 1200.0 }
            }],
            "nodes": [{
                "id": "n1", "type": "activity", "name": "Approve",
                "layout": { "x": 150.0, "y": 150.0, "w": 160.0, "h": 60.0 }
            }],
            "edges": []
        }
    }
}"#;

#[test]
fn e2e_normalizes_tiered_document() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("flow.json");
    let output = temp_dir.path().join("out.json");
    fs::write(&input, TIERED_DOC).unwrap();

    run(&args(
        input.to_str().unwrap(),
        output.to_str().unwrap(),
    ))
    .expect("normalization should succeed");

    let written = fs::read_to_string(&output).unwrap();
    let doc: Document = serde_json::from_str(&written).unwrap();

    // n1 carried no lane reference but sits inside lane_a geometrically;
    // normalization heals the membership and stores relative coordinates
    let node = &doc.process_graphs["pg_main"].nodes[0];
    assert_eq!(node.lane_id.as_deref(), Some("lane_a"));
    assert_eq!(node.layout.x, 50.0);
    assert_eq!(node.layout.y, 50.0);
}

#[test]
fn e2e_upgrades_legacy_document() {
    let legacy = r#"{
        "nodes": [
            {
                "id": "lane_a", "type": "lane",
                "position": { "x": 0.0, "y": 100.0 },
                "data": { "label": "Sales" },
                "width": 1200.0, "height": 220.0
            },
            {
                "id": "n1", "type": "startEvent",
                "position": { "x": 60.0, "y": 140.0 },
                "data": { "label": "Order In", "laneId": "lane_a" },
                "width": 40.0, "height": 40.0
            }
        ],
        "edges": []
    }"#;

    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("old-flow.json");
    let output = temp_dir.path().join("out.json");
    fs::write(&input, legacy).unwrap();

    run(&args(
        input.to_str().unwrap(),
        output.to_str().unwrap(),
    ))
    .expect("upgrade should succeed");

    let written = fs::read_to_string(&output).unwrap();
    let doc: Document = serde_json::from_str(&written).unwrap();

    // Project identity falls back to the input file stem
    assert_eq!(doc.meta.project_id, "old-flow");
    let graph = &doc.process_graphs[UPGRADED_GRAPH_ID];
    assert_eq!(graph.lanes.len(), 1);
    assert_eq!(graph.nodes[0].lane_id.as_deref(), Some("lane_a"));
}

#[test]
fn e2e_invalid_document_is_refused() {
    let broken = r#"{
        "meta": { "project_id": "p1", "name": "Order Flow" },
        "process_graphs": {
            "pg_main": {
                "nodes": [
                    { "id": "n1", "type": "activity", "name": "A", "layout": { "x": 0.0, "y": 0.0 } },
                    { "id": "n1", "type": "activity", "name": "B", "layout": { "x": 0.0, "y": 0.0 } }
                ]
            }
        }
    }"#;

    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("broken.json");
    let output = temp_dir.path().join("out.json");
    fs::write(&input, broken).unwrap();

    let err = run(&args(
        input.to_str().unwrap(),
        output.to_str().unwrap(),
    ))
    .unwrap_err();
    assert!(matches!(err, CliError::Schema(_)));

    // Nothing is written for an invalid document
    assert!(!output.exists());
}

#[test]
fn e2e_layout_config_is_honored() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("flow.json");
    let output = temp_dir.path().join("out.json");
    let config = temp_dir.path().join("laneflow.toml");
    fs::write(&input, TIERED_DOC).unwrap();
    fs::write(&config, "[layout]\nlane_start_x = 0.0\n").unwrap();

    let mut cli_args = args(input.to_str().unwrap(), output.to_str().unwrap());
    cli_args.config = Some(config.to_str().unwrap().to_owned());
    run(&cli_args).expect("normalization should succeed");

    let written = fs::read_to_string(&output).unwrap();
    let doc: Document = serde_json::from_str(&written).unwrap();

    // With the lane left edge at x = 0, the node's relative x is its world x
    let node = &doc.process_graphs["pg_main"].nodes[0];
    assert_eq!(node.layout.x, 150.0);
}
