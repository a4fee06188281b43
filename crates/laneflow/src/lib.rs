//! Laneflow: An Engine for Swimlane Business-Process Diagrams
//!
//! Laneflow turns persisted process documents into live, editable visual
//! graphs and back. It provides:
//!
//! - **Transformation**: bidirectional document ↔ visual-graph conversion
//!   for the process and organizational tiers ([`transform`])
//! - **Sessions**: viewport, lane set, and drag-commit protocol wired over
//!   one process graph ([`session`])
//! - **Telemetry**: live runtime-stats merge into the visual graph
//!   ([`telemetry`])
//! - **Enrichment**: presentation-time metric resolution against the shared
//!   catalog ([`enrich`])
//! - **Persistence**: validated document storage behind an explicit trait
//!   ([`store`])
//!
//! The document is always the single source of truth: visual positions are
//! derived, optimistic drag positions live only in the visual graph, and
//! every write goes back through the transformer and the validating store.
//!
//! # Example
//!
//! ```
//! use laneflow::EditorSession;
//! use laneflow::core::geometry::{Point, Size};
//! use laneflow::core::lane::LaneConfig;
//! use laneflow::schema::schema::Document;
//! use laneflow_schema::schema::{LaneDef, LaneLayout, ProcessGraph};
//!
//! let mut doc = Document::new("p1", "Order Flow");
//! doc.process_graphs.insert("pg_main".into(), ProcessGraph {
//!     lanes: vec![LaneDef {
//!         id: "lane_a".into(),
//!         role_ref: None,
//!         name: "Sales".into(),
//!         layout: LaneLayout { y: 100.0, h: 220.0, w: None },
//!     }],
//!     ..ProcessGraph::default()
//! });
//!
//! let mut session = EditorSession::open(
//!     doc,
//!     "pg_main",
//!     LaneConfig::default(),
//!     Size::new(1600.0, 900.0),
//! ).unwrap();
//! session.viewport_mut().zoom_at(1.5, Point::new(800.0, 450.0));
//! assert!(session.lanes().get("lane_a").is_some());
//! ```

pub mod enrich;
pub mod error;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod transform;
pub mod visual;

pub use error::LaneflowError;
pub use session::EditorSession;
pub use store::{DocumentStore, MemoryStore};
pub use telemetry::{TelemetryFeed, TelemetryMessage};
pub use visual::{RenderIndex, VisualGraph, VisualNode};

pub use laneflow_core as core;
pub use laneflow_schema as schema;
