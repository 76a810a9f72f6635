//! End-to-end conversion tests over the fixtures in `tests/fixtures`

use kicadcj::circuit_json::{
    AnchorSide, ComponentType, FacingDirection, LayerRef, PlatedHoleShape, Point, SmtPadShape,
};
use kicadcj::prelude::*;
use std::path::PathBuf;

const EPS: f64 = 1e-6;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn convert(names: &[&str]) -> KicadToCircuitJsonConverter {
    let paths: Vec<PathBuf> = names.iter().map(|n| fixture_path(n)).collect();
    convert_files(&paths, ConversionOptions::default()).expect("conversion should succeed")
}

fn assert_point(actual: Point, x: f64, y: f64) {
    assert!(
        (actual.x - x).abs() < EPS && (actual.y - y).abs() < EPS,
        "expected ({}, {}), got ({}, {})",
        x,
        y,
        actual.x,
        actual.y
    );
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_board_stats_and_warnings() {
    let converter = convert(&["simple_board.kicad_pcb"]);
    let stats = converter.stats();

    assert_eq!(stats.components, 3);
    assert_eq!(stats.pads, 6, "SMD and plated pads only");
    assert_eq!(stats.vias, 2);
    assert_eq!(stats.traces, 4);
    assert_eq!(stats.labels, 0);

    let warnings = converter.warnings();
    assert_eq!(warnings.len(), 2, "warnings: {:?}", warnings);
    assert!(warnings[0].contains("TestPoint"));
    assert!(warnings[1].contains("v3"));
}

#[test]
fn test_board_outline() {
    let converter = convert(&["simple_board.kicad_pcb"]);
    let boards = converter.db().pcb_board.list();

    assert_eq!(boards.len(), 1);
    let board = &boards[0];
    assert_point(board.center, 0., 0.);
    assert_close(board.width, 40.);
    assert_close(board.height, 30.);
    assert_close(board.thickness, 1.2);
    assert_eq!(board.outline.len(), 4);
    for p in &board.outline {
        assert_close(p.x.abs(), 20.);
        assert_close(p.y.abs(), 15.);
    }
}

#[test]
fn test_source_components_deduplicated() {
    let converter = convert(&["simple_board.kicad_pcb"]);
    let db = converter.db();
    let sources = db.source_component.list();

    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].name, "Resistor_SMD:R_0603_1608Metric");
    assert_eq!(sources[0].ftype, ComponentType::Resistor);
    assert_eq!(sources[0].manufacturer_part_number.as_deref(), Some("10k"));
    assert_eq!(sources[1].ftype, ComponentType::Chip);

    let components = db.pcb_component.list();
    assert_eq!(components.len(), 3);
    assert_eq!(components[0].source_component_id, components[1].source_component_id);
    assert_ne!(components[0].source_component_id, components[2].source_component_id);
}

#[test]
fn test_components_placed_in_board_space() {
    let converter = convert(&["simple_board.kicad_pcb"]);
    let components = converter.db().pcb_component.list();

    let r1 = &components[0];
    assert_point(r1.center, -10., 5.);
    assert_eq!(r1.layer, LayerRef::Top);
    assert_close(r1.width, 2.5);
    assert_close(r1.height, 0.95);

    let r2 = &components[1];
    assert_point(r2.center, -10., -5.);
    assert_eq!(r2.layer, LayerRef::Bottom);
    assert_close(r2.rotation, 180.);

    // Quarter turn swaps the pad extents
    let j1 = &components[2];
    assert_point(j1.center, 10., -5.);
    assert_close(j1.width, 10.14);
    assert_close(j1.height, 3.2);
}

#[test]
fn test_smt_pads() {
    let converter = convert(&["simple_board.kicad_pcb"]);
    let db = converter.db();
    let pads = db.pcb_smtpad.list();
    let components = db.pcb_component.list();

    assert_eq!(pads.len(), 4);
    assert_eq!(pads[0].pcb_component_id, components[0].pcb_component_id);
    assert_close(pads[0].x, -10.8);
    assert_close(pads[0].y, 5.);
    assert_eq!(pads[0].shape, SmtPadShape::Rect);
    assert_eq!(pads[0].port_hints, vec!["1".to_string()]);
    assert_eq!(pads[0].layer, LayerRef::Top);

    // R2 is rotated 180 degrees on the back
    assert_eq!(pads[2].pcb_component_id, components[1].pcb_component_id);
    assert_close(pads[2].x, -9.2);
    assert_close(pads[2].y, -5.);
    assert_eq!(pads[2].layer, LayerRef::Bottom);
}

#[test]
fn test_plated_and_bare_holes() {
    let converter = convert(&["simple_board.kicad_pcb"]);
    let db = converter.db();
    let j1_id = &db.pcb_component.list()[2].pcb_component_id;

    let plated = db.pcb_plated_hole.list();
    assert_eq!(plated.len(), 2);
    assert!(plated.iter().all(|h| &h.pcb_component_id == j1_id));
    assert_eq!(plated[0].layers, vec![LayerRef::Top, LayerRef::Bottom]);
    assert_eq!(
        plated[0].shape,
        PlatedHoleShape::CircularHoleWithRectPad {
            hole_diameter: 1.0,
            rect_pad_width: 1.7,
            rect_pad_height: 1.7,
        }
    );

    // Oval pad on a footprint turned 90 degrees: outer and hole dimensions swap
    assert_close(plated[1].x, 12.54);
    assert_close(plated[1].y, -5.);
    assert_eq!(
        plated[1].shape,
        PlatedHoleShape::Pill {
            hole_width: 1.2,
            hole_height: 0.6,
            outer_width: 2.0,
            outer_height: 1.2,
        }
    );

    let holes = db.pcb_hole.list();
    assert_eq!(holes.len(), 1);
    assert_close(holes[0].hole_diameter, 3.2);
    assert_close(holes[0].x, 5.);
    assert_close(holes[0].y, -5.);
}

#[test]
fn test_traces_grouped_by_net_and_layer() {
    let converter = convert(&["simple_board.kicad_pcb"]);
    let traces = converter.db().pcb_trace.list();

    assert_eq!(traces.len(), 4);

    let names: Vec<&str> = traces.iter().map(|t| t.net_name.as_str()).collect();
    assert_eq!(names, vec!["GND", "GND", "Net-7", "Net-2"]);

    let first = &traces[0];
    assert_eq!(first.route.len(), 3);
    assert_close(first.route[0].x, -15.);
    assert_close(first.route[2].x, -5.);
    assert_close(first.route[0].y, 10.);
    assert_close(first.route[0].width, 0.25);
    assert!(first.route.iter().all(|p| p.layer == LayerRef::Top));

    assert_eq!(traces[1].route[0].layer, LayerRef::Bottom);
    assert_eq!(traces[2].route[0].layer, LayerRef::Inner(1));
}

#[test]
fn test_vias() {
    let converter = convert(&["simple_board.kicad_pcb"]);
    let vias = converter.db().pcb_via.list();

    assert_eq!(vias.len(), 2);
    assert_close(vias[0].outer_diameter, 0.6);
    assert_close(vias[0].hole_diameter, 0.3);
    assert_eq!(vias[0].net_name, "GND");

    // Missing size and drill fall back, the span collapses to its ends
    let blind = &vias[1];
    assert_point(Point::new(blind.x, blind.y), 0., 0.);
    assert_close(blind.outer_diameter, 0.8);
    assert_close(blind.hole_diameter, 0.4);
    assert_eq!(blind.layers, vec![LayerRef::Top, LayerRef::Bottom]);
    assert_eq!(blind.net_name, "VCC");
}

#[test]
fn test_silkscreen() {
    let converter = convert(&["simple_board.kicad_pcb"]);
    let db = converter.db();
    let components = db.pcb_component.list();

    let texts: Vec<&str> = db
        .pcb_silkscreen_text
        .list()
        .iter()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(texts, vec!["R1", "R2", "J1", "REV A", "fab note"]);

    let r1_ref = &db.pcb_silkscreen_text.list()[0];
    assert_eq!(r1_ref.pcb_component_id, components[0].pcb_component_id);
    assert_point(r1_ref.anchor_position, -10., 6.5);
    assert_close(r1_ref.font_size, 1.5);
    assert_eq!(r1_ref.font, "tscircuit2024");

    let r2_ref = &db.pcb_silkscreen_text.list()[1];
    assert_eq!(r2_ref.layer, LayerRef::Bottom);
    assert_close(r2_ref.font_size, 1.2);

    let rev = &db.pcb_silkscreen_text.list()[3];
    assert!(rev.pcb_component_id.is_empty());
    assert_point(rev.anchor_position, 0., -13.);
    assert_close(rev.font_size, 1.8);

    let paths = db.pcb_silkscreen_path.list();
    assert_eq!(paths.len(), 3);
    assert_eq!(paths[0].pcb_component_id, components[0].pcb_component_id);
    assert_close(paths[0].stroke_width, 0.12);
    assert_eq!(paths[0].route.len(), 2);
    assert_point(paths[0].route[0], -11., 5.7);
    assert_point(paths[0].route[1], -9., 5.7);

    // Fab outlines are emitted alongside silkscreen
    assert_eq!(paths[1].pcb_component_id, components[0].pcb_component_id);
    assert_eq!(paths[1].layer, LayerRef::Top);
    assert_close(paths[1].stroke_width, 0.1);
    assert_point(paths[1].route[0], -11., 4.3);
    assert_point(paths[1].route[1], -9., 4.3);

    let circle = &paths[2];
    assert!(circle.pcb_component_id.is_empty());
    assert_close(circle.stroke_width, 0.2);
    assert!(circle.route.len() > 3);
    let first = circle.route[0];
    assert_point(circle.route[circle.route.len() - 1], first.x, first.y);
    assert_point(first, 16., -10.);
}

#[test]
fn test_schematic_conversion() {
    let converter = convert(&["simple_sheet.kicad_sch"]);
    let db = converter.db();
    let stats = converter.stats();

    assert_eq!(stats.components, 3);
    assert_eq!(stats.traces, 2, "junctions are not counted");
    assert_eq!(stats.labels, 3);
    assert_eq!(converter.warnings().len(), 1);
    assert!(converter.warnings()[0].contains("R9"));

    let sources = db.source_component.list();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].name, "Device:R");
    assert_eq!(sources[0].ftype, ComponentType::Resistor);
    assert_eq!(sources[1].ftype, ComponentType::Led);

    let components = db.schematic_component.list();
    assert_point(components[0].center, 0., 0.);
    assert_point(components[1].center, -1.9, 0.);
    assert_point(components[2].center, -48.5 / 15., 25. / 15.);
    assert_close(components[2].rotation, 90.);
    assert_close(components[0].size.width, 1.);
    assert_close(components[0].size.height, 1.);
}

#[test]
fn test_schematic_ports() {
    let converter = convert(&["simple_sheet.kicad_sch"]);
    let db = converter.db();
    let components = db.schematic_component.list();
    let ports = db.schematic_port.list();

    assert_eq!(ports.len(), 6);

    let r1_ports: Vec<_> = ports
        .iter()
        .filter(|p| p.schematic_component_id == components[0].schematic_component_id)
        .collect();
    assert_eq!(r1_ports.len(), 2);
    assert_point(r1_ports[0].center, 0., 0.254);
    assert_eq!(r1_ports[0].facing_direction, FacingDirection::Down);
    assert_eq!(r1_ports[0].pin_number.as_deref(), Some("1"));
    assert_eq!(r1_ports[1].facing_direction, FacingDirection::Up);

    // LED rotated a quarter turn
    let led_ports: Vec<_> = ports
        .iter()
        .filter(|p| p.schematic_component_id == components[2].schematic_component_id)
        .collect();
    assert_point(led_ports[0].center, 0., -0.254);
    assert_eq!(led_ports[0].facing_direction, FacingDirection::Up);
    assert_point(led_ports[1].center, 0., 0.254);
    assert_eq!(led_ports[1].facing_direction, FacingDirection::Down);
}

#[test]
fn test_schematic_wires_junctions_labels() {
    let converter = convert(&["simple_sheet.kicad_sch"]);
    let db = converter.db();
    let traces = db.schematic_trace.list();

    assert_eq!(traces.len(), 3);
    assert_eq!(traces[0].edges.len(), 2);
    assert_point(traces[0].edges[0].from, 0., 0.254);
    assert_point(traces[0].edges[0].to, 0., 1.);
    assert_point(traces[0].edges[1].to, 11.5 / 15., 1.);
    assert_eq!(traces[1].edges.len(), 1);

    let junction = &traces[2];
    assert!(junction.edges.is_empty());
    assert_eq!(junction.junctions.len(), 1);
    assert_point(junction.junctions[0], 0., 1.);

    let labels = db.schematic_net_label.list();
    assert_eq!(labels[0].text, "SDA");
    assert_point(labels[0].center, 11.5 / 15., 1.);
    assert_eq!(labels[0].anchor_side, AnchorSide::Left);
    assert_eq!(labels[1].anchor_side, AnchorSide::Bottom);
    assert_eq!(labels[2].anchor_side, AnchorSide::Right);
}

#[test]
fn test_combined_output_order() {
    let converter = convert(&["simple_board.kicad_pcb", "simple_sheet.kicad_sch"]);
    let json: serde_json::Value =
        serde_json::from_str(&converter.output_json(false).unwrap()).unwrap();
    let types: Vec<String> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap().to_string())
        .collect();

    let order = [
        "source_component",
        "schematic_component",
        "schematic_port",
        "schematic_trace",
        "schematic_net_label",
        "pcb_board",
        "pcb_component",
        "pcb_smtpad",
        "pcb_plated_hole",
        "pcb_hole",
        "pcb_via",
        "pcb_trace",
        "pcb_silkscreen_text",
        "pcb_silkscreen_path",
    ];
    let ranks: Vec<usize> = types
        .iter()
        .map(|t| order.iter().position(|o| *o == t.as_str()).expect("known type"))
        .collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    assert!(order.iter().all(|o| types.iter().any(|t| t.as_str() == *o)));

    // Board and schematic source components never share a key here
    assert_eq!(converter.db().source_component.len(), 4);
}

#[test]
fn test_output_is_deterministic() {
    let a = convert(&["simple_board.kicad_pcb", "simple_sheet.kicad_sch"]);
    let b = convert(&["simple_sheet.kicad_sch", "simple_board.kicad_pcb"]);
    assert_eq!(a.output_json(true).unwrap(), b.output_json(true).unwrap());
}

#[test]
fn test_missing_file_is_io_error() {
    let err = convert_files(&[fixture_path("nope.kicad_pcb")], ConversionOptions::default())
        .err()
        .expect("missing file should fail");
    assert!(err.is_io());
}

#[test]
fn test_unrelated_files_are_ignored() {
    let dir = tempfile::TempDir::new().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "not a kicad file").unwrap();

    let with_notes = convert_files(
        &[fixture_path("simple_board.kicad_pcb"), notes],
        ConversionOptions::default(),
    )
    .expect("conversion should succeed");
    let board_only = convert(&["simple_board.kicad_pcb"]);

    assert_eq!(with_notes.db().len(), board_only.db().len());
}

#[test]
fn test_finer_arc_resolution_adds_points() {
    let coarse = convert(&["simple_board.kicad_pcb"]);
    let fine = convert_files(
        &[fixture_path("simple_board.kicad_pcb")],
        ConversionOptions {
            arc_resolution: 0.05,
            ..Default::default()
        },
    )
    .unwrap();

    let circle_len = |c: &KicadToCircuitJsonConverter| c.db().pcb_silkscreen_path.list()[2].route.len();
    assert!(circle_len(&fine) > circle_len(&coarse));
}

fn convert_source(path: &str, contents: &str) -> KicadToCircuitJsonConverter {
    let mut converter = KicadToCircuitJsonConverter::new();
    converter.add_file(path, contents);
    converter
        .run_until_finished()
        .expect("conversion should succeed");
    converter
}

const DUPLICATE_FOOTPRINTS: &str = r#"(kicad_pcb (version 20221018) (generator pcbnew)
  (net 0 "")
  (footprint "Resistor_SMD:R_0603" (layer "F.Cu") (uuid "fp-a") (at 10 10)
    (property "Reference" "R1" (at 0 -1.5) (layer "F.SilkS"))
    (pad "1" smd rect (at 0 0) (size 1 1) (layers "F.Cu")))
  (footprint "Resistor_SMD:R_0603" (layer "F.Cu") (uuid "fp-a") (at 20 20)
    (property "Reference" "R1" (at 0 -1.5) (layer "F.SilkS"))
    (pad "1" smd rect (at 0 0) (size 1 1) (layers "F.Cu"))
    (pad "2" smd rect (at 1 0) (size 1 1) (layers "F.Cu")))
)"#;

#[test]
fn test_repeated_footprint_uuid_emits_once() {
    let converter = convert_source("dup.kicad_pcb", DUPLICATE_FOOTPRINTS);
    let db = converter.db();

    assert_eq!(db.pcb_component.len(), 1);
    assert_eq!(db.pcb_smtpad.len(), 1, "second copy's pads are skipped");
    assert_eq!(converter.stats().components, 1);
}

const DUPLICATE_SYMBOLS: &str = r#"(kicad_sch (version 20230121) (generator eeschema)
  (paper "A4")
  (lib_symbols
    (symbol "Device:R"
      (symbol "R_1_1"
        (pin passive line (at 0 3.81 270) (length 1.27) (name "~") (number "1"))
        (pin passive line (at 0 -3.81 90) (length 1.27) (name "~") (number "2")))))
  (symbol (lib_id "Device:R") (at 100 100 0) (unit 1) (uuid "sym-a")
    (property "Reference" "R1" (at 0 0 0)))
  (symbol (lib_id "Device:R") (at 50 50 0) (unit 1) (uuid "sym-a")
    (property "Reference" "R1" (at 0 0 0)))
)"#;

#[test]
fn test_repeated_symbol_uuid_emits_once() {
    let converter = convert_source("dup.kicad_sch", DUPLICATE_SYMBOLS);
    let db = converter.db();

    assert_eq!(db.schematic_component.len(), 1);
    assert_eq!(db.schematic_port.len(), 2);
}

const DUAL_OPAMP: &str = r#"(kicad_sch (version 20230121) (generator eeschema)
  (paper "A4")
  (lib_symbols
    (symbol "Amp:Dual"
      (symbol "Dual_0_1"
        (pin power_in line (at 0 5.08 270) (length 2.54) (number "8")))
      (symbol "Dual_1_1"
        (pin input line (at -7.62 2.54 0) (length 2.54) (number "3"))
        (pin output line (at 7.62 0 180) (length 2.54) (number "1")))
      (symbol "Dual_2_1"
        (pin input line (at -7.62 2.54 0) (length 2.54) (number "5"))
        (pin output line (at 7.62 0 180) (length 2.54) (number "7")))))
  (symbol (lib_id "Amp:Dual") (at 100 100 0) (unit 1) (uuid "u1-a")
    (property "Reference" "U1" (at 0 0 0)))
  (symbol (lib_id "Amp:Dual") (at 150 100 0) (unit 2) (uuid "u1-b")
    (property "Reference" "U1" (at 0 0 0)))
)"#;

#[test]
fn test_ports_follow_placed_unit() {
    let converter = convert_source("amp.kicad_sch", DUAL_OPAMP);
    let db = converter.db();
    let components = db.schematic_component.list();

    let pins_of = |i: usize| -> Vec<&str> {
        db.schematic_port
            .list()
            .iter()
            .filter(|p| p.schematic_component_id == components[i].schematic_component_id)
            .filter_map(|p| p.pin_number.as_deref())
            .collect()
    };
    assert_eq!(components.len(), 2);
    assert_eq!(pins_of(0), vec!["8", "3", "1"]);
    assert_eq!(pins_of(1), vec!["8", "5", "7"]);
}
