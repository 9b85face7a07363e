//! End-to-end import scenarios over complete documents.

use float_cmp::approx_eq;
use serde_json::{Value, json};

use railmap_core::transform::{RegionTable, TransformConfig};
use railmap_parser::{ImportOptions, ParseOutput, StationRegistry, error::ErrorCode, parse};

fn station(key: &str, name: &str, x: f64, y: f64) -> Value {
    json!({ "key": key, "attributes": {
        "x": x, "y": y, "type": "shmetro-basic",
        "shmetro-basic": { "names": [name] }
    } })
}

fn edge(key: &str, source: &str, target: &str, line: &str, bg: &str) -> Value {
    json!({ "key": key, "source": source, "target": target, "attributes": {
        "visible": true,
        "type": "simple", "simple": { "offset": 0 },
        "style": "single-color",
        "single-color": { "color": ["sh", line, bg, "#fff"] }
    } })
}

fn document(nodes: Vec<Value>, edges: Vec<Value>) -> String {
    json!({ "graph": { "nodes": nodes, "edges": edges } }).to_string()
}

fn import(source: &str) -> ParseOutput {
    parse(source, &ImportOptions::default(), &TransformConfig::default())
        .expect("document should import")
}

fn codes(output: &ParseOutput) -> Vec<ErrorCode> {
    output.warnings.iter().filter_map(|w| w.code()).collect()
}

fn collinear() -> String {
    document(
        vec![
            station("a", "A", 0.0, 0.0),
            station("b", "B", 10.0, 0.0),
            station("c", "C", 20.0, 0.0),
        ],
        vec![
            edge("e1", "a", "b", "sh1", "#e4002b"),
            edge("e2", "b", "c", "sh1", "#e4002b"),
        ],
    )
}

#[test]
fn test_collinear_stations() {
    let output = import(&collinear());
    assert!(output.warnings.is_empty(), "{:?}", output.warnings);

    let lines = output.network.lines();
    assert_eq!(lines.len(), 1);

    let line = &lines[0];
    assert_eq!(line.stations().len(), 3);
    assert_eq!(line.edge_paths().len(), 2);
    for path in line.edge_paths() {
        assert!(approx_eq!(f64, path.length(), 10.0, epsilon = 1e-9));
    }

    let b = &line.stations()[1];
    assert_eq!(b.name(), "B");
    assert_eq!(b.index(), 2);
    assert!(approx_eq!(f64, b.coord().x(), 10.0, epsilon = 1e-9));
    assert!(approx_eq!(f64, b.coord().z(), 0.0, epsilon = 1e-9));
    assert!(approx_eq!(f64, b.coord().y(), 64.0, epsilon = 1e-9));
}

#[test]
fn test_region_transform_applies_to_stations() {
    let transform = RegionTable::builtin().resolve("zth");
    let output = parse(&collinear(), &ImportOptions::default(), &transform).unwrap();

    let b = &output.network.lines()[0].stations()[1];
    assert!(approx_eq!(f64, b.coord().x(), 20.0, epsilon = 1e-9));
    assert!(approx_eq!(
        f64,
        output.network.lines()[0].edge_paths()[0].length(),
        20.0,
        epsilon = 1e-9
    ));
}

#[test]
fn test_shared_name_is_transfer() {
    let source = document(
        vec![
            station("a", "A", 0.0, 0.0),
            station("x1", "Exchange", 10.0, 0.0),
            station("x2", "Exchange", 10.0, 40.0),
            station("d", "D", 20.0, 40.0),
        ],
        vec![
            edge("e1", "a", "x1", "sh1", "#e4002b"),
            edge("e2", "x2", "d", "sh2", "#97d700"),
        ],
    );
    let output = import(&source);
    let network = &output.network;

    assert_eq!(network.lines().len(), 2);
    let exchange = network.station("Exchange").unwrap();
    assert!(exchange.is_transfer());
    assert_eq!(exchange.lines().len(), 2);
    assert!(!network.station("A").unwrap().is_transfer());

    // One global entry per name
    assert_eq!(network.stations().len(), 3);

    for line in network.lines() {
        let copy = line
            .stations()
            .iter()
            .find(|station| station.name() == "Exchange")
            .unwrap();
        assert!(copy.is_transfer());
        assert_eq!(copy.lines(), exchange.lines());
    }
}

#[test]
fn test_import_is_idempotent() {
    let source = collinear();
    assert_eq!(import(&source).network, import(&source).network);
}

#[test]
fn test_single_station_line_is_dropped() {
    let source = document(
        vec![
            station("a", "A", 0.0, 0.0),
            station("b", "B", 10.0, 0.0),
            json!({ "key": "w", "attributes": { "x": 5, "y": 5, "type": "virtual", "virtual": {} } }),
        ],
        vec![
            edge("e1", "a", "w", "sh1", "#e4002b"),
            edge("e2", "a", "b", "sh2", "#97d700"),
        ],
    );
    let output = import(&source);

    assert_eq!(codes(&output), vec![ErrorCode::E300]);
    assert_eq!(output.network.lines().len(), 1);
    assert_eq!(output.network.lines()[0].color(), "#97d700");
    assert_eq!(output.network.lines()[0].name(), "Line 1");
}

#[test]
fn test_hidden_edges_do_not_form_lines() {
    let mut hidden = edge("e2", "b", "c", "sh1", "#e4002b");
    hidden["attributes"]["visible"] = json!(false);
    let source = document(
        vec![
            station("a", "A", 0.0, 0.0),
            station("b", "B", 10.0, 0.0),
            station("c", "C", 20.0, 0.0),
        ],
        vec![edge("e1", "a", "b", "sh1", "#e4002b"), hidden],
    );
    let output = import(&source);

    assert!(output.warnings.is_empty());
    assert_eq!(output.network.lines()[0].stations().len(), 2);
    assert!(output.network.station("C").is_none());
}

#[test]
fn test_unknown_curve_is_drawn_straight() {
    let mut odd = edge("e1", "a", "b", "sh1", "#e4002b");
    odd["attributes"]["type"] = json!("ray-guided");
    let source = document(
        vec![station("a", "A", 0.0, 0.0), station("b", "B", 30.0, 40.0)],
        vec![odd],
    );
    let output = import(&source);

    assert_eq!(codes(&output), vec![ErrorCode::E202]);
    let path = &output.network.lines()[0].edge_paths()[0];
    assert_eq!(path.segments().len(), 1);
    assert!(approx_eq!(f64, path.length(), 50.0, epsilon = 1e-9));
}

#[test]
fn test_line_badge_names_line() {
    let badge = json!({ "key": "badge", "attributes": {
        "x": 0, "y": -20, "type": "gzmtr-line-badge",
        "gzmtr-line-badge": { "names": ["Line 3", "3号线"], "color": ["sh", "sh3", "#ffd100", "#000"] }
    } });
    let source = document(
        vec![station("a", "A", 0.0, 0.0), station("b", "B", 10.0, 0.0), badge],
        vec![edge("e1", "a", "b", "sh3", "#ffd100")],
    );
    let output = import(&source);

    let line = &output.network.lines()[0];
    assert_eq!(line.name(), "Line 3");
    assert_eq!(line.id(), "line-1");
    assert!(line.stations()[0].lines().contains("Line 3"));
}

#[test]
fn test_badge_of_another_line_does_not_name_line() {
    let badge = json!({ "key": "badge", "attributes": {
        "x": 0, "y": -20, "type": "gzmtr-line-badge",
        "gzmtr-line-badge": { "names": ["Line 4"], "color": ["sh", "sh4", "#ffd100", "#fff"] }
    } });
    let source = document(
        vec![station("a", "A", 0.0, 0.0), station("b", "B", 10.0, 0.0), badge],
        vec![edge("e1", "a", "b", "sh3", "#ffd100")],
    );
    let output = import(&source);

    assert_eq!(output.network.lines()[0].name(), "Line 1");
}

#[test]
fn test_loop_line_visits_every_station_once() {
    let source = document(
        vec![
            station("a", "A", 0.0, 0.0),
            station("b", "B", 10.0, 0.0),
            station("c", "C", 10.0, 10.0),
        ],
        vec![
            edge("e1", "a", "b", "sh4", "#5f259f"),
            edge("e2", "b", "c", "sh4", "#5f259f"),
            edge("e3", "c", "a", "sh4", "#5f259f"),
        ],
    );
    let output = import(&source);

    let names: Vec<&str> = output.network.lines()[0]
        .stations()
        .iter()
        .map(|station| station.name())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn test_problems_are_returned_as_warnings() {
    let source = document(
        vec![
            station("a", "A", 0.0, 0.0),
            station("b", "B", 10.0, 0.0),
            json!({ "key": "lost", "attributes": { "type": "shmetro-basic" } }),
        ],
        vec![
            edge("e1", "a", "b", "sh1", "#e4002b"),
            edge("e2", "b", "ghost", "sh1", "#e4002b"),
        ],
    );
    let output = import(&source);

    assert_eq!(codes(&output), vec![ErrorCode::E100, ErrorCode::E200]);
    assert!(output.warnings.iter().all(|w| w.severity().is_warning()));
    assert_eq!(output.network.lines().len(), 1);
}

#[test]
fn test_invalid_json_is_an_error() {
    let err = parse(
        r#"{ "graph": { "nodes": [ }"#,
        &ImportOptions::default(),
        &TransformConfig::default(),
    )
    .unwrap_err();

    let diagnostic = &err.diagnostics()[0];
    assert_eq!(diagnostic.code(), Some(ErrorCode::E001));
    assert!(diagnostic.severity().is_error());
    assert!(!diagnostic.labels().is_empty());
}

#[test]
fn test_truncated_multibyte_document_is_an_error() {
    let full = document(
        vec![station("a", "人民广场", 0.0, 0.0), station("b", "中文", 10.0, 0.0)],
        vec![edge("e1", "a", "b", "sh1", "#e4002b")],
    );
    let cut = full
        .char_indices()
        .map(|(index, _)| index)
        .take_while(|&index| index <= full.len() / 2)
        .last()
        .unwrap();
    let sources = ["{\"中文".to_string(), format!("{}中文", &full[..cut])];

    for source in &sources {
        let err = parse(source, &ImportOptions::default(), &TransformConfig::default())
            .expect_err("truncated document must not import");
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E001));
    }
}

#[test]
fn test_missing_graph_is_an_error() {
    let err = parse(
        r#"{ "nodes": [] }"#,
        &ImportOptions::default(),
        &TransformConfig::default(),
    )
    .unwrap_err();

    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E002));
}

#[test]
fn test_custom_station_type() {
    let mut node = station("a", "A", 0.0, 0.0);
    node["attributes"]["type"] = json!("my-station");
    node["attributes"]["my-station"] = json!({ "names": ["A"] });
    let source = document(
        vec![node, station("b", "B", 10.0, 0.0)],
        vec![edge("e1", "a", "b", "sh1", "#e4002b")],
    );

    let default = import(&source);
    assert_eq!(codes(&default), vec![ErrorCode::E300]);

    let options = ImportOptions {
        registry: StationRegistry::builtin().extended(["my-station"], std::iter::empty::<String>()),
        ..ImportOptions::default()
    };
    let output = parse(&source, &options, &TransformConfig::default()).unwrap();
    assert_eq!(output.network.lines()[0].stations().len(), 2);
}
