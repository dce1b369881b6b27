use flotline::error::PlotError;
use flotline::options::{AxisPosition, PlotOptions};

#[test]
fn partial_documents_fall_back_to_defaults() {
    let options = PlotOptions::from_json(
        r#"{
            "grid": { "hoverable": true, "mouse_active_radius": 25.0 },
            "yaxis": { "position": "Right" }
        }"#,
    )
    .expect("partial document parses");

    assert!(options.grid.hoverable);
    assert_eq!(options.grid.mouse_active_radius, 25.0);
    assert_eq!(options.yaxis.position, AxisPosition::Right);

    // untouched fields keep their defaults
    assert!(options.grid.show);
    assert_eq!(options.grid.label_margin, 5.0);
    assert_eq!(options.colors.len(), 5);
    assert_eq!(options.series.shadow_size, 3.0);
}

#[test]
fn an_empty_document_is_the_default_configuration() {
    let options = PlotOptions::from_json("{}").expect("empty document parses");
    assert_eq!(options.grid.color, PlotOptions::default().grid.color);
    assert_eq!(options.series.xaxis, 1);
}

#[test]
fn serialized_options_parse_back_identically() {
    let mut options = PlotOptions::default();
    options.colors = vec!["#123456".to_owned()];
    options.grid.markings_line_width = 4.0;
    options.series.bars.show = true;
    options.xaxis.min = Some(-3.0);

    let doc = options.to_json().expect("serializes");
    let parsed = PlotOptions::from_json(&doc).expect("round trips");

    assert_eq!(parsed.colors, options.colors);
    assert_eq!(parsed.grid.markings_line_width, 4.0);
    assert!(parsed.series.bars.show);
    assert_eq!(parsed.xaxis.min, Some(-3.0));
}

#[test]
fn malformed_documents_surface_a_configuration_error() {
    let err = PlotOptions::from_json("{ not json").unwrap_err();
    assert!(matches!(err, PlotError::InvalidOptions(_)));
}
