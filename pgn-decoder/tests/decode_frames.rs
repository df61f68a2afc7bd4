// Decoding scenarios against the built-in catalog
use pgn_decoder::schema::catalog;
use pgn_decoder::{
    ByteRange, DecodeOutcome, Decoder, DecoderError, MessageDefinition, ParameterDefinition,
    PayloadFault, RawFrame, SchemaRegistry,
};
use std::sync::Arc;

fn decoder() -> Decoder {
    let _ = env_logger::builder().is_test(true).try_init();
    Decoder::new(Arc::new(SchemaRegistry::builtin().unwrap()))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn every_known_identifier_decodes_all_parameters_in_order() {
    let decoder = decoder();

    for definition in decoder.registry().iter() {
        let frame = RawFrame::new(definition.identifier.clone(), ["01"; 8]);
        let values = decoder.decode(&frame).unwrap().unwrap();

        let labels: Vec<String> = definition.parameters.iter().map(|p| p.label()).collect();
        let decoded: Vec<String> = values.iter().map(|v| v.label.clone()).collect();
        assert_eq!(decoded, labels, "{}", definition.identifier);
    }
}

#[test]
fn unknown_identifier_is_not_decodable() {
    let decoder = decoder();
    for identifier in ["18FEEE00", "", "not-hex", "18FEF2"] {
        let frame = RawFrame::new(identifier, ["00"; 8]);
        assert_eq!(decoder.decode_outcome(&frame).unwrap(), DecodeOutcome::Unknown);
    }
}

#[test]
fn fuel_level_scenario() {
    let frame = RawFrame::new(catalog::FUEL_LEVEL, ["00", "64", "FF", "FF", "FF", "FF", "FF", "FF"]);
    let values = decoder().decode(&frame).unwrap().unwrap();

    assert_eq!(values.len(), 1);
    assert_eq!(values[0].label, "Fuel Level (%)");
    assert_close(values[0].value, 40.0);
}

#[test]
fn fuel_rate_scenario() {
    let frame = RawFrame::new(catalog::FUEL_ECONOMY, ["0A", "00", "FF", "FF", "FF", "FF", "FF", "FF"]);
    let values = decoder().decode(&frame).unwrap().unwrap();

    assert_eq!(values[0].label, "Fuel Rate (l/h)");
    assert_close(values[0].value, 0.5);
}

#[test]
fn operation_state_scenario() {
    let frame = RawFrame::new(catalog::OPERATION_STATE, ["01"]);
    let values = decoder().decode(&frame).unwrap().unwrap();

    assert_eq!(values[0].label, "Status (int)");
    assert_close(values[0].value, 1.0);
}

#[test]
fn total_fuel_used_reads_bytes_four_to_seven() {
    // 0x00001000 = 4096 half-litres
    let frame = RawFrame::new(
        catalog::FUEL_CONSUMPTION,
        ["FF", "FF", "FF", "FF", "00", "10", "00", "00"],
    );
    let values = decoder().decode(&frame).unwrap().unwrap();

    assert_eq!(values[0].label, "Total Fuel Used (l)");
    assert_close(values[0].value, 2048.0);
}

#[test]
fn engine_hours_reads_four_bytes_little_endian() {
    // 0x000186A0 = 100000 * 0.05 h
    let frame = RawFrame::new(
        catalog::ENGINE_HOURS,
        ["A0", "86", "01", "00", "FF", "FF", "FF", "FF"],
    );
    let values = decoder().decode(&frame).unwrap().unwrap();

    assert_eq!(values[0].label, "Engine Total Hours of Operation (h)");
    assert_close(values[0].value, 5000.0);
}

#[test]
fn two_byte_range_is_byte_reversed() {
    let frame = RawFrame::new(catalog::FUEL_ECONOMY, ["1E", "00"]);
    let values = decoder().decode(&frame).unwrap().unwrap();

    // 0x001E, not 0x1E00
    assert_close(values[0].value, 30.0 * 0.05);
}

#[test]
fn short_fuel_consumption_frame_is_malformed() {
    let decoder = decoder();

    for len in 0..8 {
        let frame = RawFrame::new(catalog::FUEL_CONSUMPTION, vec!["00"; len]);
        match decoder.decode(&frame) {
            Err(DecoderError::MalformedPayload { identifier, fault, .. }) => {
                assert_eq!(identifier, catalog::FUEL_CONSUMPTION);
                assert_eq!(fault, PayloadFault::OutOfRange { index: 7, len });
            }
            other => panic!("len {}: expected malformed payload, got {:?}", len, other),
        }
    }
}

#[test]
fn invalid_hex_token_is_malformed() {
    let frame = RawFrame::new(catalog::FUEL_LEVEL, ["00", "XY"]);
    let err = decoder().decode(&frame).unwrap_err();
    assert!(err.is_malformed_payload());
    assert!(err.to_string().contains("XY"));
}

#[test]
fn offset_and_resolution_follow_scaling_law() {
    let registry = SchemaRegistry::from_definitions(vec![MessageDefinition::new(
        "18FEEE00",
        "Engine Temperature 1",
        vec![
            ParameterDefinition::new("Engine Coolant Temperature", ByteRange::Single(0), -40, 1.0, "deg C"),
            ParameterDefinition::new(
                "Engine Oil Temperature 1",
                ByteRange::Inclusive { start: 2, end: 3 },
                -8736,
                0.03125,
                "deg C",
            ),
        ],
    )])
    .unwrap();
    let decoder = Decoder::new(Arc::new(registry));

    let frame = RawFrame::new("18feee00", ["78", "FF", "20", "2D", "FF", "FF", "FF", "FF"]);
    let values = decoder.decode(&frame).unwrap().unwrap();

    assert_eq!(values.len(), 2);
    assert_eq!(values[0].label, "Engine Coolant Temperature (deg C)");
    assert_close(values[0].value, (0x78 as f64 - 40.0) * 1.0);
    assert_eq!(values[1].label, "Engine Oil Temperature 1 (deg C)");
    assert_close(values[1].value, (0x2D20 as f64 - 8736.0) * 0.03125);
}

#[test]
fn decoding_from_many_threads() {
    let decoder = Arc::new(decoder());

    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            let decoder = Arc::clone(&decoder);
            std::thread::spawn(move || {
                let frame = RawFrame::new(catalog::FUEL_LEVEL, ["00".to_string(), format!("{:02X}", i)]);
                decoder.decode(&frame).unwrap().unwrap()[0].value
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_close(handle.join().unwrap(), i as f64 * 0.4);
    }
}
