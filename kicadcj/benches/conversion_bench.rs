use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kicadcj::prelude::*;
use kicadcj::{PcbParser, SchematicParser};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture should exist")
}

fn bench_convert_board(c: &mut Criterion) {
    let board = read_fixture("simple_board.kicad_pcb");

    c.bench_function("convert_board", |b| {
        b.iter(|| {
            let mut converter = KicadToCircuitJsonConverter::new();
            converter.add_file("simple_board.kicad_pcb", black_box(board.clone()));
            converter.run_until_finished().unwrap();
            converter.output()
        });
    });
}

fn bench_convert_board_and_sheet(c: &mut Criterion) {
    let board = read_fixture("simple_board.kicad_pcb");
    let sheet = read_fixture("simple_sheet.kicad_sch");

    c.bench_function("convert_board_and_sheet_to_json", |b| {
        b.iter(|| {
            let mut converter = KicadToCircuitJsonConverter::new();
            converter.add_file("simple_board.kicad_pcb", black_box(board.clone()));
            converter.add_file("simple_sheet.kicad_sch", black_box(sheet.clone()));
            converter.run_until_finished().unwrap();
            converter.output_json(false).unwrap()
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    let board = read_fixture("simple_board.kicad_pcb");
    let sheet = read_fixture("simple_sheet.kicad_sch");

    c.bench_function("parse_board", |b| {
        b.iter(|| PcbParser::parse_pcb_str(black_box(&board), "simple_board.kicad_pcb"));
    });
    c.bench_function("parse_sheet", |b| {
        b.iter(|| SchematicParser::parse_schematic_str(black_box(&sheet), "simple_sheet.kicad_sch"));
    });
}

criterion_group!(
    benches,
    bench_convert_board,
    bench_convert_board_and_sheet,
    bench_parse
);
criterion_main!(benches);
