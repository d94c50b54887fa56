//! Performance benchmarks for pdfstate.
//!
//! Benchmarks cover operator dispatch over synthetic pages:
//! - Text: many lines of `Td`/`Tj` with kerned `TJ` arrays
//! - Graphics: deep `q`/`cm`/`Q` nesting with color and stroke operators
//! - Forms: a page that invokes the same form XObject many times

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pdfstate::{
    CollectingHandler, Ctm, FormXObject, InterpretOptions, MapResources, NullHandler, Operand,
    Operator, PageContent, SimpleFontMetrics, interpret_page, interpret_pages,
};

// ---------------------------------------------------------------------------
// Page generators
// ---------------------------------------------------------------------------

fn font_resources() -> MapResources {
    MapResources::new().with_font("F1", SimpleFontMetrics::default_metrics())
}

fn tf(size: f64) -> Operator {
    Operator::new(
        "Tf",
        vec![Operand::Name("F1".to_string()), Operand::Real(size)],
    )
}

/// `n_lines` lines of ~70 chars, alternating `Tj` and kerned `TJ`.
fn text_page(n_lines: usize) -> PageContent {
    let mut ops = vec![
        Operator::bare("BT"),
        tf(10.0),
        Operator::numeric("Td", &[72.0, 720.0]),
    ];
    for i in 0..n_lines {
        let line = format!(
            "Line {} of the document with some words to measure dispatch speed",
            i + 1
        );
        if i > 0 {
            ops.push(Operator::numeric("Td", &[0.0, -14.0]));
        }
        if i % 2 == 0 {
            ops.push(Operator::new(
                "Tj",
                vec![Operand::LiteralString(line.into_bytes())],
            ));
        } else {
            let parts = line
                .split(' ')
                .flat_map(|word| {
                    [
                        Operand::LiteralString(format!("{word} ").into_bytes()),
                        Operand::Integer(-20),
                    ]
                })
                .collect();
            ops.push(Operator::new("TJ", vec![Operand::Array(parts)]));
        }
    }
    ops.push(Operator::bare("ET"));
    PageContent::new(ops, font_resources())
}

/// A grid of stroked cells, each in its own `q` ... `Q` scope.
fn graphics_page(rows: usize, cols: usize) -> PageContent {
    let mut ops = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            ops.push(Operator::bare("q"));
            ops.push(Operator::numeric(
                "cm",
                &[1.0, 0.0, 0.0, 1.0, 72.0 + c as f64 * 80.0, 150.0 + r as f64 * 20.0],
            ));
            ops.push(Operator::numeric("RG", &[0.2, 0.2, 0.2]));
            ops.push(Operator::numeric("w", &[0.5]));
            ops.push(Operator::numeric("re", &[0.0, 0.0, 80.0, 20.0]));
            ops.push(Operator::bare("S"));
            ops.push(Operator::bare("Q"));
        }
    }
    PageContent::new(ops, MapResources::new())
}

fn form_page(invocations: usize) -> PageContent {
    let form = FormXObject {
        matrix: Ctm::scaling(0.5, 0.5),
        operators: text_page(5).operators,
        ..FormXObject::default()
    };
    let mut ops = Vec::new();
    for i in 0..invocations {
        ops.push(Operator::bare("q"));
        ops.push(Operator::numeric("cm", &[1.0, 0.0, 0.0, 1.0, 0.0, i as f64 * 10.0]));
        ops.push(Operator::new("Do", vec![Operand::Name("Fm0".to_string())]));
        ops.push(Operator::bare("Q"));
    }
    PageContent::new(ops, font_resources().with_form("Fm0", form))
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_text(c: &mut Criterion) {
    let options = InterpretOptions::default();
    let mut group = c.benchmark_group("text");

    for lines in [10, 100] {
        let page = text_page(lines);
        group.bench_function(format!("{lines}_lines"), |b| {
            b.iter(|| {
                let mut handler = CollectingHandler::default();
                let summary = interpret_page(&page, &mut handler, &options).unwrap();
                black_box(summary.glyph_count);
            });
        });
    }

    group.finish();
}

fn bench_graphics(c: &mut Criterion) {
    let options = InterpretOptions::default();
    let page = graphics_page(20, 5);

    c.bench_function("graphics_grid_20x5", |b| {
        b.iter(|| {
            let summary = interpret_page(&page, &mut NullHandler, &options).unwrap();
            black_box(summary.paint_count);
        });
    });
}

fn bench_forms(c: &mut Criterion) {
    let options = InterpretOptions::default();
    let page = form_page(50);

    c.bench_function("form_50_invocations", |b| {
        b.iter(|| {
            let summary = interpret_page(&page, &mut NullHandler, &options).unwrap();
            black_box(summary.glyph_count);
        });
    });
}

fn bench_pages(c: &mut Criterion) {
    let options = InterpretOptions::default();
    let pages: Vec<PageContent> = (0..10).map(|_| text_page(50)).collect();

    c.bench_function("pages_10x50_lines", |b| {
        b.iter(|| {
            let results = interpret_pages(&pages, &options);
            black_box(results.len());
        });
    });
}

criterion_group!(benches, bench_text, bench_graphics, bench_forms, bench_pages);
criterion_main!(benches);
