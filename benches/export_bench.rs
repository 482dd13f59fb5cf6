use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use slidepress::export::{BuiltinCapabilities, MemorySink};
use slidepress::rendering::capture_block;
use slidepress::slides::DECK;
use slidepress::view::{render_page, ViewSnapshot, ViewState};
use slidepress::{CaptureOptions, Config, Exporter, Surface, SLIDES};

fn mounted(config: &Config) -> Surface {
    let mut surface = Surface::new(config.viewport);
    surface.load_html(render_page(&DECK, SLIDES, &ViewSnapshot::default()).unwrap());
    surface
}

fn bench_capture_block(c: &mut Criterion) {
    let config = Config::default();
    let block = mounted(&config)
        .slide_blocks()
        .expect("query blocks")
        .remove(0);
    let options = CaptureOptions::default();

    c.bench_function("capture_block", |b| {
        b.iter(|| {
            let _ = capture_block(&block, &options).unwrap();
        })
    });
}

fn bench_full_export(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let config = Config::default();
    let surface = mounted(&config);
    let loader = Arc::new(BuiltinCapabilities::from_config(&config.export));
    let exporter = Exporter::new(config.export.clone(), loader, Arc::new(MemorySink::new()));
    let view = ViewState::new();

    c.bench_function("export_to_document", |b| {
        b.iter(|| {
            let outcome = runtime.block_on(exporter.export_to_document(&view, Some(&surface)));
            assert!(outcome.is_saved());
        })
    });
}

criterion_group!(benches, bench_capture_block, bench_full_export);
criterion_main!(benches);
