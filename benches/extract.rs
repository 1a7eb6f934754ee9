//! Benchmarks for extraction and full indexing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use book_index::config::IndexConfig;
use book_index::container::MemoryContainer;
use book_index::extract::ContentExtractor;
use book_index::model::NavNode;
use book_index::pipeline::build_index;

fn chapter_markup(chapter: usize, paragraphs: usize) -> String {
    let mut markup = format!(
        "<html><head><title>c{chapter}</title><style>p {{ margin: 0 }}</style></head><body>\
         <a id=\"top{chapter}\"></a><h2 id=\"c{chapter}\">Chapter {chapter}</h2>"
    );
    for i in 0..paragraphs {
        markup.push_str(&format!(
            "<p>Paragraph {i} of chapter {chapter}: the road ran north along the \
             <em>cold</em> shore, and the wind <span>kept</span> turning.</p>"
        ));
    }
    markup.push_str("<div class=\"note\"><p>A footnote.</p></div></body></html>");
    markup
}

fn book(chapters: usize, paragraphs: usize) -> MemoryContainer {
    let mut container = MemoryContainer::new("Bench Book");
    let mut toc = Vec::new();
    for c in 0..chapters {
        let path = format!("OEBPS/Text/c{c}.xhtml");
        container = container.document(&format!("c{c}"), &path, &chapter_markup(c, paragraphs));
        toc.push(NavNode::link(&format!("Chapter {c}"), &format!("Text/c{c}.xhtml#c{c}")));
    }
    container.toc(toc)
}

fn bench_extract(c: &mut Criterion) {
    let extractor = ContentExtractor::new(2);
    let markup = chapter_markup(1, 200);

    c.bench_function("extract_200_paragraphs", |bench| {
        bench.iter(|| black_box(extractor.extract(black_box(&markup))))
    });
}

fn bench_build_index(c: &mut Criterion) {
    let config = IndexConfig::default();
    let template = book(20, 50);

    c.bench_function("build_index_20x50", |bench| {
        bench.iter(|| {
            let mut container = template.clone();
            black_box(build_index(&mut container, "bench", &config).unwrap())
        })
    });
}

criterion_group!(benches, bench_extract, bench_build_index);
criterion_main!(benches);
