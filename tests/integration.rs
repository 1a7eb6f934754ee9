//! End-to-end tests for the indexing pipeline.
//!
//! Books are assembled in memory with `MemoryContainer`, run through
//! `build_index`, and checked against the guarantees every output record
//! must hold: contiguous ids, ordered chapters, unique titles and word counts
//! that agree with the paragraphs.

use std::collections::HashSet;

use book_index::assemble::{read_index, write_index};
use book_index::config::IndexConfig;
use book_index::container::MemoryContainer;
use book_index::model::{BookIndex, NavNode};
use book_index::navigate::{Position, chapter_for_paragraph, next_position, percent_complete};
use book_index::pipeline::{BuildOutcome, build_index};
use book_index::resolve::ResolutionTier;
use book_index::text::tokenize;

const SCENARIO_B_TITLES: [&str; 10] = [
    "The Harbor",
    "The Lighthouse",
    "Northern Road",
    "Salt and Iron",
    "A Winter Crossing",
    "The Long Night",
    "Embers",
    "Return to the Coast",
    "Quiet Waters",
    "Homecoming",
];

fn build(container: &mut MemoryContainer) -> BuildOutcome {
    build_index(container, "test-book", &IndexConfig::default()).unwrap()
}

fn chapter_doc(anchor: &str, title: &str, body: &[&str]) -> String {
    let mut markup = format!("<html><body><h1 id=\"{anchor}\">{title}</h1>");
    for p in body {
        markup.push_str(&format!("<p>{p}</p>"));
    }
    markup.push_str("</body></html>");
    markup
}

fn three_chapter_book() -> MemoryContainer {
    MemoryContainer::new("Three Chapters")
        .author("A. Writer")
        .document(
            "c1",
            "OEBPS/Text/c1.xhtml",
            &chapter_doc("c1", "Chapter One", &["First of one.", "Second of one."]),
        )
        .document(
            "c2",
            "OEBPS/Text/c2.xhtml",
            &chapter_doc("c2", "Chapter Two", &["First of two.", "Second of two."]),
        )
        .document(
            "c3",
            "OEBPS/Text/c3.xhtml",
            &chapter_doc("c3", "Chapter Three", &["First of three.", "Second of three."]),
        )
        .toc(vec![
            NavNode::link("Chapter One", "Text/c1.xhtml#c1"),
            NavNode::link("Chapter Two", "Text/c2.xhtml#c2"),
            NavNode::link("Chapter Three", "Text/c3.xhtml#c3"),
        ])
}

fn scenario_b_book() -> MemoryContainer {
    let mut markup = String::from("<html><body>");
    for (i, title) in SCENARIO_B_TITLES.iter().enumerate() {
        if i < 2 {
            markup.push_str(&format!("<h2 id=\"s{i}\">{title}</h2>"));
        } else {
            markup.push_str(&format!("<h2>{title}</h2>"));
        }
        markup.push_str(&format!(
            "<p>Story text for section number {i}, long enough to never pass for a heading.</p>"
        ));
    }
    markup.push_str("</body></html>");

    let toc = SCENARIO_B_TITLES
        .iter()
        .enumerate()
        .map(|(i, title)| NavNode::link(title, &format!("book.xhtml#s{i}")))
        .collect();

    MemoryContainer::new("Ten Sections")
        .document("book", "book.xhtml", &markup)
        .toc(toc)
}

/// Invariants every output record must satisfy.
fn assert_well_formed(index: &BookIndex) {
    let base = index.id_base();
    for (position, paragraph) in index.paragraphs.iter().enumerate() {
        assert_eq!(paragraph.id, position + base, "ids must be contiguous");
        assert!(!paragraph.text.trim().is_empty());
    }

    let words: usize = index.paragraphs.iter().map(|p| tokenize(&p.text).len()).sum();
    assert_eq!(index.total_words, words);

    if !index.paragraphs.is_empty() {
        assert!(!index.chapters.is_empty(), "non-empty books have a chapter");
    }

    let mut titles = HashSet::new();
    for (i, chapter) in index.chapters.iter().enumerate() {
        assert_eq!(chapter.index, i);
        assert!(titles.insert(chapter.title.as_str()), "duplicate title {}", chapter.title);
        assert!(index.paragraph(chapter.start_paragraph_id).is_some());
        if i > 0 {
            assert!(chapter.start_paragraph_id > index.chapters[i - 1].start_paragraph_id);
        }
    }

    let owners: Vec<usize> = index.paragraphs.iter().map(|p| p.chapter_index).collect();
    assert!(owners.windows(2).all(|w| w[0] <= w[1]), "chapter indices must not decrease");
    for chapter in &index.chapters {
        let start = index.paragraph(chapter.start_paragraph_id).unwrap();
        assert_eq!(start.chapter_index, chapter.index);
    }
}

#[test]
fn scenario_a_one_anchor_per_document() {
    let outcome = build(&mut three_chapter_book());
    let index = &outcome.index;
    assert_well_formed(index);

    assert_eq!(outcome.report.tier, ResolutionTier::Incremental);
    let titles: Vec<_> = index.chapters.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Chapter One", "Chapter Two", "Chapter Three"]);
    let starts: Vec<_> = index.chapters.iter().map(|c| c.start_paragraph_id).collect();
    assert_eq!(starts, vec![0, 3, 6]);

    assert_eq!(index.title, "Three Chapters");
    assert_eq!(index.author.as_deref(), Some("A. Writer"));
    assert_eq!(index.paragraphs.len(), 9);
}

#[test]
fn scenario_b_sparse_anchors_trigger_text_matching() {
    let outcome = build(&mut scenario_b_book());
    let index = &outcome.index;
    assert_well_formed(index);

    assert_eq!(outcome.report.toc_entries, 10);
    assert_eq!(outcome.report.tier, ResolutionTier::FuzzyFallback);

    let titles: Vec<_> = index.chapters.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, SCENARIO_B_TITLES.to_vec());
    for (i, chapter) in index.chapters.iter().enumerate() {
        assert_eq!(chapter.start_paragraph_id, i * 2);
    }
}

#[test]
fn scenario_c_ignored_heading_gives_no_chapter() {
    let mut container = MemoryContainer::new("Front Matter Only")
        .document(
            "toc",
            "toc.xhtml",
            "<body><h1>Table of Contents</h1><p>Chapter one, page three.</p></body>",
        )
        .document("story", "story.xhtml", "<body><p>Once upon a time.</p></body>")
        .toc(vec![NavNode::link("Table of Contents", "toc.xhtml")]);

    let outcome = build(&mut container);
    let index = &outcome.index;
    assert_well_formed(index);

    assert_eq!(outcome.report.tier, ResolutionTier::WholeBook);
    assert_eq!(index.chapters.len(), 1);
    assert_eq!(index.chapters[0].title, "Full Text");
    assert_eq!(index.chapters[0].start_paragraph_id, 0);
    assert!(index.paragraphs.iter().all(|p| p.chapter_index == 0));
}

#[test]
fn unmatched_toc_falls_back_to_whole_book() {
    let mut container = MemoryContainer::new("Lost Contents")
        .document(
            "d1",
            "text/d1.xhtml",
            "<body><p>The tide came in slowly.</p><p>Gulls circled.</p></body>",
        )
        .document("d2", "text/d2.xhtml", "<body><p>Night fell over the bay.</p></body>")
        .toc(vec![
            NavNode::link("The Vanished Prologue", "missing/p.xhtml#start"),
            NavNode::link("An Absent Middle", "missing/m.xhtml"),
            NavNode::link("Nowhere at All", "missing/n.xhtml#x"),
            NavNode::to_id("Phantom Appendix", "no-such-id"),
        ]);

    let outcome = build(&mut container);
    let index = &outcome.index;
    assert_well_formed(index);

    assert_eq!(outcome.report.toc_entries, 4);
    assert_eq!(outcome.report.tier, ResolutionTier::WholeBook);
    assert_eq!(index.chapters.len(), 1);
    assert_eq!(index.chapters[0].title, "Full Text");
    assert_eq!(index.chapters[0].start_paragraph_id, 0);
    assert_eq!(index.paragraphs.len(), 3);
}

#[test]
fn scenario_d_unstructured_document_is_one_paragraph() {
    let mut container = MemoryContainer::new("Loose")
        .document(
            "loose",
            "loose.xhtml",
            "<html><body>Just some loose text<br/>spread over   two lines</body></html>",
        );

    let outcome = build(&mut container);
    let index = &outcome.index;
    assert_well_formed(index);

    assert_eq!(index.paragraphs.len(), 1);
    assert_eq!(index.paragraphs[0].text, "Just some loose text spread over two lines");
    assert_eq!(index.total_words, 8);
}

#[test]
fn rebuilding_gives_identical_output() {
    let first = build(&mut three_chapter_book()).index;
    let second = build(&mut three_chapter_book()).index;
    assert_eq!(first, second);

    let b1 = build(&mut scenario_b_book()).index;
    let b2 = build(&mut scenario_b_book()).index;
    assert_eq!(b1, b2);
}

#[test]
fn path_spellings_are_equivalent() {
    let doc = chapter_doc("start", "Only Chapter", &["Some text."]);
    let spellings = [
        "OEBPS/Text/only.xhtml#start",
        "../Text/only.xhtml#start",
        "/oebps/text/ONLY.xhtml#start",
        "only.xhtml#start",
    ];

    for href in spellings {
        let mut container = MemoryContainer::new("Paths")
            .document("only", "OEBPS/Text/only.xhtml", &doc)
            .toc(vec![NavNode::link("Only Chapter", href)]);
        let index = build(&mut container).index;
        assert_eq!(index.chapters.len(), 1, "href {href}");
        assert_eq!(index.chapters[0].title, "Only Chapter", "href {href}");
        assert_eq!(index.chapters[0].start_paragraph_id, 0, "href {href}");
    }
}

#[test]
fn repeated_titles_start_only_one_chapter() {
    let mut container = MemoryContainer::new("Interludes")
        .document("a", "a.xhtml", &chapter_doc("i1", "Interlude", &["First pause."]))
        .document("b", "b.xhtml", &chapter_doc("i2", "Interlude", &["Second pause."]))
        .toc(vec![
            NavNode::link("Interlude", "a.xhtml#i1"),
            NavNode::link("Interlude", "b.xhtml#i2"),
        ]);

    let index = build(&mut container).index;
    assert_well_formed(&index);
    assert_eq!(index.chapters.len(), 1);
    assert!(index.paragraphs.iter().all(|p| p.chapter_index == 0));
}

#[test]
fn front_matter_belongs_to_first_chapter() {
    let mut container = MemoryContainer::new("Front")
        .document("front", "front.xhtml", "<body><p>A note before anything starts.</p></body>")
        .document("c1", "c1.xhtml", &chapter_doc("c1", "Beginning", &["Story."]))
        .toc(vec![NavNode::link("Beginning", "c1.xhtml#c1")]);

    let index = build(&mut container).index;
    assert_well_formed(&index);
    assert_eq!(index.chapters[0].start_paragraph_id, 1);
    assert_eq!(index.paragraphs[0].chapter_index, 0);
}

#[test]
fn documents_without_anchors_use_path_then_heading() {
    let mut container = MemoryContainer::new("Mixed")
        .document("p1", "part1.xhtml", "<body><h2>Ignored Heading</h2><p>Part one.</p></body>")
        .document("p2", "part2.xhtml", "<body><h2>Second Part</h2><p>Part two.</p></body>")
        .toc(vec![NavNode::link("Part One", "part1.xhtml")]);

    let index = build(&mut container).index;
    assert_well_formed(&index);
    let titles: Vec<_> = index.chapters.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Part One", "Second Part"]);
}

#[test]
fn empty_book_has_no_chapters() {
    let mut container = MemoryContainer::new("Blank")
        .document("blank", "blank.xhtml", "<body><img src=\"x.png\"/></body>")
        .toc(vec![NavNode::link("Cover", "blank.xhtml")]);

    let outcome = build(&mut container);
    assert_eq!(outcome.report.tier, ResolutionTier::Empty);
    assert!(outcome.index.paragraphs.is_empty());
    assert!(outcome.index.chapters.is_empty());
    assert_eq!(outcome.index.total_words, 0);
}

#[test]
fn one_based_ids_shift_paragraphs_and_chapters() {
    let config = IndexConfig {
        one_based_ids: true,
        ..Default::default()
    };
    let index = build_index(&mut three_chapter_book(), "b", &config)
        .unwrap()
        .index;
    assert_well_formed(&index);
    assert_eq!(index.paragraphs[0].id, 1);
    let starts: Vec<_> = index.chapters.iter().map(|c| c.start_paragraph_id).collect();
    assert_eq!(starts, vec![1, 4, 7]);
}

#[test]
fn json_record_roundtrips_through_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("public").join("books").join("three.json");
    let index = build(&mut three_chapter_book()).index;

    write_index(&index, &path, true).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["id"], "test-book");
    assert_eq!(raw["totalWords"], index.total_words);
    assert_eq!(raw["paragraphs"][3]["chapterIndex"], 1);
    assert_eq!(raw["chapters"][2]["startParagraphId"], 6);

    assert_eq!(read_index(&path).unwrap(), index);
}

#[test]
fn navigation_over_built_index() {
    let index = build(&mut three_chapter_book()).index;

    assert_eq!(chapter_for_paragraph(&index, 4).unwrap().title, "Chapter Two");
    assert_eq!(percent_complete(&index, Position::new(0, 0)), 0);

    let last = index.paragraphs.last().unwrap();
    let words = tokenize(&last.text).len();
    assert_eq!(percent_complete(&index, Position::new(last.id, words)), 100);
    assert_eq!(next_position(&index, Position::new(last.id, words - 1)), None);
    assert_eq!(
        next_position(&index, Position::new(0, 1)),
        Some(Position::new(1, 0))
    );
}
