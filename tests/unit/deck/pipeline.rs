use std::sync::Arc;

use super::*;
use crate::deck::opts::DeckOpts;
use crate::element::node::Element;
use crate::tools::measure::TextMeasurer;

struct FixedWidth(f64);

impl TextMeasurer for FixedWidth {
    fn text_width(&self, _svg: &str, _element_id: &str) -> DeckResult<f64> {
        Ok(self.0)
    }
}

fn measured(deck: &Slides) -> (Vec<StyleTable>, QueryCache) {
    let measurer: Arc<dyn TextMeasurer> = Arc::new(FixedWidth(120.0));
    let tables = style_tables(deck);
    let mut cache = QueryCache::new();
    for (slide, styles) in deck.slides().iter().zip(&tables) {
        let ctx = LayoutCtx::for_discovery(deck.theme_for(slide), styles, &measurer);
        let mut queries = Vec::new();
        slide.root().gather_queries(&ctx, &mut queries).unwrap();
        for query in queries {
            let key = query.key().clone();
            cache.insert(key, query.resolve().unwrap());
        }
    }
    (tables, cache)
}

fn two_step_deck() -> Slides {
    let mut deck = Slides::new(DeckOpts::default());
    let root = deck.new_slide(Some("Steps"));
    root.text("always");
    root.text("later").show(2u32).unwrap();
    deck
}

#[test]
fn phase_names_are_stable() {
    let names: Vec<_> = [
        BuildPhase::QueryDiscovery,
        BuildPhase::QueryResolution,
        BuildPhase::PageBuild,
        BuildPhase::Assembly,
        BuildPhase::Done,
        BuildPhase::Failed,
    ]
    .into_iter()
    .map(BuildPhase::as_str)
    .collect();
    assert_eq!(
        names,
        [
            "query_discovery",
            "query_resolution",
            "page_build",
            "assembly",
            "done",
            "failed"
        ]
    );
}

#[test]
fn phase_log_ends_in_failed_after_an_error() {
    let mut phases = PhaseLog::default();
    assert_eq!(phases.current, None);
    phases.enter(BuildPhase::PageBuild);
    assert_eq!(phases.current, Some(BuildPhase::PageBuild));
    phases.fail(&DeckError::construction("compositor broke"));
    assert_eq!(phases.current, Some(BuildPhase::Failed));
}

#[test]
fn page_svg_is_deterministic_and_step_dependent() {
    let deck = two_step_deck();
    let (tables, cache) = measured(&deck);
    let slide = &deck.slides()[0];

    let first = render_page_svg(&deck, slide, &tables[0], &cache, 1).unwrap();
    let again = render_page_svg(&deck, slide, &tables[0], &cache, 1).unwrap();
    let second = render_page_svg(&deck, slide, &tables[0], &cache, 2).unwrap();

    assert_eq!(first, again);
    assert_ne!(first, second);
    assert!(first.contains("always"));
    assert!(!first.contains("later"));
    assert!(second.contains("later"));
    assert!(first.starts_with("<svg"));
}

#[test]
fn rendering_without_resolved_queries_fails() {
    let deck = two_step_deck();
    let tables = style_tables(&deck);
    let err = render_page_svg(&deck, &deck.slides()[0], &tables[0], &QueryCache::new(), 1)
        .unwrap_err();
    assert!(matches!(err, DeckError::Query { .. }));
}

#[test]
fn pages_come_out_in_slide_then_step_order() {
    let mut deck = two_step_deck();
    deck.new_slide(None).text("single");
    let (tables, cache) = measured(&deck);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(2)
        .build()
        .unwrap();

    let pages = render_pages(&deck, &tables, &cache, &pool).unwrap();
    let order: Vec<_> = pages.iter().map(|p| (p.slide, p.step)).collect();
    assert_eq!(order, [(0, 1), (0, 2), (1, 1)]);
    for page in &pages {
        assert_eq!(page.hash, ContentHash::of(page.svg.as_bytes()));
    }
}

#[test]
fn debug_pages_use_zero_based_slide_and_one_based_step() {
    let dir = std::env::temp_dir().join(format!(
        "stepdeck-debug-pages-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let page = RenderedPage {
        slide: 0,
        step: 2,
        svg: "<svg/>".to_string(),
        hash: ContentHash::of(b"<svg/>"),
    };
    write_debug_pages(&[page], &dir).unwrap();
    assert_eq!(
        std::fs::read_to_string(dir.join("slide-0-2.svg")).unwrap(),
        "<svg/>"
    );
    let _ = std::fs::remove_dir_all(&dir);
}
