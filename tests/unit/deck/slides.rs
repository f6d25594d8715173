use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::*;
use crate::element::node::Element;
use crate::foundation::error::DeckError;
use crate::style::text_style::Align;
use crate::tools::composite::{DocumentAssembler, PageCompositor};
use crate::tools::measure::TextMeasurer;

struct Unused;

impl TextMeasurer for Unused {
    fn text_width(&self, _svg: &str, _element_id: &str) -> DeckResult<f64> {
        panic!("no measurement expected")
    }
}

impl PageCompositor for Unused {
    fn extension(&self) -> &str {
        "svg"
    }

    fn composite(&self, _svg: &str, _output: &Path) -> DeckResult<()> {
        panic!("no compositing expected")
    }
}

impl DocumentAssembler for Unused {
    fn assemble(&self, _pages: &[PathBuf], _output: &Path) -> DeckResult<()> {
        panic!("no assembly expected")
    }
}

#[test]
fn slides_are_appended_in_order() {
    let mut deck = Slides::new(DeckOpts::default());
    deck.new_title_slide("Opening").text("by me");
    deck.new_slide(Some("Agenda ~emph{today}"));
    deck.new_slide(None);

    let slides = deck.slides();
    assert_eq!(slides.len(), 3);
    assert_eq!(slides[0].role(), SlideRole::Title);
    assert_eq!(slides[0].root().children().count(), 1);
    assert_eq!(slides[1].title(), Some("Agenda ~emph{today}"));
    assert_eq!(slides[1].title_tokens().map(<[Token]>::len), Some(4));
    assert_eq!(slides[2].title_tokens(), None);
    assert_eq!(slides[2].root().role(), BoxRole::Main);
}

#[test]
fn slide_step_count_comes_from_its_tree() {
    let mut deck = Slides::new(DeckOpts::default());
    let root = deck.new_slide(None);
    root.text("a");
    assert_eq!(deck.slides()[0].max_step(), 1);

    let root = deck.new_slide(None);
    root.list().item().text("later").show(3u32..=4).unwrap();
    assert_eq!(deck.slides()[1].max_step(), 4);
}

#[test]
fn slide_themes_fall_back_to_the_document_theme() {
    let mut deck = Slides::new(DeckOpts::default()).with_theme(Theme::blue());
    deck.new_slide(None);
    deck.new_slide_with_theme(None, Theme::teal());
    let slides = deck.slides();
    assert_eq!(deck.theme_for(&slides[0]), &Theme::blue());
    assert_eq!(deck.theme_for(&slides[1]), &Theme::teal());
}

#[test]
fn title_slides_can_carry_their_own_theme() {
    let mut deck = Slides::new(DeckOpts::default()).with_theme(Theme::blue());
    deck.new_title_slide_with_theme("Opening", Theme::teal()).text("by me");
    let slide = &deck.slides()[0];
    assert_eq!(slide.role(), SlideRole::Title);
    assert_eq!(slide.title(), Some("Opening"));
    assert_eq!(deck.theme_for(slide), &Theme::teal());
}

#[test]
fn user_styles_overlay_theme_styles() {
    let mut deck = Slides::new(DeckOpts::default());
    deck.set_style("default", TextStyle::new().align(Align::Left));
    deck.set_style("big", TextStyle::new().size(90.0));
    let table = deck.theme().style_table(deck.user_styles());
    assert_eq!(table["default"].alignment(), Align::Left);
    assert_eq!(table["big"].font_size(), 90.0);
    assert!(table.contains_key("emph"));
}

#[test]
fn rendering_an_empty_deck_fails_before_any_work() {
    let tools = BuildTools::new(Arc::new(Unused), Arc::new(Unused), Arc::new(Unused));
    let deck = Slides::new(DeckOpts::default());
    assert!(matches!(
        deck.render(&tools),
        Err(DeckError::Construction(_))
    ));
}
