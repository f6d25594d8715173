use crate::deck::opts::DeckOpts;
use crate::deck::pipeline::{BuildStats, build_deck};
use crate::element::container::{BoxNode, BoxRole};
use crate::foundation::core::Step;
use crate::foundation::error::DeckResult;
use crate::render::body::SlideRole;
use crate::style::text_style::TextStyle;
use crate::style::theme::{StyleTable, Theme};
use crate::text::markup::{Token, parse_markup};
use crate::tools::BuildTools;

/// One slide: chrome settings plus the root box of its element tree.
#[derive(Debug)]
pub struct Slide {
    title: Option<String>,
    title_tokens: Option<Vec<Token>>,
    role: SlideRole,
    theme: Option<Theme>,
    root: BoxNode,
}

impl Slide {
    fn new(title: Option<&str>, role: SlideRole, theme: Option<Theme>) -> Self {
        Self {
            title: title.map(str::to_string),
            title_tokens: title.map(parse_markup),
            role,
            theme,
            root: BoxNode::new(BoxRole::Main),
        }
    }

    /// Title source, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Parsed title.
    pub fn title_tokens(&self) -> Option<&[Token]> {
        self.title_tokens.as_deref()
    }

    /// Chrome role.
    pub fn role(&self) -> SlideRole {
        self.role
    }

    /// Slide-specific theme, if one was given.
    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    /// Root box.
    pub fn root(&self) -> &BoxNode {
        &self.root
    }

    /// Root box, for adding content.
    pub fn root_mut(&mut self) -> &mut BoxNode {
        &mut self.root
    }

    /// Number of pages the slide renders.
    pub fn max_step(&self) -> Step {
        self.root.max_step()
    }
}

/// A slide deck: ordered slides, a document theme, user styles and build options.
///
/// ```no_run
/// use stepdeck::{BuildTools, DeckOpts, Element, Slides};
///
/// # fn main() -> stepdeck::DeckResult<()> {
/// let mut deck = Slides::new(DeckOpts::new("talk.pdf"));
/// let slide = deck.new_slide(Some("Hello"));
/// slide.text("First ~emph{point}");
/// slide.text("Second point").show(2u32)?;
/// deck.render(&BuildTools::inkscape())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Slides {
    opts: DeckOpts,
    theme: Theme,
    user_styles: StyleTable,
    slides: Vec<Slide>,
}

impl Slides {
    /// Empty deck with the default theme.
    pub fn new(opts: DeckOpts) -> Self {
        Self {
            opts,
            theme: Theme::default(),
            user_styles: StyleTable::new(),
            slides: Vec::new(),
        }
    }

    /// Replace the document theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Build options.
    pub fn opts(&self) -> &DeckOpts {
        &self.opts
    }

    /// Document theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Slides in order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Append a slide with an optional header title and return its root box.
    pub fn new_slide(&mut self, title: Option<&str>) -> &mut BoxNode {
        self.push(Slide::new(title, SlideRole::Normal, None))
    }

    /// Append a slide drawn with its own theme.
    pub fn new_slide_with_theme(&mut self, title: Option<&str>, theme: Theme) -> &mut BoxNode {
        self.push(Slide::new(title, SlideRole::Normal, Some(theme)))
    }

    /// Append a title slide (large centered title band) and return its root box.
    pub fn new_title_slide(&mut self, title: &str) -> &mut BoxNode {
        self.push(Slide::new(Some(title), SlideRole::Title, None))
    }

    /// Append a title slide drawn with its own theme.
    pub fn new_title_slide_with_theme(&mut self, title: &str, theme: Theme) -> &mut BoxNode {
        self.push(Slide::new(Some(title), SlideRole::Title, Some(theme)))
    }

    /// Define or replace a named style for every slide. Markup and roles may refer to it.
    pub fn set_style(&mut self, name: impl Into<String>, style: TextStyle) {
        self.user_styles.insert(name.into(), style);
    }

    /// User-defined styles.
    pub fn user_styles(&self) -> &StyleTable {
        &self.user_styles
    }

    /// Theme a slide is drawn with.
    pub fn theme_for<'a>(&'a self, slide: &'a Slide) -> &'a Theme {
        slide.theme().unwrap_or(&self.theme)
    }

    /// Build the deck: measure, render every step of every slide, composite and assemble.
    pub fn render(&self, tools: &BuildTools) -> DeckResult<BuildStats> {
        build_deck(self, tools)
    }

    fn push(&mut self, slide: Slide) -> &mut BoxNode {
        self.slides.push(slide);
        let last = self.slides.len() - 1;
        self.slides[last].root_mut()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/slides.rs"]
mod tests;
