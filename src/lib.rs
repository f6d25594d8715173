//! stepdeck builds step-animated slide decks.
//!
//! A deck is an ordered list of slides; each slide owns a tree of elements (text, code, shell
//! sessions, images, boxes, lists, frames, columns). Every element carries a visibility range
//! over the slide's animation steps, and a slide renders one page per step.
//!
//! # Pipeline overview
//!
//! 1. **Query discovery**: walk every slide tree once and collect the text measurements the
//!    layout needs, keyed by style and content.
//! 2. **Query resolution**: answer queries from the persisted cache in the cache directory and
//!    run the measurer for misses on a worker pool.
//! 3. **Page build**: lay out and draw every step of every slide as an SVG page, hash it, and
//!    composite only pages whose content has no artifact on disk.
//! 4. **Assembly**: evict stale artifacts and concatenate pages in slide then step order.
//!
//! External collaborators (measurement, compositing, concatenation) sit behind traits in
//! [`tools`], with in-process (`usvg`/`resvg`) and subprocess (`inkscape`/`pdftk`)
//! implementations.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cache;
pub mod deck;
pub mod element;
pub mod foundation;
pub mod layout;
pub mod render;
pub mod scene;
pub mod style;
pub mod text;
pub mod tools;

pub use cache::query::{Measured, Query, QueryCache, QueryKey};
pub use deck::opts::DeckOpts;
pub use deck::pipeline::{BuildPhase, BuildStats};
pub use deck::slides::{Slide, Slides};
pub use element::container::{
    BoxNode, BoxRole, ColumnsNode, FrameNode, ListNode, Orientation, SeparatorNode, SpaceNode,
};
pub use element::image::ImageNode;
pub use element::node::{CustomElement, CustomNode, Element, Node, NodeBase};
pub use element::text::{LineEmphasis, LineFilter, LineSelection, TextBlock, TextKind};
pub use foundation::core::{IntoShowRange, Rect, ShowRange, SizeRequest, Step};
pub use foundation::error::{DeckError, DeckResult};
pub use layout::context::LayoutCtx;
pub use render::body::SlideRole;
pub use scene::canvas::PageCanvas;
pub use style::text_style::{Align, TextStyle};
pub use style::theme::{Metrics, Palette, StyleTable, Theme};
pub use text::highlight::{Highlighter, PlainHighlighter};
pub use text::markup::Token;
pub use tools::BuildTools;
pub use tools::composite::{DocumentAssembler, PageCompositor};
pub use tools::measure::TextMeasurer;
