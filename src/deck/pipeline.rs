//! The build pipeline: query discovery, query resolution, page build and assembly.
//!
//! Discovery and resolution complete (and the query cache is persisted) before any page is
//! built, since page building reads the resolved cache. Pages are rendered on the worker pool,
//! content-addressed, and only pages whose hash has no artifact on disk are composited, each
//! distinct hash exactly once.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::cache::artifacts::{ArtifactStore, ContentHash};
use crate::cache::query::{QueryCache, resolve_queries};
use crate::deck::slides::{Slide, Slides};
use crate::foundation::core::Step;
use crate::foundation::error::{DeckError, DeckResult};
use crate::layout::context::LayoutCtx;
use crate::render::body::render_slide;
use crate::scene::canvas::PageCanvas;
use crate::style::theme::StyleTable;
use crate::tools::BuildTools;
use crate::tools::composite::PageCompositor;

/// Pipeline states, logged as they are entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildPhase {
    /// Walking every slide tree for measurement queries.
    QueryDiscovery,
    /// Answering queries from the persisted cache or the measurer.
    QueryResolution,
    /// Rendering and compositing pages.
    PageBuild,
    /// Evicting stale artifacts and concatenating pages.
    Assembly,
    /// The output document was written.
    Done,
    /// A phase returned an error; the build stopped there.
    Failed,
}

impl BuildPhase {
    /// Stable name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            BuildPhase::QueryDiscovery => "query_discovery",
            BuildPhase::QueryResolution => "query_resolution",
            BuildPhase::PageBuild => "page_build",
            BuildPhase::Assembly => "assembly",
            BuildPhase::Done => "done",
            BuildPhase::Failed => "failed",
        }
    }
}

/// Counters reported by a build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Distinct measurement queries.
    pub queries_total: usize,
    /// Queries answered from the persisted cache.
    pub queries_cached: usize,
    /// Queries answered by running the measurer.
    pub queries_resolved: usize,
    /// Pages in the output document.
    pub pages_total: usize,
    /// Pages handed to the compositor (distinct, uncached content).
    pub pages_composited: usize,
    /// Pages served by an artifact already on disk or composited for an identical page.
    pub pages_reused: usize,
    /// Stale artifacts deleted from the cache directory.
    pub artifacts_evicted: usize,
}

/// One rendered page.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// Slide index (0-based).
    pub slide: usize,
    /// Step within the slide (1-based).
    pub step: Step,
    /// Canonical SVG document.
    pub svg: String,
    /// Content address of `svg`.
    pub hash: ContentHash,
}

/// Logs phase transitions and remembers the phase in progress.
#[derive(Debug, Default)]
struct PhaseLog {
    current: Option<BuildPhase>,
}

impl PhaseLog {
    fn enter(&mut self, phase: BuildPhase) {
        tracing::info!(phase = phase.as_str(), "build phase");
        self.current = Some(phase);
    }

    fn fail(&mut self, error: &DeckError) {
        let during = self.current.map_or("setup", BuildPhase::as_str);
        tracing::error!(
            phase = BuildPhase::Failed.as_str(),
            during,
            error = %error,
            "build failed"
        );
        self.current = Some(BuildPhase::Failed);
    }
}

#[tracing::instrument(skip_all, fields(slides = deck.slides().len()))]
pub(crate) fn build_deck(deck: &Slides, tools: &BuildTools) -> DeckResult<BuildStats> {
    let mut phases = PhaseLog::default();
    let result = run_build(deck, tools, &mut phases);
    if let Err(e) = &result {
        phases.fail(e);
    }
    result
}

fn run_build(deck: &Slides, tools: &BuildTools, phases: &mut PhaseLog) -> DeckResult<BuildStats> {
    if deck.slides().is_empty() {
        return Err(DeckError::construction("no slides to render"));
    }
    let opts = deck.opts();
    let pool = opts.build_thread_pool()?;
    let store = ArtifactStore::open(&opts.cache_dir, tools.compositor.extension())?;
    let tables = style_tables(deck);

    phases.enter(BuildPhase::QueryDiscovery);
    let mut queries = Vec::new();
    for (slide, styles) in deck.slides().iter().zip(&tables) {
        let ctx = LayoutCtx::for_discovery(deck.theme_for(slide), styles, &tools.measurer);
        slide.root().gather_queries(&ctx, &mut queries)?;
    }
    tracing::debug!(queries = queries.len(), "queries discovered");

    phases.enter(BuildPhase::QueryResolution);
    let cache_path = opts.query_cache_path();
    let previous = QueryCache::load(&cache_path);
    let (resolved, query_stats) = resolve_queries(queries, &previous, &pool)?;
    if let Err(e) = resolved.save(&cache_path) {
        tracing::warn!(
            path = %cache_path.display(),
            error = %e,
            "query cache could not be written"
        );
    }
    tracing::info!(
        resolved = query_stats.resolved,
        total = query_stats.total,
        "queries resolved"
    );

    phases.enter(BuildPhase::PageBuild);
    let pages = render_pages(deck, &tables, &resolved, &pool)?;
    if opts.debug {
        write_debug_pages(&pages, &opts.cache_dir)?;
    }

    let on_disk = store.cached()?;
    let mut seen = BTreeSet::new();
    let misses: Vec<&RenderedPage> = pages
        .iter()
        .filter(|p| seen.insert(p.hash) && !on_disk.contains(&p.hash))
        .collect();
    pool.install(|| {
        misses
            .par_iter()
            .try_for_each(|page| composite_page(tools.compositor.as_ref(), &store, page))
    })?;
    tracing::info!(
        rendered = pages.len(),
        composited = misses.len(),
        "pages built"
    );

    phases.enter(BuildPhase::Assembly);
    let artifacts_evicted = if opts.debug {
        0
    } else {
        store.evict_except(&seen)?
    };
    let paths: Vec<PathBuf> = pages.iter().map(|p| store.path_for(p.hash)).collect();
    tools.assembler.assemble(&paths, &opts.output)?;
    phases.enter(BuildPhase::Done);

    Ok(BuildStats {
        queries_total: query_stats.total,
        queries_cached: query_stats.cached,
        queries_resolved: query_stats.resolved,
        pages_total: pages.len(),
        pages_composited: misses.len(),
        pages_reused: pages.len() - misses.len(),
        artifacts_evicted,
    })
}

fn style_tables(deck: &Slides) -> Vec<StyleTable> {
    deck.slides()
        .iter()
        .map(|s| deck.theme_for(s).style_table(deck.user_styles()))
        .collect()
}

/// Render every step of every slide, in slide order then step order.
#[tracing::instrument(skip_all)]
fn render_pages(
    deck: &Slides,
    tables: &[StyleTable],
    queries: &QueryCache,
    pool: &rayon::ThreadPool,
) -> DeckResult<Vec<RenderedPage>> {
    let jobs: Vec<(usize, Step)> = deck
        .slides()
        .iter()
        .enumerate()
        .flat_map(|(idx, slide)| (1..=slide.max_step()).map(move |step| (idx, step)))
        .collect();
    pool.install(|| {
        jobs.par_iter()
            .map(|&(idx, step)| -> DeckResult<RenderedPage> {
                let slide = &deck.slides()[idx];
                let svg = render_page_svg(deck, slide, &tables[idx], queries, step)?;
                let hash = ContentHash::of(svg.as_bytes());
                tracing::debug!(slide = idx, step, hash = %hash, "page rendered");
                Ok(RenderedPage {
                    slide: idx,
                    step,
                    svg,
                    hash,
                })
            })
            .collect::<DeckResult<Vec<_>>>()
    })
}

/// Canonical SVG of `slide` at `step`.
pub fn render_page_svg(
    deck: &Slides,
    slide: &Slide,
    styles: &StyleTable,
    queries: &QueryCache,
    step: Step,
) -> DeckResult<String> {
    let opts = deck.opts();
    let ctx = LayoutCtx::for_render(deck.theme_for(slide), styles, queries, step);
    let mut canvas = PageCanvas::new(opts.width, opts.height);
    render_slide(&ctx, &mut canvas, slide.role(), slide.title_tokens(), slide.root())?;
    canvas.finish()
}

/// Composite one page into a temporary sibling, then move it into place so an interrupted build
/// never leaves a truncated artifact under a valid name.
fn composite_page(
    compositor: &dyn PageCompositor,
    store: &ArtifactStore,
    page: &RenderedPage,
) -> DeckResult<()> {
    let target = store.path_for(page.hash);
    let partial = store.partial_path_for(page.hash);
    tracing::debug!(hash = %page.hash, path = %target.display(), "compositing page");
    compositor.composite(&page.svg, &partial)?;
    std::fs::rename(&partial, &target).with_context(|| {
        format!(
            "failed to move '{}' to '{}'",
            partial.display(),
            target.display()
        )
    })?;
    Ok(())
}

fn write_debug_pages(pages: &[RenderedPage], dir: &Path) -> DeckResult<()> {
    for page in pages {
        let path = dir.join(format!("slide-{}-{}.svg", page.slide, page.step));
        std::fs::write(&path, &page.svg).map_err(|e| {
            DeckError::cache_io(format!("failed to write '{}': {e}", path.display()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/deck/pipeline.rs"]
mod tests;
