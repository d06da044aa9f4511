//! HTML post-processing: converter output → Tufte CSS markup.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    TransformChain::standard()                │
//! │  subtitle → code → cite → blockquote → figure → fullwidth    │
//! │           → sidenote → table-wrapper                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each pass is a [`Transform`] over one mutable [`Document`]. Passes run
//! strictly in order: later passes rely on the shape produced by earlier
//! ones (figure paragraphs are unwrapped before footnote anchors inside them
//! are replaced, fullwidth markers are consumed before tables are wrapped).
//!
//! The first failing pass aborts the page; nothing is rendered.

mod error;
pub mod transform;

pub use error::TransformError;
pub use transform::{
    BlockquoteFooters, CitationSpans, CodeListings, FigureDenest, FullwidthTables,
    SidenoteConverter, SubtitleNormalizer, TableWrappers,
};

use crate::debug;
use crate::dom::{self, Document};

/// One self-contained rewrite rule.
pub trait Transform: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Rewrite the document in place.
    fn apply(&self, doc: &mut Document) -> Result<(), TransformError>;
}

/// Ordered list of passes applied to a single document.
#[derive(Default)]
pub struct TransformChain {
    passes: Vec<Box<dyn Transform>>,
}

impl TransformChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full Tufte post-processing chain, in dependency order.
    pub fn standard() -> Self {
        Self::new()
            .pipe(SubtitleNormalizer)
            .pipe(CodeListings)
            .pipe(CitationSpans)
            .pipe(BlockquoteFooters)
            .pipe(FigureDenest)
            .pipe(FullwidthTables)
            .pipe(SidenoteConverter)
            .pipe(TableWrappers)
    }

    /// Append a pass.
    pub fn pipe(mut self, pass: impl Transform + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Pass names, in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Apply every pass in order, stopping at the first fault.
    pub fn run(&self, doc: &mut Document) -> Result<(), TransformError> {
        for pass in &self.passes {
            debug!("transform"; "{}", pass.name());
            pass.apply(doc)?;
        }
        Ok(())
    }

    /// Parse `html`, run the chain, render the result.
    pub fn process(&self, html: &str) -> Result<String, TransformError> {
        let mut doc = dom::parse(html)?;
        self.run(&mut doc)?;
        Ok(dom::render(&doc))
    }
}
