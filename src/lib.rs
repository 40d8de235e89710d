//! # placard
//!
//! An embeddable rich-text rendering engine for a bounded HTML subset.
//!
//! placard parses arbitrary, possibly malformed markup into an immutable
//! document tree and draws it into a fixed viewport supplied by a host
//! windowing layer: mixed inline/block flow with word wrapping, bullet and
//! ordinal lists, callout boxes, tables with two-pass column sizing,
//! preformatted code, hyperlink hit-testing and scrolling. There is no
//! browser runtime underneath; the host provides raster and font primitives
//! through the [`host::Painter`] and [`host::FontLoader`] traits.
//!
//! ## Module structure
//!
//! - `parser`: character-level state machine producing a [`dom::Document`]
//! - `dom`: the normalized node tree with block/inline context tags
//! - `render`: per-element handlers plus the dispatching [`render::Renderer`]
//! - `fonts`: shared font store and text measurement cache
//! - `widget`: the public facade owning document, renderer and viewport
//!
//! ## Usage
//!
//! ```ignore
//! use placard::{FrameInput, HtmlWidget};
//! use std::sync::Arc;
//!
//! let mut widget = HtmlWidget::new("<h1>Hello</h1><p>World</p>", loader);
//! widget.on_link_click = Some(Box::new(|url| open_browser(url)));
//!
//! // Per frame, from the host loop:
//! widget.update(&input, &mut painter);
//! widget.render(&mut painter, 0.0, 0.0, 800.0, 650.0);
//! ```

pub mod dom;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod host;
pub mod parser;
pub mod render;
pub mod widget;

pub use dom::{Document, Node, NodeContext, NodeKind};
pub use error::FontError;
pub use fonts::{FontHandle, FontSet, TextMeasureCache};
pub use geometry::{Color, Point, Rect, Size};
pub use host::{CursorIcon, FontLoader, FrameInput, Painter, RawFont};
pub use parser::{parse, StateMachineParser};
pub use render::{BodyChrome, Frame, LinkRegion, RenderContext, RenderHandler, RenderResult, Renderer};
pub use widget::HtmlWidget;
