//! imforge designer: the editable model behind an immediate-mode UI designer.
//!
//! A design is a [`TopWindow`] holding a tree of [`Widget`]s. Every widget
//! exposes typed property holders that can be edited as text, read from and
//! written to host source, scaled and renamed. A headless [`Canvas`] stands
//! in for the toolkit when the tree is laid out, so geometry can be computed
//! without a renderer.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`property`] | `PropertyValue`, value holders, literal types, flag tables |
//! | [`widget`] | `Widget`, `WidgetKind` and the per-kind payloads |
//! | [`window`] | `TopWindow`, the root of a design |
//! | [`node`] | `UiNode` tree operations, `Geometry`, `UserCode` |
//! | [`canvas`] | `Canvas` trait, `HeadlessCanvas`, `Style` |
//! | [`layout`] | `layout_window` and the per-widget `Layout` record |
//! | [`snap`] | drag/resize with edge snapping, hit testing |
//! | [`serialize`] | `export_window` / `import_window` |
//! | [`context`] | `UiContext`, `NodeId` |
//! | [`config`] | `DesignerConfig`, `ImportPolicy` |
//!
//! # Quick start
//!
//! ```rust
//! use imforge_core::coords::Vec2;
//! use imforge_designer::{export_window, import_window, layout_window};
//! use imforge_designer::{HeadlessCanvas, TopWindow, UiContext, UiNode, Widget};
//!
//! let mut ctx = UiContext::default();
//! let mut ok = Widget::create("Button", &mut ctx).unwrap();
//! ok.set("label", "OK").unwrap();
//! let mut win = TopWindow::new(&mut ctx).with_child(ok);
//!
//! layout_window(&mut win, &mut HeadlessCanvas::new(Vec2::new(800.0, 600.0))).unwrap();
//! assert!(win.children()[0].cached_rect().is_some());
//!
//! let src = export_window(&win, &ctx.config);
//! let back = import_window(&src, &mut ctx).unwrap();
//! assert_eq!(back, win);
//! ```

pub mod canvas;
pub mod config;
pub mod context;
pub mod layout;
pub mod node;
pub mod property;
pub mod serialize;
pub mod snap;
pub mod widget;
pub mod window;

pub use canvas::{Canvas, HeadlessCanvas, Resolved, Style, StyleVar};
pub use config::{DesignerConfig, ImportPolicy};
pub use context::{NodeId, UiContext};
pub use layout::{layout_window, GeometryError, Layout, LayoutFlags};
pub use node::{Behavior, Geometry, UiNode, UserCode};
pub use property::{PropertyEditor, PropertyValue, ValueError};
pub use serialize::{export_window, import_window, ImportError, ImportErrorKind};
pub use snap::{clip_rect, hit_test, move_widget, resize_widget, snap_value, DragOutcome, Edge, RejectReason};
pub use widget::{Widget, WidgetKind};
pub use window::TopWindow;
