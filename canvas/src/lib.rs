//! Design-studio canvas core for the product customizer.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! editable design of a product: the layered text, image and symbol elements
//! placed on each printable surface, the pointer gestures that move, resize
//! and rotate them, and the serialized design attached to the cart line item.
//! The host JavaScript layer wires DOM events to the engine, paints from the
//! [`doc::DesignState`] snapshots and applies the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Browser [`engine::Engine`] and testable [`engine::EngineCore`] |
//! | [`input`] | Tools, input event types and the gesture state machine |
//! | [`store`] | Pure document transitions, commands and the per-surface store |
//! | [`doc`] | Element and design-state types |
//! | [`factory`] | Element construction and the z-index counter |
//! | [`hit`] | Hit-testing against elements and selection handles |
//! | [`surface`] | Product surfaces and print-area boundaries |
//! | [`export`] | Cart line-item serialization |
//! | [`config`] | Host-supplied studio configuration |
//! | [`geom`] | Points, rectangles, clamping and coercion |
//! | [`error`] | Crate error type |
//! | [`consts`] | Shared numeric and default-value constants |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod export;
pub mod factory;
pub mod geom;
pub mod hit;
pub mod input;
pub mod store;
pub mod surface;
