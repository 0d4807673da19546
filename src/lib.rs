//! The library code for the `postboard` blog front-end. A page load breaks
//! down into three steps:
//!
//! 1. Loading the post manifest ([`crate::manifest`]) through a [`fetch::Fetch`]
//!    implementation, sorted newest first
//! 2. Activating the views the page shell has containers for
//! 3. Rendering the page shell template against the resulting
//!    [`dom::Document`]
//!
//! The second step is the more involved. The index view
//! ([`crate::index_view`]) renders a tag bar and a grid of post cards and
//! re-renders the grid as the reader picks tags or types into the search box;
//! the filtering itself lives in [`crate::search`]. The post view
//! ([`crate::post_view`]) resolves the post named by the location's `slug`
//! parameter (falling back to the newest post), injects its content fragment,
//! and cross-links it with its older and newer neighbours and with the posts
//! sharing its tags.
//!
//! Text from the manifest or from the reader is escaped on its way into the
//! page; post fragments are trusted. [`markup::Markup`] keeps the two apart.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod clipboard;
pub mod config;
pub mod dom;
pub mod fetch;
pub mod index_view;
pub mod manifest;
pub mod markup;
pub mod post;
pub mod post_view;
pub mod search;
pub mod theme;
mod util;
