//! Declarative stack and tab navigation on top of native back-stack hosts
//!
//! The [`NavigationController`] decides where every shown node lands, what
//! its back-link is, when single-instance kinds are replaced and when
//! node-scoped models are reclaimed. Hosts and nodes are reached only through
//! the [`Host`] and [`Node`] capability traits.

pub mod config;
pub mod dialog;
pub mod error;
pub mod host;
pub mod models;
pub mod navigation;
pub mod node;
pub mod tabs;

pub use config::{Config, NavigatorConfig};
pub use dialog::{Dialog, DialogController, DialogState};
pub use error::NavError;
pub use host::{Host, HostHandle, HostLifecycle, PopMode, SlotId, StackHost, MAIN_HOST_TAG};
pub use models::{ModelMap, ModelStore};
pub use navigation::{BackLink, NavigationController, NodeLookup, ShowOptions, ShowOutcome};
pub use node::{Node, NodeCore, NodeHandle, NodeKind, NodeTag, SavedNode, TabAffinity};
pub use tabs::{TabRouter, TabsHandle, TabsNavigator};
