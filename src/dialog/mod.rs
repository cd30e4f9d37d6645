//! Modal overlays with a request/result callback contract
//!
//! Dialogs share the node identity scheme but sit outside the back-link
//! graph. A dialog may name a target node and a request code; when it is
//! dismissed with a result code, the target (looked up live by tag) gets
//! `on_dialog_result`.

mod state;

pub use state::DialogState;

use log::debug;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

use crate::error::{log_dropped, NavError};
use crate::host::{Host, HostHandle};
use crate::models::ModelMap;
use crate::navigation::NodeLookup;
use crate::node::{NodeKind, NodeTag};

/// A dialog instance
pub struct Dialog {
    kind: &'static NodeKind,
    tag: NodeTag,
    state: DialogState,
    request_code: Option<i32>,
    result_code: Option<i32>,
    target: Option<NodeTag>,
    data: ModelMap,
    host: Option<Weak<RefCell<dyn Host>>>,
}

impl Dialog {
    pub fn new(kind: &'static NodeKind) -> Self {
        Self {
            kind,
            tag: NodeTag::generate(kind.name),
            state: DialogState::default(),
            request_code: None,
            result_code: None,
            target: None,
            data: ModelMap::new(),
            host: None,
        }
    }

    /// Deliver the result to `target` under `request_code` on dismissal
    pub fn with_target(mut self, target: &NodeTag, request_code: i32) -> Self {
        self.target = Some(target.clone());
        self.request_code = Some(request_code);
        self
    }

    pub fn kind(&self) -> &'static NodeKind {
        self.kind
    }

    pub fn tag(&self) -> &NodeTag {
        &self.tag
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn request_code(&self) -> Option<i32> {
        self.request_code
    }

    pub fn result_code(&self) -> Option<i32> {
        self.result_code
    }

    pub fn target(&self) -> Option<&NodeTag> {
        self.target.as_ref()
    }

    pub fn data(&self) -> &ModelMap {
        &self.data
    }

    fn host(&self) -> Option<HostHandle> {
        self.host.as_ref()?.upgrade()
    }
}

/// Tracks shown dialogs and delivers their results
#[derive(Default)]
pub struct DialogController {
    dialogs: HashMap<NodeTag, Dialog>,
    pending_dismiss: HashSet<NodeTag>,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Present `dialog` on `host`. Returns the dialog's tag when accepted.
    pub fn show(&mut self, host: &HostHandle, mut dialog: Dialog) -> Option<NodeTag> {
        if !host.borrow().is_ready() {
            log_dropped(
                "showDialog",
                &NavError::not_ready("showDialog", host.borrow().container_tag()),
            );
            return None;
        }

        let tag = dialog.tag.clone();
        debug!("Showing dialog {} on {}", tag, host.borrow().container_tag());
        dialog.host = Some(Rc::downgrade(host));
        host.borrow_mut().present_dialog(&tag);
        self.dialogs.insert(tag.clone(), dialog);
        Some(tag)
    }

    pub fn dialog(&self, tag: &NodeTag) -> Option<&Dialog> {
        self.dialogs.get(tag)
    }

    pub fn state(&self, tag: &NodeTag) -> Option<DialogState> {
        self.dialogs.get(tag).map(|dialog| dialog.state)
    }

    pub fn is_dismiss_pending(&self, tag: &NodeTag) -> bool {
        self.pending_dismiss.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    /// Point an already shown dialog at a target node
    pub fn set_target(&mut self, tag: &NodeTag, target: &NodeTag, request_code: i32) {
        match self.dialogs.get_mut(tag) {
            Some(dialog) => {
                dialog.target = Some(target.clone());
                dialog.request_code = Some(request_code);
            }
            None => log_dropped("setTarget", &NavError::not_found(tag.as_str(), "dialogs")),
        }
    }

    /// Record the result delivered on dismissal
    pub fn set_result(&mut self, tag: &NodeTag, result_code: i32, data: ModelMap) {
        match self.dialogs.get_mut(tag) {
            Some(dialog) => {
                dialog.result_code = Some(result_code);
                dialog.data = data;
            }
            None => log_dropped("setResult", &NavError::not_found(tag.as_str(), "dialogs")),
        }
    }

    /// Add one serialisable entry to the result data
    pub fn put_result_data<T: Serialize>(&mut self, tag: &NodeTag, key: &str, value: &T) {
        let Some(dialog) = self.dialogs.get_mut(tag) else {
            log_dropped("putResultData", &NavError::not_found(tag.as_str(), "dialogs"));
            return;
        };
        match serde_json::to_value(value) {
            Ok(value) => {
                dialog.data.insert(key.to_string(), value);
            }
            Err(e) => log::warn!("Dropping result data '{}' for {}: {}", key, tag, e),
        }
    }

    pub fn on_attach(&mut self, tag: &NodeTag, lookup: &dyn NodeLookup) {
        self.transition(tag, DialogState::Attached, lookup);
    }

    pub fn on_resume(&mut self, tag: &NodeTag, lookup: &dyn NodeLookup) {
        self.transition(tag, DialogState::Resumed, lookup);
    }

    pub fn on_pause(&mut self, tag: &NodeTag, lookup: &dyn NodeLookup) {
        self.transition(tag, DialogState::Paused, lookup);
    }

    /// The overlay went away on its own; no result is delivered
    pub fn on_detach(&mut self, tag: &NodeTag) {
        if let Some(dialog) = self.dialogs.remove(tag) {
            debug!("Dialog {} detached in state {}", tag, dialog.state);
        }
        self.pending_dismiss.remove(tag);
    }

    fn transition(&mut self, tag: &NodeTag, next: DialogState, lookup: &dyn NodeLookup) {
        let Some(dialog) = self.dialogs.get_mut(tag) else {
            log_dropped("dialogLifecycle", &NavError::not_found(tag.as_str(), "dialogs"));
            return;
        };
        if !dialog.state.can_move_to(next) {
            log_dropped(
                "dialogLifecycle",
                &NavError::InvalidArgument(format!("{} cannot move from {} to {}", tag, dialog.state, next)),
            );
            return;
        }
        dialog.state = next;

        if next.is_operation_ready() && self.pending_dismiss.remove(tag) {
            debug!("Retrying pending dismiss of {}", tag);
            self.dismiss(tag, lookup);
        }
    }

    /// Dismiss a dialog, delivering its result if it is complete.
    ///
    /// Deferred until the dialog next becomes ready if it is not ready now.
    pub fn dismiss(&mut self, tag: &NodeTag, lookup: &dyn NodeLookup) {
        let ready = match self.dialogs.get(tag) {
            Some(dialog) => dialog.state.is_operation_ready(),
            None => {
                log_dropped("dismiss", &NavError::not_found(tag.as_str(), "dialogs"));
                return;
            }
        };
        if !ready {
            debug!("dismiss of {} deferred until ready", tag);
            self.pending_dismiss.insert(tag.clone());
            return;
        }

        let Some(mut dialog) = self.dialogs.remove(tag) else {
            return;
        };
        if let Some(host) = dialog.host() {
            host.borrow_mut().remove_dialog(tag);
        }
        dialog.state = DialogState::Detached;

        let (Some(request_code), Some(result_code), Some(target)) =
            (dialog.request_code, dialog.result_code, dialog.target.as_ref())
        else {
            return;
        };

        match lookup.find_node(target) {
            Some(node) => {
                debug!("Delivering result {} of {} to {}", result_code, tag, target);
                node.borrow_mut()
                    .on_dialog_result(request_code, result_code, &dialog.data);
            }
            None => debug!("Result of {} dropped: target {} is gone", tag, target),
        }
    }
}
