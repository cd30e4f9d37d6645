//! Navigation across parallel tab containers
//!
//! The router holds a non-owning handle to whatever owns the tab widget and a
//! FIFO of show requests waiting for a tab switch to finish. The queue is not
//! flushed by [`TabRouter::switch_to`]: the switch may complete later, so the
//! flush is driven by the target container reporting it is ready.

use log::debug;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::host::HostHandle;
use crate::navigation::ShowOptions;
use crate::node::{NodeHandle, TabAffinity};

/// Capability contract of a tab widget owner
pub trait TabsNavigator {
    fn current_tab_index(&self) -> usize;

    fn tab_count(&self) -> usize;

    /// Host of the container shown in the current tab
    fn current_container(&self) -> Option<HostHandle>;

    fn is_tab_index_valid(&self, index: usize) -> bool {
        index < self.tab_count()
    }

    /// Start switching the visible tab. May complete asynchronously.
    fn switch_to_tab(&mut self, index: usize);

    /// Rebuild the tab set
    fn repopulate_tabs(&mut self) {}
}

/// Shared handle to a tab navigator
pub type TabsHandle = Rc<RefCell<dyn TabsNavigator>>;

/// A show request deferred until its tab is current
pub struct PendingShow {
    pub node: NodeHandle,
    pub options: ShowOptions,
}

/// Where a tab-affine request should go
pub enum TabRoute {
    /// Deliver now into the current tab's container
    Current(HostHandle),

    /// Queue and switch to this tab first
    Deferred(usize),

    /// No navigator or no current container
    Unavailable,
}

#[derive(Default)]
pub struct TabRouter {
    navigator: Option<Weak<RefCell<dyn TabsNavigator>>>,
    pending: VecDeque<PendingShow>,
}

impl TabRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, navigator: &TabsHandle) {
        self.navigator = Some(Rc::downgrade(navigator));
    }

    pub fn unregister(&mut self) {
        self.navigator = None;
    }

    /// The navigator, if registered and still alive
    pub fn navigator(&self) -> Option<TabsHandle> {
        self.navigator.as_ref()?.upgrade()
    }

    pub fn is_registered(&self) -> bool {
        self.navigator().is_some()
    }

    pub fn is_tab_index_valid(&self, index: usize) -> bool {
        self.navigator()
            .map(|nav| nav.borrow().is_tab_index_valid(index))
            .unwrap_or(false)
    }

    pub fn current_tab_index(&self) -> Option<usize> {
        self.navigator().map(|nav| nav.borrow().current_tab_index())
    }

    pub fn current_container(&self) -> Option<HostHandle> {
        let navigator = self.navigator()?;
        let container = navigator.borrow().current_container();
        container
    }

    /// Ask the navigator to switch tabs. Invalid indexes are ignored.
    pub fn switch_to(&self, index: usize) -> bool {
        let Some(navigator) = self.navigator() else {
            debug!("switchTo fail due to no tabs navigator registered");
            return false;
        };
        if !navigator.borrow().is_tab_index_valid(index) {
            debug!("switchTo fail due to invalid tab index {}", index);
            return false;
        }
        navigator.borrow_mut().switch_to_tab(index);
        true
    }

    pub fn repopulate(&self) {
        if let Some(navigator) = self.navigator() {
            navigator.borrow_mut().repopulate_tabs();
        }
    }

    /// Decide where a request with `affinity` goes
    pub fn route(&self, affinity: TabAffinity) -> TabRoute {
        let Some(navigator) = self.navigator() else {
            return TabRoute::Unavailable;
        };
        let navigator = navigator.borrow();
        let current = navigator.current_tab_index();

        match affinity {
            TabAffinity::Tab(index) if index != current && navigator.is_tab_index_valid(index) => {
                TabRoute::Deferred(index)
            }
            _ => match navigator.current_container() {
                Some(host) => TabRoute::Current(host),
                None => TabRoute::Unavailable,
            },
        }
    }

    pub fn enqueue(&mut self, pending: PendingShow) {
        self.pending.push_back(pending);
    }

    /// Take every queued request in enqueue order
    pub fn take_pending(&mut self) -> Vec<PendingShow> {
        self.pending.drain(..).collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
