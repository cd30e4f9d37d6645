use log::debug;

use super::NavigationController;
use crate::host::{HostHandle, PopMode};
use crate::node::NodeTag;

impl NavigationController {
    /// Resolve a back press. False means nothing handled it and the caller
    /// should fall back to its own default behaviour.
    pub fn on_back_pressed(&mut self) -> bool {
        let Some(host) = self.active_host() else {
            debug!("onBackPressed fail due to no active host");
            return false;
        };
        if !host.borrow().is_ready() {
            debug!("onBackPressed fail due to {} not ready", host.borrow().container_tag());
            return false;
        }

        if let Some(handled) = self.back_in_tabs() {
            return handled;
        }

        let current = host.borrow().current_node();
        let Some(current) = current else {
            debug!("onBackPressed fail due to empty root stack");
            return false;
        };

        if current.borrow_mut().on_back_intercept() {
            debug!("Back press intercepted by {}", current.borrow().tag());
            return true;
        }

        if host.borrow().depth() == 1 {
            if !self.config.exit_on_last_screen {
                return false;
            }
            debug!("Last screen, exiting to home");
            host.borrow_mut().exit_to_home();
            return true;
        }

        let tag = current.borrow().tag().clone();
        match self.previous_tag(&tag).cloned() {
            Some(previous) => self.pop_to_tag(&host, &previous),
            None => {
                debug!("onBackPressed fail due to {} having no back-link", tag);
                false
            }
        }
    }

    /// Back handling inside the current tab. `None` when tabs had nothing
    /// to do and the root host should be asked instead.
    fn back_in_tabs(&mut self) -> Option<bool> {
        let container = self.tabs.current_container()?;

        let child = container.borrow().current_node();
        if let Some(child) = &child {
            if child.borrow_mut().on_back_intercept() {
                debug!("Back press intercepted by {}", child.borrow().tag());
                return Some(true);
            }
        }

        if container.borrow().depth() > 1 {
            let previous = child.and_then(|child| {
                let tag = child.borrow().tag().clone();
                self.previous_tag(&tag).cloned()
            });
            if let Some(previous) = previous {
                if self.pop_to_tag(&container, &previous) {
                    return Some(true);
                }
            }
        }

        let home = self.config.home_tab;
        if self.tabs.current_tab_index() != Some(home) && self.tabs.switch_to(home) {
            debug!("Back press switched to home tab {}", home);
            return Some(true);
        }

        None
    }

    /// The already selected tab was tapped again.
    ///
    /// The container's current child may consume the tap; otherwise the
    /// container is popped back to its root child.
    pub fn on_tab_reselected(&mut self) -> bool {
        let Some(container) = self.tabs.current_container() else {
            debug!("onTabReselected fail due to no current tab container");
            return false;
        };

        let child = container.borrow().current_node();
        if let Some(child) = child {
            if child.borrow_mut().on_tab_clicked() {
                return true;
            }
        }

        if container.borrow().depth() <= 1 {
            return false;
        }

        let root_child = root_child_of(&container);
        match root_child {
            Some(root) => {
                debug!("Tab reselected, popping to root child {}", root);
                self.pop_host(&container, Some(&root), PopMode::Exclusive);
                true
            }
            None => false,
        }
    }
}

fn root_child_of(container: &HostHandle) -> Option<NodeTag> {
    let bottom = container.borrow().back_stack().into_iter().next()?;
    let tag = bottom.borrow().tag().clone();
    Some(tag)
}
