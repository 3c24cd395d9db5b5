// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable destination table injected at construction.
//!
//! Built once from configuration at startup; nothing reads routing
//! data from ambient global state.

/// One destination a request can be routed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub name: String,
    pub chat_id: i64,
    pub email: Option<String>,
}

/// The configured branch destinations plus the head-office catch-all.
#[derive(Debug, Clone)]
pub struct Destinations {
    branches: Vec<Destination>,
    head_office: Destination,
}

impl Destinations {
    pub fn new(branches: Vec<Destination>, head_office: Destination) -> Self {
        Self {
            branches,
            head_office,
        }
    }

    /// All destination names a client may choose, head office last.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.branches.iter().map(|b| b.name.as_str()).collect();
        names.push(self.head_office.name.as_str());
        names
    }

    /// Whether `name` is a valid destination choice.
    pub fn contains(&self, name: &str) -> bool {
        name == self.head_office.name || self.branches.iter().any(|b| b.name == name)
    }

    pub fn head_office(&self) -> &Destination {
        &self.head_office
    }

    pub fn is_head_office(&self, name: &str) -> bool {
        name == self.head_office.name
    }

    /// Resolve the staff targets for a request's branch.
    ///
    /// The primary target is the branch's channel when one is
    /// registered, else head office. The copy is head office unless the
    /// primary already IS head office (no double-send).
    pub fn targets_for(&self, branch: Option<&str>) -> (&Destination, Option<&Destination>) {
        let primary = branch
            .and_then(|name| self.branches.iter().find(|b| b.name == name))
            .unwrap_or(&self.head_office);
        if primary.chat_id == self.head_office.chat_id {
            (primary, None)
        } else {
            (primary, Some(&self.head_office))
        }
    }

    /// Whether the chat id belongs to the static staff allow-list.
    pub fn is_staff_chat(&self, chat_id: i64) -> bool {
        chat_id == self.head_office.chat_id || self.branches.iter().any(|b| b.chat_id == chat_id)
    }
}
