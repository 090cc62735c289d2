//! Watchpoint pool.
//!
//! A fixed array of slots threaded onto two singly linked lists by index: the free
//! list and the active list. Allocation moves the free head to the active head;
//! release splices a slot out of the active list and back onto the free head. Slot
//! numbers double as the user-visible watchpoint numbers.

use crate::common::constants::NR_WP;
use crate::common::error::WatchpointError;
use crate::debugger::expr::{ExprContext, evaluate};

/// One watchpoint slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Watchpoint {
    id: usize,
    next: Option<usize>,
    /// Expression text.
    pub expr: String,
    /// Value seen at the last evaluation.
    pub value: u64,
}

impl Watchpoint {
    /// Watchpoint number.
    pub const fn id(&self) -> usize {
        self.id
    }
}

/// A value change observed while polling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchReport {
    /// Watchpoint number.
    pub id: usize,
    /// Expression text.
    pub expr: String,
    /// Previously cached value.
    pub old: u64,
    /// Freshly evaluated value.
    pub new: u64,
}

/// Fixed-capacity watchpoint pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchpointPool {
    slots: Vec<Watchpoint>,
    head: Option<usize>,
    free: Option<usize>,
}

impl Default for WatchpointPool {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchpointPool {
    /// Creates a pool of [`NR_WP`] free slots.
    pub fn new() -> Self {
        Self::with_capacity(NR_WP)
    }

    /// Creates a pool of `n` free slots.
    pub fn with_capacity(n: usize) -> Self {
        let slots = (0..n)
            .map(|id| Watchpoint {
                id,
                next: (id + 1 < n).then_some(id + 1),
                ..Watchpoint::default()
            })
            .collect();
        Self {
            slots,
            head: None,
            free: (n > 0).then_some(0),
        }
    }

    /// Takes a free slot, clears it and makes it active.
    ///
    /// # Errors
    ///
    /// [`WatchpointError::PoolExhausted`] when every slot is active.
    pub fn allocate(&mut self) -> Result<&mut Watchpoint, WatchpointError> {
        let idx = self.free.ok_or(WatchpointError::PoolExhausted)?;
        self.free = self.slots[idx].next;
        self.slots[idx] = Watchpoint {
            id: idx,
            next: self.head,
            ..Watchpoint::default()
        };
        self.head = Some(idx);
        Ok(&mut self.slots[idx])
    }

    /// Allocates a watchpoint on `expr` whose current value is `value`; returns its number.
    ///
    /// # Errors
    ///
    /// [`WatchpointError::PoolExhausted`] when every slot is active.
    pub fn create(&mut self, expr: &str, value: u64) -> Result<usize, WatchpointError> {
        let wp = self.allocate()?;
        wp.expr = expr.to_owned();
        wp.value = value;
        Ok(wp.id)
    }

    /// Deactivates watchpoint `id` and returns its expression.
    ///
    /// # Errors
    ///
    /// [`WatchpointError::NotFound`] if no active watchpoint has that number.
    pub fn release(&mut self, id: usize) -> Result<String, WatchpointError> {
        let mut prev: Option<usize> = None;
        let mut cur = self.head;
        while let Some(idx) = cur {
            if idx == id {
                break;
            }
            prev = cur;
            cur = self.slots[idx].next;
        }
        let idx = cur.ok_or(WatchpointError::NotFound(id))?;

        let next = self.slots[idx].next;
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        self.slots[idx].next = self.free;
        self.free = Some(idx);
        Ok(std::mem::take(&mut self.slots[idx].expr))
    }

    /// The active watchpoint numbered `id`.
    pub fn find(&self, id: usize) -> Option<&Watchpoint> {
        self.iter().find(|wp| wp.id == id)
    }

    /// Active watchpoints, most recently created first.
    pub fn iter(&self) -> impl Iterator<Item = &Watchpoint> {
        std::iter::successors(self.head.map(|i| &self.slots[i]), |wp| {
            wp.next.map(|i| &self.slots[i])
        })
    }

    /// Whether no watchpoint is active.
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Re-evaluates every active watchpoint and reports those whose value changed.
    ///
    /// A watchpoint whose expression fails to evaluate keeps its cached value.
    pub fn poll(&mut self, ctx: &dyn ExprContext) -> Vec<WatchReport> {
        let mut reports = Vec::new();
        let mut cur = self.head;
        while let Some(idx) = cur {
            let wp = &mut self.slots[idx];
            cur = wp.next;
            let Ok(new) = evaluate(&wp.expr, ctx) else {
                continue;
            };
            if new != wp.value {
                reports.push(WatchReport {
                    id: wp.id,
                    expr: wp.expr.clone(),
                    old: wp.value,
                    new,
                });
                wp.value = new;
            }
        }
        reports
    }
}
