//! Headless animation driver
//!
//! Records every call and keeps started animations pending until
//! [`RecordingDriver::finish_all`] runs them to completion. Instant sets are
//! also stored per node so the current visual state can be inspected.

use super::{AnimationDriver, AnimationId, Completion, PropertyMap, Tween};
use crate::error::AnimationError;
use std::collections::HashMap;
use std::hash::Hash;

/// One call received by the driver
#[derive(Clone, Debug, PartialEq)]
pub enum DriverCall<N> {
    Animate { id: AnimationId, targets: Vec<N>, tween: Tween },
    Set { targets: Vec<N>, values: PropertyMap },
    Cancel { targets: Vec<N> },
}

struct Pending<N> {
    id: AnimationId,
    targets: Vec<N>,
    props: PropertyMap,
    on_complete: Completion,
}

pub struct RecordingDriver<N> {
    pub calls: Vec<DriverCall<N>>,
    pending: Vec<Pending<N>>,
    state: HashMap<N, PropertyMap>,
    next_id: AnimationId,
}

impl<N: Clone + Eq + Hash> RecordingDriver<N> {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            pending: Vec::new(),
            state: HashMap::new(),
            next_id: 1,
        }
    }

    /// Ids of animations that are still running
    pub fn running(&self) -> Vec<AnimationId> {
        self.pending.iter().map(|p| p.id).collect()
    }

    /// Current property values of `node`
    pub fn values(&self, node: &N) -> PropertyMap {
        self.state.get(node).cloned().unwrap_or_default()
    }

    /// Complete every running animation, applying its final values
    pub fn finish_all(&mut self) {
        for pending in std::mem::take(&mut self.pending) {
            self.apply(&pending.targets, &pending.props);
            (pending.on_complete)();
        }
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn apply(&mut self, targets: &[N], values: &PropertyMap) {
        for target in targets {
            let entry = self.state.entry(target.clone()).or_default();
            entry.extend(values.iter().map(|(k, v)| (k.clone(), *v)));
        }
    }
}

impl<N: Clone + Eq + Hash> Default for RecordingDriver<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Clone + Eq + Hash> AnimationDriver<N> for RecordingDriver<N> {
    fn animate(&mut self, targets: &[N], tween: &Tween, on_complete: Completion) -> Result<AnimationId, AnimationError> {
        let id = self.next_id;
        self.next_id += 1;
        self.calls.push(DriverCall::Animate {
            id,
            targets: targets.to_vec(),
            tween: tween.clone(),
        });
        self.pending.push(Pending {
            id,
            targets: targets.to_vec(),
            props: tween.props.clone(),
            on_complete,
        });
        Ok(id)
    }

    fn set_immediate(&mut self, targets: &[N], values: &PropertyMap) -> Result<(), AnimationError> {
        self.calls.push(DriverCall::Set {
            targets: targets.to_vec(),
            values: values.clone(),
        });
        self.apply(targets, values);
        Ok(())
    }

    fn cancel_animations_on(&mut self, targets: &[N]) {
        self.calls.push(DriverCall::Cancel {
            targets: targets.to_vec(),
        });
        // Dropping the completion means it never fires
        self.pending
            .retain(|p| !p.targets.iter().any(|t| targets.contains(t)));
    }
}
