//! Character alignment between two texts
//!
//! Produces the keep/remove/add plan a transition applies. The smart strategy
//! is a greedy heuristic, not a minimal edit script: chars that stayed in
//! place are anchored first, then every unmatched new char grabs the nearest
//! unused old char with the same value.

use crate::error::AlignmentError;
use serde::{Deserialize, Serialize};

/// How old and new characters are matched
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Reuse same-character elements near their old position
    #[default]
    Smart,
    /// Remove everything old, add everything new
    #[serde(alias = "replace")]
    Sequential,
}

/// Old element reused at a (possibly different) new position
#[derive(Clone, Debug, PartialEq)]
pub struct Keep<R> {
    pub old_index: usize,
    pub new_index: usize,
    pub element: R,
}

/// Old element with no place in the new text
#[derive(Clone, Debug, PartialEq)]
pub struct Remove<R> {
    pub old_index: usize,
    pub element: R,
}

/// New character that needs a fresh element
#[derive(Clone, Debug, PartialEq)]
pub struct Add {
    pub new_index: usize,
    pub ch: char,
}

/// Keep/remove/add classification of two texts
///
/// `keep` is sorted by new index, `remove` by old index, `add` by new index.
#[derive(Clone, Debug, PartialEq)]
pub struct AlignmentPlan<R> {
    pub keep: Vec<Keep<R>>,
    pub remove: Vec<Remove<R>>,
    pub add: Vec<Add>,
}

impl<R> AlignmentPlan<R> {
    pub fn is_noop(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty() && self.keep.iter().all(|k| k.old_index == k.new_index)
    }
}

/// Align `old` with `new`; `old_elements[i]` displays `old[i]`
pub fn compute_alignment<R: Clone>(
    old: &[char],
    new: &[char],
    old_elements: &[R],
    strategy: Strategy,
) -> Result<AlignmentPlan<R>, AlignmentError> {
    if old.len() != old_elements.len() {
        return Err(AlignmentError::LengthMismatch {
            text_len: old.len(),
            element_len: old_elements.len(),
        });
    }

    // new index → matched old index
    let mut matched: Vec<Option<usize>> = vec![None; new.len()];
    let mut old_used = vec![false; old.len()];

    if strategy == Strategy::Smart {
        for i in 0..old.len().min(new.len()) {
            if old[i] == new[i] {
                matched[i] = Some(i);
                old_used[i] = true;
            }
        }

        for (j, slot) in matched.iter_mut().enumerate() {
            if slot.is_some() {
                continue;
            }
            let nearest = (0..old.len())
                .filter(|&k| !old_used[k] && old[k] == new[j])
                .min_by_key(|&k| k.abs_diff(j));
            if let Some(k) = nearest {
                *slot = Some(k);
                old_used[k] = true;
            }
        }
    }

    let mut plan = AlignmentPlan {
        keep: Vec::new(),
        remove: Vec::new(),
        add: Vec::new(),
    };
    for (new_index, slot) in matched.iter().enumerate() {
        match slot {
            Some(old_index) => plan.keep.push(Keep {
                old_index: *old_index,
                new_index,
                element: old_elements[*old_index].clone(),
            }),
            None => plan.add.push(Add {
                new_index,
                ch: new[new_index],
            }),
        }
    }
    for (old_index, used) in old_used.iter().enumerate() {
        if !used {
            plan.remove.push(Remove {
                old_index,
                element: old_elements[old_index].clone(),
            });
        }
    }
    Ok(plan)
}
