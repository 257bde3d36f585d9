//! DOM patching for transitions
//!
//! The complete new element sequence is built off-document and swapped in
//! with one `replace_children` call. Animations start only after the swap, so
//! an animation engine failure can never leave the container half patched.

use super::{visible_state, AlignmentPlan, Keep, TransitionOptions};
use crate::animation::{AnimationDriver, AnimationHandle, Completion, CompletionLatch, Tween};
use crate::dom::UiTree;
use crate::error::DomError;
use crate::split::{word_indices, CharEntry, ElementFactory, WordEntry};

/// State after a patch
#[derive(Debug)]
pub struct PatchOutcome<N> {
    pub chars: Vec<CharEntry<N>>,
    pub words: Vec<WordEntry<N>>,
    /// Removed elements that may still be animating out
    pub exiting: Vec<N>,
    /// `None` when the container was detached and nothing was animated
    pub handle: Option<AnimationHandle>,
}

/// Applies alignment plans to a container
pub struct Patcher<'a, T: UiTree, A> {
    pub tree: &'a mut T,
    pub driver: &'a mut A,
    pub factory: &'a mut ElementFactory,
}

impl<'a, T, A> Patcher<'a, T, A>
where
    T: UiTree,
    A: AnimationDriver<T::Node>,
{
    /// Patch `container` from the plan's old elements to `new_text`
    ///
    /// `in_flight` holds elements still exiting from an earlier transition;
    /// their animations are cancelled together with the outgoing ones.
    pub fn apply(
        &mut self,
        container: &T::Node,
        plan: AlignmentPlan<T::Node>,
        new_text: &[char],
        in_flight: &[T::Node],
        options: &TransitionOptions,
        on_complete: Option<Completion>,
    ) -> Result<PatchOutcome<T::Node>, DomError> {
        let connected = self.tree.is_connected(container);

        let outgoing: Vec<T::Node> = plan
            .keep
            .iter()
            .map(|k| k.element.clone())
            .chain(plan.remove.iter().map(|r| r.element.clone()))
            .chain(in_flight.iter().cloned())
            .collect();
        self.driver.cancel_animations_on(&outgoing);

        if !connected {
            // Kept elements stay in the detached container; build every char fresh
            log::debug!("Transition target is detached, skipping DOM patch");
            let (chars, _, _) = self.build_sequence(&[], new_text)?;
            let (_, words) = self.layout(&chars)?;
            return Ok(PatchOutcome {
                chars,
                words,
                exiting: Vec::new(),
                handle: None,
            });
        }

        let (chars, kept, added) = self.build_sequence(&plan.keep, new_text)?;
        let removed: Vec<T::Node> = plan.remove.into_iter().map(|r| r.element).collect();
        let (top, words) = self.layout(&chars)?;

        self.set_state(&kept, &visible_state());
        self.set_state(&added, &options.hidden);
        self.tree.replace_children(container, &top)?;

        log::debug!(
            "Patched transition: {} kept, {} removed, {} added",
            kept.len(),
            removed.len(),
            added.len()
        );

        let handle = self.run_exit_enter(&removed, added, options, on_complete);
        Ok(PatchOutcome {
            chars,
            words,
            exiting: removed,
            handle: Some(handle),
        })
    }

    /// Patch a container whose chars are not wrapped
    ///
    /// Word elements are the animated unit: the old ones exit and fresh ones
    /// holding plain text enter. Without word wrapping the text is swapped in
    /// and nothing is animated.
    pub fn apply_words(
        &mut self,
        container: &T::Node,
        old_words: &[T::Node],
        new_text: &[char],
        in_flight: &[T::Node],
        options: &TransitionOptions,
        on_complete: Option<Completion>,
    ) -> Result<PatchOutcome<T::Node>, DomError> {
        let connected = self.tree.is_connected(container);
        let outgoing: Vec<T::Node> = old_words.iter().chain(in_flight).cloned().collect();
        self.driver.cancel_animations_on(&outgoing);

        self.factory.reset();
        let (top, words) = self.layout_text(new_text)?;
        if !connected {
            log::debug!("Transition target is detached, skipping DOM patch");
            return Ok(PatchOutcome {
                chars: Vec::new(),
                words,
                exiting: Vec::new(),
                handle: None,
            });
        }

        let added: Vec<T::Node> = words.iter().map(|w| w.node.clone()).collect();
        self.set_state(&added, &options.hidden);
        self.tree.replace_children(container, &top)?;
        log::debug!("Patched word transition: {} removed, {} added", old_words.len(), added.len());

        let removed = old_words.to_vec();
        let handle = self.run_exit_enter(&removed, added, options, on_complete);
        Ok(PatchOutcome {
            chars: Vec::new(),
            words,
            exiting: removed,
            handle: Some(handle),
        })
    }

    /// Start the exit and enter tweens under one completion latch
    fn run_exit_enter(
        &mut self,
        removed: &[T::Node],
        added: Vec<T::Node>,
        options: &TransitionOptions,
        on_complete: Option<Completion>,
    ) -> AnimationHandle {
        let tween = |props| Tween {
            props,
            duration: options.duration,
            stagger: options.stagger,
            ease: options.ease.clone(),
            delay: 0.0,
        };
        let mut jobs = Vec::new();
        if !removed.is_empty() {
            jobs.push((removed.to_vec(), tween(options.exit.clone())));
        }
        if !added.is_empty() {
            jobs.push((added, tween(options.enter.clone())));
        }

        let (mut handle, completions) = CompletionLatch::start(jobs.len(), on_complete);
        for ((targets, tween), done) in jobs.into_iter().zip(completions) {
            match self.driver.animate(&targets, &tween, done) {
                Ok(id) => handle.ids.push(id),
                Err(e) => log::error!("Transition animation failed to start: {}", e),
            }
        }
        handle
    }

    /// Ordered char entries for `new_text`, plus kept and added elements
    #[allow(clippy::type_complexity)]
    fn build_sequence(
        &mut self,
        keep: &[Keep<T::Node>],
        new_text: &[char],
    ) -> Result<(Vec<CharEntry<T::Node>>, Vec<T::Node>, Vec<T::Node>), DomError> {
        let mut slots: Vec<Option<T::Node>> = vec![None; new_text.len()];
        for k in keep {
            slots[k.new_index] = Some(k.element.clone());
        }

        self.factory.reset();
        let words = word_indices(new_text);
        let mut chars = Vec::with_capacity(new_text.len());
        let mut kept = Vec::with_capacity(keep.len());
        let mut added = Vec::with_capacity(new_text.len().saturating_sub(keep.len()));

        for (index, (&ch, slot)) in new_text.iter().zip(slots).enumerate() {
            let (node, kind) = match slot {
                Some(node) => {
                    let kind = self.factory.retag_char(self.tree, &node, ch)?;
                    kept.push(node.clone());
                    (node, kind)
                }
                None => {
                    let (node, kind) = self.factory.create_char(self.tree, ch)?;
                    added.push(node.clone());
                    (node, kind)
                }
            };
            chars.push(CharEntry {
                node,
                ch,
                kind,
                word_index: words[index],
                source_index: index,
            });
        }
        Ok((chars, kept, added))
    }

    /// Top-level nodes for the container, regrouping chars into fresh words
    fn layout(&mut self, chars: &[CharEntry<T::Node>]) -> Result<(Vec<T::Node>, Vec<WordEntry<T::Node>>), DomError> {
        if !self.factory.config().wrap.words {
            return Ok((chars.iter().map(|c| c.node.clone()).collect(), Vec::new()));
        }

        let mut top = Vec::new();
        let mut words = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            if chars[i].ch.is_whitespace() {
                top.push(chars[i].node.clone());
                i += 1;
                continue;
            }

            let start = i;
            while i < chars.len() && !chars[i].ch.is_whitespace() {
                i += 1;
            }
            let word = self.factory.make_word().materialize(self.tree)?;
            for entry in &chars[start..i] {
                self.tree.append_child(&word, &entry.node)?;
            }
            top.push(word.clone());
            words.push(WordEntry {
                node: word,
                text: chars[start..i].iter().map(|c| c.ch).collect(),
            });
        }
        Ok((top, words))
    }

    /// Top-level nodes for unwrapped chars: word elements holding text, with
    /// whitespace left as text nodes
    fn layout_text(&mut self, text: &[char]) -> Result<(Vec<T::Node>, Vec<WordEntry<T::Node>>), DomError> {
        let wrap_words = self.factory.config().wrap.words;
        let mut top = Vec::new();
        let mut words = Vec::new();
        let mut pending = String::new();
        let mut i = 0;
        while i < text.len() {
            let start = i;
            let space = text[i].is_whitespace();
            while i < text.len() && text[i].is_whitespace() == space {
                i += 1;
            }
            let run: String = text[start..i].iter().collect();
            if space || !wrap_words {
                pending.push_str(&run);
                continue;
            }

            if !pending.is_empty() {
                top.push(self.tree.create_text(&std::mem::take(&mut pending)));
            }
            let word = self.factory.make_word().materialize(self.tree)?;
            let inner = self.tree.create_text(&run);
            self.tree.append_child(&word, &inner)?;
            top.push(word.clone());
            words.push(WordEntry { node: word, text: run });
        }
        if !pending.is_empty() {
            top.push(self.tree.create_text(&pending));
        }
        Ok((top, words))
    }

    fn set_state(&mut self, targets: &[T::Node], values: &crate::animation::PropertyMap) {
        if targets.is_empty() {
            return;
        }
        if let Err(e) = self.driver.set_immediate(targets, values) {
            log::error!("Failed to set element state: {}", e);
        }
    }
}
