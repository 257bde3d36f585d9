//! Splitter facade
//!
//! A [`Splitter`] exclusively owns one root node. It wraps the root's text,
//! remembers the pristine markup so it can be restored, and drives
//! transitions and preset animations through its [`AnimationDriver`].

use crate::animation::{AnimateOptions, AnimationDriver, AnimationHandle, Completion, CompletionLatch, PresetRegistry, PresetTarget};
use crate::config::{CompiledGroup, SplitConfig};
use crate::dom::UiTree;
use crate::error::{SplitError, SplitResult};
use crate::split::{
    apply_group_markers, CharEntry, CharKind, CharacterGrouper, ElementFactory, GroupResult, TreeProcessor, WordEntry,
};
use crate::transition::{compute_alignment, PatchOutcome, Patcher, TransitionOptions};

const ARIA_LABEL: &str = "aria-label";
const TITLE: &str = "title";

/// Elements produced by a wrap
#[derive(Clone, Debug)]
pub struct SplitOutput<N> {
    pub chars: Vec<CharEntry<N>>,
    pub words: Vec<WordEntry<N>>,
    pub groups: GroupResult<N>,
}

/// Root markup before wrapping
#[derive(Debug)]
struct Pristine<N> {
    children: Vec<N>,
    aria_label: Option<String>,
    title: Option<String>,
}

#[derive(Debug)]
struct WrapState<N> {
    text: Vec<char>,
    chars: Vec<CharEntry<N>>,
    words: Vec<WordEntry<N>>,
    groups: GroupResult<N>,
    memberships: Vec<Vec<String>>,
    /// Removed elements whose exit animation may still run
    exiting: Vec<N>,
}

impl<N> Default for WrapState<N> {
    fn default() -> Self {
        Self {
            text: Vec::new(),
            chars: Vec::new(),
            words: Vec::new(),
            groups: GroupResult::new(),
            memberships: Vec::new(),
            exiting: Vec::new(),
        }
    }
}

pub struct Splitter<T: UiTree, A> {
    tree: T,
    driver: A,
    root: T::Node,
    config: SplitConfig,
    groups: Vec<CompiledGroup>,
    factory: ElementFactory,
    pristine: Option<Pristine<T::Node>>,
    state: WrapState<T::Node>,
    wrapped: bool,
    destroyed: bool,
}

impl<T, A> Splitter<T, A>
where
    T: UiTree,
    A: AnimationDriver<T::Node>,
{
    /// Create an unwrapped splitter for `root`
    pub fn new(tree: T, driver: A, root: T::Node, config: SplitConfig) -> SplitResult<Self> {
        let groups = config.validate()?;
        Ok(Self {
            tree,
            driver,
            root,
            factory: ElementFactory::new(&config),
            config,
            groups,
            pristine: None,
            state: WrapState::default(),
            wrapped: false,
            destroyed: false,
        })
    }

    /// Create a splitter for the first element matching `selector`
    pub fn from_selector(tree: T, driver: A, selector: &str, config: SplitConfig) -> SplitResult<Self> {
        let root = tree
            .query(selector)?
            .ok_or_else(|| SplitError::Selection(selector.to_string()))?;
        Self::new(tree, driver, root, config)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Split the root's text into wrapped elements
    ///
    /// New options replace the current configuration. Wrapping twice is a
    /// no-op that returns the current elements.
    pub fn wrap(&mut self, options: Option<SplitConfig>) -> SplitResult<SplitOutput<T::Node>> {
        if self.destroyed {
            return Err(SplitError::Destroyed);
        }
        if self.wrapped {
            log::warn!("wrap() called on an already wrapped target; use rewrap() to apply new options");
            return Ok(self.output());
        }
        if let Some(config) = options {
            self.groups = config.validate()?;
            self.factory = ElementFactory::new(&config);
            self.config = config;
        }

        let children = self.tree.children(&self.root);
        self.pristine = Some(Pristine {
            children: children.iter().map(|child| self.tree.deep_clone(child)).collect(),
            aria_label: self.tree.attribute(&self.root, ARIA_LABEL),
            title: self.tree.attribute(&self.root, TITLE),
        });

        self.factory.reset();
        let processor = TreeProcessor::new(&self.config);
        let segments = processor.extract_segments(&self.tree, &self.root);
        let wrapped = processor.process(&mut self.tree, &segments, &mut self.factory)?;

        self.state = WrapState {
            text: wrapped.text,
            chars: wrapped.chars,
            words: wrapped.words,
            ..WrapState::default()
        };
        self.wrapped = true;
        self.regroup()?;
        self.label_root()?;

        log::info!(
            "✂️ Wrapped {} chars in {} words",
            self.state.chars.len(),
            self.state.words.len()
        );
        Ok(self.output())
    }

    /// Restore the markup the root had before wrapping
    pub fn unwrap(&mut self) -> SplitResult<()> {
        if !self.wrapped {
            return Ok(());
        }

        let animated: Vec<T::Node> = self
            .state
            .chars
            .iter()
            .map(|c| c.node.clone())
            .chain(self.state.words.iter().map(|w| w.node.clone()))
            .chain(self.state.exiting.iter().cloned())
            .collect();
        self.driver.cancel_animations_on(&animated);

        if let Some(pristine) = self.pristine.take() {
            self.tree.replace_children(&self.root, &pristine.children)?;
            self.restore_attribute(ARIA_LABEL, pristine.aria_label)?;
            self.restore_attribute(TITLE, pristine.title)?;
        }

        self.state = WrapState::default();
        self.factory.reset();
        self.wrapped = false;
        log::debug!("Unwrapped target");
        Ok(())
    }

    /// Unwrap, then wrap again (optionally with new options)
    pub fn rewrap(&mut self, options: Option<SplitConfig>) -> SplitResult<SplitOutput<T::Node>> {
        if self.destroyed {
            return Err(SplitError::Destroyed);
        }
        self.unwrap()?;
        self.wrap(options)
    }

    /// Unwrap and release all state; the splitter is unusable afterwards
    pub fn destroy(&mut self) -> SplitResult<()> {
        if self.destroyed {
            return Ok(());
        }
        self.unwrap()?;
        self.groups.clear();
        self.destroyed = true;
        log::debug!("Splitter destroyed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Current logical text (empty while unwrapped)
    pub fn text(&self) -> String {
        self.state.text.iter().collect()
    }

    pub fn chars(&self) -> &[CharEntry<T::Node>] {
        &self.state.chars
    }

    pub fn words(&self) -> &[WordEntry<T::Node>] {
        &self.state.words
    }

    pub fn char_at(&self, index: usize) -> Option<&CharEntry<T::Node>> {
        self.state.chars.get(index)
    }

    pub fn word_at(&self, index: usize) -> Option<&WordEntry<T::Node>> {
        self.state.words.get(index)
    }

    /// Chars carrying any of the `kind` flags
    pub fn chars_by_type(&self, kind: CharKind) -> Vec<&CharEntry<T::Node>> {
        self.state.chars.iter().filter(|c| c.kind.intersects(kind)).collect()
    }

    pub fn groups(&self) -> &GroupResult<T::Node> {
        &self.state.groups
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn root(&self) -> &T::Node {
        &self.root
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    pub fn driver(&self) -> &A {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut A {
        &mut self.driver
    }

    // ------------------------------------------------------------------
    // Animation
    // ------------------------------------------------------------------

    /// Transition the displayed text to `new_text`
    ///
    /// The root shows `new_text` as soon as this returns. Returns `None` when
    /// the splitter is not wrapped or the root is detached (state is still
    /// updated in that case, nothing is animated). With `wrap.chars` off the
    /// transition runs on word elements instead of chars.
    pub fn transition_to(
        &mut self,
        new_text: &str,
        options: &TransitionOptions,
        on_complete: Option<Completion>,
    ) -> SplitResult<Option<AnimationHandle>> {
        if !self.wrapped {
            log::warn!("transition_to() called before wrap(); ignoring");
            return Ok(None);
        }

        let new: Vec<char> = new_text.chars().collect();
        if !self.config.wrap.chars {
            return self.transition_words(new, options, on_complete);
        }

        let old: Vec<char> = self.state.chars.iter().map(|c| c.ch).collect();
        let elements: Vec<T::Node> = self.state.chars.iter().map(|c| c.node.clone()).collect();
        let plan = compute_alignment(&old, &new, &elements, options.strategy)?;

        log::debug!(
            "Transition {:?} -> {:?}: keep {}, remove {}, add {}",
            old.iter().collect::<String>(),
            new_text,
            plan.keep.len(),
            plan.remove.len(),
            plan.add.len()
        );

        let in_flight = std::mem::take(&mut self.state.exiting);
        let outcome = Patcher {
            tree: &mut self.tree,
            driver: &mut self.driver,
            factory: &mut self.factory,
        }
        .apply(&self.root, plan, &new, &in_flight, options, on_complete)?;

        self.commit(new, outcome)
    }

    /// Word-level transition used when chars are not wrapped
    fn transition_words(
        &mut self,
        new: Vec<char>,
        options: &TransitionOptions,
        on_complete: Option<Completion>,
    ) -> SplitResult<Option<AnimationHandle>> {
        let old_words: Vec<T::Node> = self.state.words.iter().map(|w| w.node.clone()).collect();
        let in_flight = std::mem::take(&mut self.state.exiting);
        let outcome = Patcher {
            tree: &mut self.tree,
            driver: &mut self.driver,
            factory: &mut self.factory,
        }
        .apply_words(&self.root, &old_words, &new, &in_flight, options, on_complete)?;

        self.commit(new, outcome)
    }

    /// Run a named preset on the current chars or words
    pub fn animate(
        &mut self,
        registry: &PresetRegistry,
        name: &str,
        options: &AnimateOptions,
        on_complete: Option<Completion>,
    ) -> SplitResult<Option<AnimationHandle>> {
        if !self.wrapped {
            log::warn!("animate() called before wrap(); ignoring");
            return Ok(None);
        }
        let Some(preset) = registry.get(name) else {
            log::warn!("Unknown animation preset '{}' (available: {})", name, registry.names().join(", "));
            return Ok(None);
        };

        let targets: Vec<T::Node> = match (preset.target, &options.group) {
            (PresetTarget::Chars, Some(group)) => match self.state.groups.get(group) {
                Some(members) => members.clone(),
                None => {
                    log::warn!("Unknown group '{}'", group);
                    return Ok(None);
                }
            },
            (PresetTarget::Chars, None) => self.state.chars.iter().map(|c| c.node.clone()).collect(),
            (PresetTarget::Words, _) => self.state.words.iter().map(|w| w.node.clone()).collect(),
        };

        if targets.is_empty() {
            let (handle, _) = CompletionLatch::start(0, on_complete);
            return Ok(Some(handle));
        }

        self.driver.cancel_animations_on(&targets);
        if let Some(from) = &preset.from {
            self.driver.set_immediate(&targets, from)?;
        }

        let (mut handle, completions) = CompletionLatch::start(1, on_complete);
        for done in completions {
            let id = self.driver.animate(&targets, &preset.tween(options), done)?;
            handle.ids.push(id);
        }
        log::debug!("🎬 Preset '{}' started on {} targets", name, targets.len());
        Ok(Some(handle))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn output(&self) -> SplitOutput<T::Node> {
        SplitOutput {
            chars: self.state.chars.clone(),
            words: self.state.words.clone(),
            groups: self.state.groups.clone(),
        }
    }

    /// Adopt a patch outcome as the current state
    fn commit(&mut self, text: Vec<char>, outcome: PatchOutcome<T::Node>) -> SplitResult<Option<AnimationHandle>> {
        self.state.text = text;
        self.state.chars = outcome.chars;
        self.state.words = outcome.words;
        self.state.exiting = outcome.exiting;
        self.regroup()?;
        if self.tree.is_connected(&self.root) {
            self.label_root()?;
        }
        Ok(outcome.handle)
    }

    fn regroup(&mut self) -> SplitResult<()> {
        let assignment = CharacterGrouper::new(&self.groups).classify(&self.state.chars, &self.state.text);
        apply_group_markers(&mut self.tree, &self.state.chars, &assignment, &self.config.data_attributes)?;
        self.state.groups = assignment.groups;
        self.state.memberships = assignment.memberships;
        Ok(())
    }

    fn label_root(&mut self) -> SplitResult<()> {
        let text = self.text();
        if self.config.accessibility.labels_container() {
            self.tree.set_attribute(&self.root, ARIA_LABEL, &text)?;
        }
        if self.config.accessibility.titles_container() {
            self.tree.set_attribute(&self.root, TITLE, &text)?;
        }
        Ok(())
    }

    fn restore_attribute(&mut self, name: &str, value: Option<String>) -> SplitResult<()> {
        match value {
            Some(value) => self.tree.set_attribute(&self.root, name, &value)?,
            None => self.tree.remove_attribute(&self.root, name)?,
        }
        Ok(())
    }
}
