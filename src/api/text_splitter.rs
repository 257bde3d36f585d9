//! `TextSplitter` JS class
//!
//! Thin wrapper over [`Splitter`] bound to the live document. Elements are
//! handed back to JS as DOM nodes; `transitionTo` and `animate` return a
//! `Promise` resolved when the animation completes, or `null` when nothing
//! was started.

use super::{helpers, presets};
use crate::animation::{AnimateOptions, AnimationDriver, InlineStyleDriver, JsAnimationDriver, JsAnimationEngine};
use crate::config::{GroupDef, GroupPredicate, SplitConfig};
use crate::dom::WebTree;
use crate::split::{CharContext, CharKind, GroupResult};
use crate::splitter::{SplitOutput, Splitter};
use crate::transition::TransitionOptions;
use crate::{wasm_error, wasm_info, wasm_log, wasm_warn};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::Node;

type WebSplitter = Splitter<WebTree, Box<dyn AnimationDriver<Node>>>;

#[wasm_bindgen]
pub struct TextSplitter {
    inner: WebSplitter,
}

#[wasm_bindgen]
impl TextSplitter {
    /// Create a splitter for `target` (CSS selector or element)
    ///
    /// Without an `engine`, animations are applied instantly through inline
    /// styles.
    #[wasm_bindgen(constructor)]
    pub fn new(target: JsValue, config: JsValue, engine: Option<JsAnimationEngine>) -> Result<TextSplitter, JsValue> {
        let config = parse_config(config)?;
        let tree = WebTree::from_window().map_err(helpers::to_js_error)?;
        let driver: Box<dyn AnimationDriver<Node>> = match engine {
            Some(engine) => Box::new(JsAnimationDriver::new(engine)),
            None => {
                wasm_log!("No animation engine supplied, using inline styles");
                Box::new(InlineStyleDriver)
            }
        };

        let inner = if let Some(selector) = target.as_string() {
            Splitter::from_selector(tree, driver, &selector, config)
        } else {
            let node = target
                .dyn_into::<Node>()
                .map_err(|_| helpers::to_js_error("Target must be a selector string or a DOM node"))?;
            Splitter::new(tree, driver, node, config)
        }
        .map_err(helpers::to_js_error)?;

        wasm_info!("TextSplitter created");
        Ok(TextSplitter { inner })
    }

    /// Wrap the target's text; returns `{ chars, words, groups }`
    pub fn wrap(&mut self, options: JsValue) -> Result<JsValue, JsValue> {
        let options = optional_config(options)?;
        let output = self.inner.wrap(options).map_err(helpers::to_js_error)?;
        output_object(&output)
    }

    pub fn unwrap(&mut self) -> Result<(), JsValue> {
        self.inner.unwrap().map_err(helpers::to_js_error)
    }

    pub fn rewrap(&mut self, options: JsValue) -> Result<JsValue, JsValue> {
        let options = optional_config(options)?;
        let output = self.inner.rewrap(options).map_err(helpers::to_js_error)?;
        output_object(&output)
    }

    pub fn destroy(&mut self) -> Result<(), JsValue> {
        self.inner.destroy().map_err(helpers::to_js_error)
    }

    #[wasm_bindgen(js_name = getChars)]
    pub fn get_chars(&self) -> Array {
        helpers::node_array(self.inner.chars().iter().map(|c| &c.node))
    }

    #[wasm_bindgen(js_name = getWords)]
    pub fn get_words(&self) -> Array {
        helpers::node_array(self.inner.words().iter().map(|w| &w.node))
    }

    #[wasm_bindgen(js_name = getChar)]
    pub fn get_char(&self, index: usize) -> Option<Node> {
        self.inner.char_at(index).map(|c| c.node.clone())
    }

    #[wasm_bindgen(js_name = getWord)]
    pub fn get_word(&self, index: usize) -> Option<Node> {
        self.inner.word_at(index).map(|w| w.node.clone())
    }

    /// Chars of one type: `regular`, `space` or `special`
    #[wasm_bindgen(js_name = getCharsByType)]
    pub fn get_chars_by_type(&self, kind: &str) -> Result<Array, JsValue> {
        let kind = CharKind::from_type_name(kind).ok_or_else(|| {
            helpers::to_js_error(format!("Unknown char type '{}' (expected regular, space or special)", kind))
        })?;
        Ok(helpers::node_array(
            self.inner.chars_by_type(kind).into_iter().map(|c| &c.node),
        ))
    }

    #[wasm_bindgen(js_name = getGroups)]
    pub fn get_groups(&self) -> Result<Object, JsValue> {
        groups_object(self.inner.groups())
    }

    pub fn text(&self) -> String {
        self.inner.text()
    }

    #[wasm_bindgen(js_name = isWrapped)]
    pub fn is_wrapped(&self) -> bool {
        self.inner.is_wrapped()
    }

    /// Transition to `text`; resolves once every animation finished
    #[wasm_bindgen(js_name = transitionTo)]
    pub fn transition_to(&mut self, text: &str, options: JsValue) -> Result<JsValue, JsValue> {
        let options: TransitionOptions = helpers::deserialize_or_default(options, "Invalid transition options")?;
        wasm_log!("transitionTo '{}' ({:?})", text, options.strategy);

        let (promise, done) = helpers::completion_promise();
        match self.inner.transition_to(text, &options, Some(done)) {
            Ok(Some(_)) => Ok(promise.into()),
            Ok(None) => Ok(JsValue::NULL),
            Err(e) => Err(helpers::to_js_error(e)),
        }
    }

    /// Run a registered preset; resolves once it finished
    pub fn animate(&mut self, preset: &str, options: JsValue) -> Result<JsValue, JsValue> {
        let options: AnimateOptions = helpers::deserialize_or_default(options, "Invalid animate options")?;
        let registry = presets::registry();

        let (promise, done) = helpers::completion_promise();
        match self.inner.animate(&registry, preset, &options, Some(done)) {
            Ok(Some(_)) => Ok(promise.into()),
            Ok(None) => {
                wasm_warn!("animate('{}') did not start", preset);
                Ok(JsValue::NULL)
            }
            Err(e) => Err(helpers::to_js_error(e)),
        }
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

fn optional_config(value: JsValue) -> Result<Option<SplitConfig>, JsValue> {
    if value.is_undefined() || value.is_null() {
        Ok(None)
    } else {
        parse_config(value).map(Some)
    }
}

/// Deserialize a config object; function-valued groups become predicates
fn parse_config(value: JsValue) -> Result<SplitConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(SplitConfig::default());
    }

    let groups = Reflect::get(&value, &JsValue::from_str("groups"))?;
    let mut predicates = Vec::new();
    let value = if groups.is_object() {
        let declarative = Object::new();
        for entry in Object::entries(groups.unchecked_ref::<Object>()).iter() {
            let entry: Array = entry.unchecked_into();
            let name = entry.get(0).as_string().unwrap_or_default();
            let definition = entry.get(1);
            match definition.dyn_ref::<Function>() {
                Some(function) => predicates.push((name, js_predicate(function.clone()))),
                None => helpers::set_property(&declarative, &name, &definition)?,
            }
        }
        let copy = Object::assign(&Object::new(), value.unchecked_ref::<Object>());
        helpers::set_property(&copy, "groups", &declarative)?;
        JsValue::from(copy)
    } else {
        value
    };

    let mut config: SplitConfig = helpers::deserialize(value, "Invalid splitter config")?;
    for (name, predicate) in predicates {
        wasm_log!("Group '{}' uses a JS predicate", name);
        config.groups.insert(name, GroupDef::Predicate(predicate));
    }
    Ok(config)
}

fn js_predicate(function: Function) -> GroupPredicate {
    GroupPredicate::new(move |context: &CharContext| {
        let argument = match serde_wasm_bindgen::to_value(context) {
            Ok(argument) => argument,
            Err(e) => {
                wasm_error!("Failed to serialize char context: {}", e);
                return false;
            }
        };
        match function.call1(&JsValue::NULL, &argument) {
            Ok(result) => result.is_truthy(),
            Err(e) => {
                wasm_error!("Group predicate threw: {:?}", e);
                false
            }
        }
    })
}

fn groups_object(groups: &GroupResult<Node>) -> Result<Object, JsValue> {
    let object = Object::new();
    for (name, members) in groups {
        helpers::set_property(&object, name, &helpers::node_array(members).into())?;
    }
    Ok(object)
}

fn output_object(output: &SplitOutput<Node>) -> Result<JsValue, JsValue> {
    let result = Object::new();
    helpers::set_property(
        &result,
        "chars",
        &helpers::node_array(output.chars.iter().map(|c| &c.node)).into(),
    )?;
    helpers::set_property(
        &result,
        "words",
        &helpers::node_array(output.words.iter().map(|w| &w.node)).into(),
    )?;
    helpers::set_property(&result, "groups", &groups_object(&output.groups)?.into())?;
    Ok(result.into())
}
