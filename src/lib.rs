//! Text Splitter WASM Module
//!
//! Splits the text of a DOM element into individually wrapped char and word
//! elements, groups chars by configurable rules and animates text
//! transitions by reusing the elements of unchanged chars.

pub mod animation;
pub mod api;
pub mod config;
pub mod dom;
pub mod error;
pub mod split;
pub mod splitter;
pub mod transition;

// Re-export commonly used types
pub use animation::{AnimateOptions, AnimationDriver, AnimationHandle, PresetRegistry, RecordingDriver, Tween};
pub use config::{GroupDef, SplitConfig};
pub use dom::{MemoryTree, NodeId, UiTree, WebTree};
pub use error::{SplitError, SplitResult};
pub use split::{CharEntry, CharKind, WordEntry};
pub use splitter::{SplitOutput, Splitter};
pub use transition::{compute_alignment, AlignmentPlan, Strategy, TransitionOptions};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        crate::wasm_warn!("Logger already initialized");
    }

    api::presets::install_builtins();
    log::info!("Text splitter WASM module initialized");
}
