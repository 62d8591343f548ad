//! Configuration module for Lese.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    ChatSettings, GeneralSettings, ModelProvider, ModelSettings, SearchSettings, Settings,
};
