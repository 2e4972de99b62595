// src/context.rs
//! Application context: theme preference, session flag and the document root
//! they are applied to. Everything that used to be ambient lives here and is
//! passed explicitly to whoever needs it.

use anyhow::Result;
use std::collections::BTreeSet;
use std::fmt;
use tracing::info;

use crate::storage::{KeyValueStore, SESSION_KEY, THEME_KEY};

pub const DARK_CLASS: &str = "dark";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Anything other than an explicit "light" means dark
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => Self::Light,
            _ => Self::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation classes on the document root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootElement {
    classes: BTreeSet<String>,
}

impl RootElement {
    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn class_list(&self) -> String {
        self.classes.iter().cloned().collect::<Vec<_>>().join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Home => "/",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

pub struct AppContext {
    store: Box<dyn KeyValueStore>,
    theme: Theme,
    root: RootElement,
}

impl AppContext {
    /// Build the context, loading the saved theme and applying it to the root
    pub fn new(store: Box<dyn KeyValueStore>) -> Result<Self> {
        let saved = store.get(THEME_KEY);
        info!("Loading saved theme: {:?}", saved);

        let mut ctx = Self {
            theme: Theme::Dark,
            store,
            root: RootElement::default(),
        };
        ctx.apply_theme(Theme::from_stored(saved.as_deref()))?;
        Ok(ctx)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark_mode(&self) -> bool {
        self.theme == Theme::Dark
    }

    pub fn root(&self) -> &RootElement {
        &self.root
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.theme.toggled();
        info!("Toggling theme {} -> {}", self.theme, next);
        self.apply_theme(next)?;
        Ok(next)
    }

    /// Persist `theme` first; memory and the root only change once it is stored
    fn apply_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())?;
        self.theme = theme;
        match theme {
            Theme::Dark => self.root.add_class(DARK_CLASS),
            Theme::Light => self.root.remove_class(DARK_CLASS),
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get(SESSION_KEY).as_deref() == Some("true")
    }

    pub(crate) fn set_authenticated(&mut self) -> Result<()> {
        self.store.set(SESSION_KEY, "true")
    }

    pub(crate) fn clear_session(&mut self) -> Result<()> {
        self.store.remove(SESSION_KEY)
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }
}
