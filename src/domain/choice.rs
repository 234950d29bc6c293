//! Small pieces of per-view UI state: single-choice selectors, on/off
//! toggles and dropdown pickers.

use std::fmt::Debug;

use crate::domain::error::ConfigurationError;

/// Exactly one of a fixed list of options is selected.
#[derive(Debug, Clone)]
pub struct Choice<T> {
    options: Vec<T>,
    selected: usize,
}

impl<T: PartialEq + Debug> Choice<T> {
    /// `default` must be one of `options`.
    pub fn new(options: Vec<T>, default: &T) -> Result<Self, ConfigurationError> {
        let selected = options
            .iter()
            .position(|o| o == default)
            .ok_or_else(|| ConfigurationError::UnknownOption(format!("{default:?}")))?;
        Ok(Self { options, selected })
    }

    /// First option selected. `None` for an empty option list.
    pub fn first_of(options: Vec<T>) -> Option<Self> {
        if options.is_empty() {
            None
        } else {
            Some(Self {
                options,
                selected: 0,
            })
        }
    }

    pub fn select(&mut self, option: &T) -> Result<(), ConfigurationError> {
        self.selected = self
            .options
            .iter()
            .position(|o| o == option)
            .ok_or_else(|| ConfigurationError::UnknownOption(format!("{option:?}")))?;
        Ok(())
    }

    pub fn select_index(&mut self, index: usize) -> Result<(), ConfigurationError> {
        if index >= self.options.len() {
            return Err(ConfigurationError::UnknownOption(index.to_string()));
        }
        self.selected = index;
        Ok(())
    }

    pub fn selected(&self) -> &T {
        &self.options[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn is_selected(&self, option: &T) -> bool {
        self.selected() == option
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Toggle(bool);

impl Toggle {
    pub fn new(on: bool) -> Self {
        Self(on)
    }

    /// Flip and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.0 = !self.0;
        self.0
    }

    pub fn set(&mut self, on: bool) {
        self.0 = on;
    }

    pub fn is_on(&self) -> bool {
        self.0
    }
}

/// Dropdown: a [`Choice`] plus open/closed state and a hovered entry.
#[derive(Debug, Clone)]
pub struct Picker<T> {
    choice: Choice<T>,
    open: Toggle,
    hovered: Option<usize>,
}

impl<T: PartialEq + Debug> Picker<T> {
    pub fn new(choice: Choice<T>) -> Self {
        Self {
            choice,
            open: Toggle::default(),
            hovered: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_on()
    }

    pub fn toggle_open(&mut self) {
        if !self.open.toggle() {
            self.hovered = None;
        }
    }

    /// Ignored while the dropdown is closed.
    pub fn hover(&mut self, index: usize) {
        if self.is_open() && index < self.choice.options().len() {
            self.hovered = Some(index);
        }
    }

    pub fn leave(&mut self) {
        self.hovered = None;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Select the entry at `index` and close the dropdown.
    pub fn pick(&mut self, index: usize) -> Result<(), ConfigurationError> {
        self.choice.select_index(index)?;
        self.open.set(false);
        self.hovered = None;
        Ok(())
    }

    pub fn selected(&self) -> &T {
        self.choice.selected()
    }

    pub fn options(&self) -> &[T] {
        self.choice.options()
    }
}
