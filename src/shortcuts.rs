//! Key binding configuration.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// All key bindings, grouped by where they apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shortcuts {
    pub global: GlobalShortcuts,
    pub list: ListShortcuts,
    pub form: FormShortcuts,
    pub filter: FilterShortcuts,
    pub input: InputShortcuts,
    pub hint: HintShortcuts,
}

/// Bindings that work on every screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalShortcuts {
    pub quit: Vec<String>,
}

/// Bindings for menu, list and table screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListShortcuts {
    pub quit: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub choose: Vec<String>,
    pub back: Vec<String>,
    pub filter: Vec<String>,
    pub new: Vec<String>,
    pub delete: Vec<String>,
    pub refresh: Vec<String>,
}

/// Bindings inside a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormShortcuts {
    pub next: Vec<String>,
    pub prev: Vec<String>,
    pub cancel: Vec<String>,
    pub toggle: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub yes: Vec<String>,
    pub no: Vec<String>,
}

/// Bindings while typing a list filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterShortcuts {
    pub apply: Vec<String>,
    pub cancel: Vec<String>,
}

/// Line editing bindings shared by text fields and the filter bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputShortcuts {
    pub backspace: Vec<String>,
    pub delete: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub home: Vec<String>,
    pub end: Vec<String>,
    pub clear_line: Vec<String>,
}

/// Bindings on the post-action hint screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintShortcuts {
    pub dismiss: Vec<String>,
}

impl Shortcuts {
    /// Read from TOML, falling back to the defaults when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let shortcuts: Shortcuts = toml::from_str(&content)?;
            Ok(shortcuts)
        } else {
            Ok(Self::default())
        }
    }
}

fn keys(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            global: GlobalShortcuts {
                quit: keys(&["Ctrl+c"]),
            },
            list: ListShortcuts {
                quit: keys(&["q"]),
                up: keys(&["Up", "k"]),
                down: keys(&["Down", "j"]),
                choose: keys(&["Enter"]),
                back: keys(&["Esc", "Left"]),
                filter: keys(&["/"]),
                new: keys(&["n"]),
                delete: keys(&["d"]),
                refresh: keys(&["r"]),
            },
            form: FormShortcuts {
                next: keys(&["Enter", "Tab"]),
                prev: keys(&["BackTab"]),
                cancel: keys(&["Esc"]),
                toggle: keys(&[" ", "x"]),
                up: keys(&["Up"]),
                down: keys(&["Down"]),
                left: keys(&["Left"]),
                right: keys(&["Right"]),
                yes: keys(&["y"]),
                no: keys(&["n"]),
            },
            filter: FilterShortcuts {
                apply: keys(&["Enter"]),
                cancel: keys(&["Esc"]),
            },
            input: InputShortcuts {
                backspace: keys(&["Backspace"]),
                delete: keys(&["Delete"]),
                left: keys(&["Left"]),
                right: keys(&["Right"]),
                home: keys(&["Home"]),
                end: keys(&["End"]),
                clear_line: keys(&["Ctrl+u"]),
            },
            hint: HintShortcuts {
                dismiss: keys(&["Enter", "Esc"]),
            },
        }
    }
}

/// True when the key matches any of the binding strings.
pub fn matches_shortcut(key: &KeyEvent, shortcuts: &[String]) -> bool {
    shortcuts.iter().any(|s| matches_single_shortcut(key, s))
}

/// Match one binding such as `"Ctrl+u"`, `"a"` or `"Enter"`.
fn matches_single_shortcut(key: &KeyEvent, shortcut: &str) -> bool {
    // A lone "+" is the plus key, not a separator.
    let parts: Vec<&str> = if shortcut == "+" {
        vec!["+"]
    } else {
        shortcut.split('+').collect()
    };

    let (modifiers_str, key_str) = if parts.len() > 1 {
        (&parts[0..parts.len() - 1], parts[parts.len() - 1])
    } else {
        (&[][..], parts[0])
    };

    let mut expected_modifiers = KeyModifiers::empty();
    for modifier in modifiers_str {
        match *modifier {
            "Ctrl" | "ctrl" => expected_modifiers |= KeyModifiers::CONTROL,
            "Alt" | "alt" => expected_modifiers |= KeyModifiers::ALT,
            "Shift" | "shift" => expected_modifiers |= KeyModifiers::SHIFT,
            _ => return false,
        }
    }

    // Terminals report BackTab and upper-case letters with SHIFT already applied.
    let mut actual_modifiers = key.modifiers;
    if matches!(key.code, KeyCode::BackTab | KeyCode::Char(_))
        && !expected_modifiers.contains(KeyModifiers::SHIFT)
    {
        actual_modifiers.remove(KeyModifiers::SHIFT);
    }
    if actual_modifiers != expected_modifiers {
        return false;
    }

    match key_str {
        "Enter" | "enter" => key.code == KeyCode::Enter,
        "Esc" | "esc" => key.code == KeyCode::Esc,
        "Tab" | "tab" => key.code == KeyCode::Tab,
        "BackTab" | "backtab" => key.code == KeyCode::BackTab,
        "Backspace" | "backspace" => key.code == KeyCode::Backspace,
        "Delete" | "delete" => key.code == KeyCode::Delete,
        "Up" | "up" => key.code == KeyCode::Up,
        "Down" | "down" => key.code == KeyCode::Down,
        "Left" | "left" => key.code == KeyCode::Left,
        "Right" | "right" => key.code == KeyCode::Right,
        "Home" | "home" => key.code == KeyCode::Home,
        "End" | "end" => key.code == KeyCode::End,
        "Space" | "space" => key.code == KeyCode::Char(' '),
        s if s.chars().count() == 1 => s.chars().next().is_some_and(|c| key.code == KeyCode::Char(c)),
        _ => false,
    }
}

/// Short label for the help bar, e.g. `"Enter/Tab"`.
pub fn format_keys(keys: &[String]) -> String {
    keys.iter()
        .map(|k| if k == " " { "Space" } else { k.as_str() })
        .collect::<Vec<_>>()
        .join("/")
}
