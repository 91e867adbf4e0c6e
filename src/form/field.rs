//! Field descriptors and their input widgets.

use crate::input::TextInput;

/// Value a field hands to its validator and binder on commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Choice(String),
    Choices(Vec<String>),
    Flag(bool),
}

impl FieldValue {
    /// Textual view used by text validators.
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => s,
            _ => "",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => s,
            _ => String::new(),
        }
    }

    pub fn into_choices(self) -> Vec<String> {
        match self {
            FieldValue::Choices(v) => v,
            FieldValue::Choice(s) => vec![s],
            _ => Vec::new(),
        }
    }
}

/// One option of a select or multi-select.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Input widget backing a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Widget {
    Text {
        input: TextInput,
        placeholder: String,
    },
    Select {
        options: Vec<Choice>,
        cursor: usize,
    },
    MultiSelect {
        options: Vec<Choice>,
        cursor: usize,
        picked: Vec<String>,
    },
    Confirm {
        affirmative: String,
        negative: String,
        value: bool,
    },
}

impl Widget {
    /// Current value as it would be committed.
    pub fn value(&self) -> FieldValue {
        match self {
            Widget::Text { input, .. } => FieldValue::Text(input.value().trim().to_string()),
            Widget::Select { options, cursor } => FieldValue::Choice(
                options
                    .get(*cursor)
                    .map(|c| c.value.clone())
                    .unwrap_or_default(),
            ),
            // Option order first; picks not (yet) among the options follow.
            Widget::MultiSelect {
                options, picked, ..
            } => {
                let mut values: Vec<String> = options
                    .iter()
                    .filter(|c| picked.contains(&c.value))
                    .map(|c| c.value.clone())
                    .collect();
                values.extend(
                    picked
                        .iter()
                        .filter(|v| !options.iter().any(|c| c.value == **v))
                        .cloned(),
                );
                FieldValue::Choices(values)
            }
            Widget::Confirm { value, .. } => FieldValue::Flag(*value),
        }
    }

    pub fn move_option(&mut self, delta: isize) {
        let (len, cursor) = match self {
            Widget::Select { options, cursor } | Widget::MultiSelect { options, cursor, .. } => {
                (options.len(), cursor)
            }
            _ => return,
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        *cursor = (*cursor as isize + delta).clamp(0, len as isize - 1) as usize;
    }

    /// Flip the option under the cursor of a multi-select.
    pub fn toggle(&mut self) {
        if let Widget::MultiSelect {
            options,
            cursor,
            picked,
        } = self
            && let Some(opt) = options.get(*cursor)
        {
            if let Some(pos) = picked.iter().position(|v| *v == opt.value) {
                picked.remove(pos);
            } else {
                picked.push(opt.value.clone());
            }
        }
    }

    /// Swap the options. The cursor stays on its option when it still exists;
    /// picks are kept even when the new list does not name them.
    pub fn replace_options(&mut self, new_options: Vec<Choice>) {
        match self {
            Widget::Select { options, cursor } => {
                let current = options.get(*cursor).map(|c| c.value.clone());
                *cursor = current
                    .and_then(|v| new_options.iter().position(|c| c.value == v))
                    .unwrap_or(0);
                *options = new_options;
            }
            Widget::MultiSelect {
                options,
                cursor,
                picked,
            } => {
                let current = options.get(*cursor).map(|c| c.value.clone());
                *cursor = current
                    .and_then(|v| new_options.iter().position(|c| c.value == v))
                    .unwrap_or(0);
                *options = new_options;
            }
            _ => {}
        }
    }
}

/// Rejects a proposed value with a message shown under the field.
pub type Validator = fn(&FieldValue) -> Result<(), String>;

/// Writes a committed value into the form's draft.
pub type Binder<D> = fn(&mut D, FieldValue);

/// A labelled input bound to one slot of the draft `D`.
pub struct Field<D> {
    /// Stable key used to address the field (e.g. for option refresh).
    pub key: &'static str,
    pub label: String,
    pub description: Option<String>,
    pub widget: Widget,
    pub validator: Option<Validator>,
    pub bind: Binder<D>,
    /// Last rejection reason, cleared on a successful commit.
    pub error: Option<String>,
}

impl<D> Field<D> {
    fn with_widget(key: &'static str, label: &str, widget: Widget, bind: Binder<D>) -> Self {
        Self {
            key,
            label: label.into(),
            description: None,
            widget,
            validator: None,
            bind,
            error: None,
        }
    }

    pub fn text(key: &'static str, label: &str, initial: &str, bind: Binder<D>) -> Self {
        Self::with_widget(
            key,
            label,
            Widget::Text {
                input: TextInput::new(initial),
                placeholder: String::new(),
            },
            bind,
        )
    }

    /// Single choice; the cursor starts on `initial` when it is one of the options.
    pub fn select(
        key: &'static str,
        label: &str,
        options: Vec<Choice>,
        initial: &str,
        bind: Binder<D>,
    ) -> Self {
        let cursor = options.iter().position(|c| c.value == initial).unwrap_or(0);
        Self::with_widget(key, label, Widget::Select { options, cursor }, bind)
    }

    pub fn multi_select(
        key: &'static str,
        label: &str,
        options: Vec<Choice>,
        picked: &[String],
        bind: Binder<D>,
    ) -> Self {
        Self::with_widget(
            key,
            label,
            Widget::MultiSelect {
                options,
                cursor: 0,
                picked: picked.to_vec(),
            },
            bind,
        )
    }

    pub fn confirm(
        key: &'static str,
        label: &str,
        affirmative: &str,
        negative: &str,
        initial: bool,
        bind: Binder<D>,
    ) -> Self {
        Self::with_widget(
            key,
            label,
            Widget::Confirm {
                affirmative: affirmative.into(),
                negative: negative.into(),
                value: initial,
            },
            bind,
        )
    }

    pub fn placeholder(mut self, text: &str) -> Self {
        if let Widget::Text { placeholder, .. } = &mut self.widget {
            *placeholder = text.into();
        }
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn is_confirm(&self) -> bool {
        matches!(self.widget, Widget::Confirm { .. })
    }

    /// Run the validator against the widget's current value.
    pub fn check(&self) -> Result<FieldValue, String> {
        let value = self.widget.value();
        if let Some(v) = self.validator {
            v(&value)?;
        }
        Ok(value)
    }
}
