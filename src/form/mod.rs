//! Multi-field guided input with an Active/Aborted/Completed lifecycle.
//!
//! A [`Form`] owns the draft `D` its fields write into. Values are
//! validated when the operator leaves a field, never per keystroke. The
//! trailing confirm field decides the outcome: yes completes the form, no
//! aborts it exactly like the cancel key.
//!
//! The controller drains a finished form with [`Form::take_outcome`],
//! which puts the form back to `Active` before returning, so the same
//! outcome can never be observed twice.

mod field;
mod render;

pub use field::{Choice, Field, FieldValue, Widget};
pub use render::render_form;

use crossterm::event::KeyEvent;

use crate::shortcuts::{Shortcuts, matches_shortcut};

/// Lifecycle of a form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormState {
    Active,
    Aborted,
    Completed,
}

/// What the controller gets back from a finished form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormOutcome<D> {
    Completed(D),
    Aborted,
}

/// An ordered set of fields writing into a draft.
pub struct Form<D> {
    pub title: String,
    fields: Vec<Field<D>>,
    focus: usize,
    state: FormState,
    draft: D,
    /// Read-only while the completed draft is being submitted.
    submitting: bool,
    width: u16,
    height: u16,
}

impl<D: Clone> Form<D> {
    pub fn new(title: &str, draft: D, fields: Vec<Field<D>>) -> Self {
        Self {
            title: title.into(),
            fields,
            focus: 0,
            state: FormState::Active,
            draft,
            submitting: false,
            width: 80,
            height: 24,
        }
    }

    /// Size the form to the space it will be drawn in.
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.resize(width, height);
        self
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    #[cfg(test)]
    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn fields(&self) -> &[Field<D>] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    #[cfg(test)]
    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Lock the form while its draft is sent to the backend.
    pub fn begin_submit(&mut self) {
        self.submitting = true;
    }

    /// Reopen after a failed submission on the confirm field, values intact.
    pub fn resume(&mut self) {
        self.submitting = false;
        self.state = FormState::Active;
        self.focus = self.fields.len().saturating_sub(1);
    }

    /// Consume a terminal state, resetting to `Active` first.
    pub fn take_outcome(&mut self) -> Option<FormOutcome<D>> {
        let state = std::mem::replace(&mut self.state, FormState::Active);
        match state {
            FormState::Active => None,
            FormState::Aborted => Some(FormOutcome::Aborted),
            FormState::Completed => Some(FormOutcome::Completed(self.draft.clone())),
        }
    }

    /// Replace the options of the select field `key`.
    pub fn set_options(&mut self, key: &str, options: Vec<Choice>) {
        if let Some(f) = self.fields.iter_mut().find(|f| f.key == key) {
            f.widget.replace_options(options);
        }
    }

    fn abort(&mut self) {
        self.state = FormState::Aborted;
    }

    /// Route one key to the focused field.
    pub fn handle_key(&mut self, k: &KeyEvent, sc: &Shortcuts) {
        if self.state != FormState::Active {
            return;
        }
        if matches_shortcut(k, &sc.form.cancel) {
            self.abort();
            return;
        }
        if self.submitting {
            return;
        }
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        let fs = &sc.form;

        match &mut field.widget {
            Widget::Text { input, .. } => {
                if matches_shortcut(k, &fs.next) {
                    self.commit_focused();
                } else if matches_shortcut(k, &fs.prev) {
                    self.focus = self.focus.saturating_sub(1);
                } else {
                    input.handle_key(k, &sc.input);
                }
            }
            Widget::Select { .. } | Widget::MultiSelect { .. } => {
                if matches_shortcut(k, &fs.next) {
                    self.commit_focused();
                } else if matches_shortcut(k, &fs.prev) {
                    self.focus = self.focus.saturating_sub(1);
                } else if matches_shortcut(k, &fs.up) {
                    field.widget.move_option(-1);
                } else if matches_shortcut(k, &fs.down) {
                    field.widget.move_option(1);
                } else if matches_shortcut(k, &fs.toggle) {
                    field.widget.toggle();
                }
            }
            Widget::Confirm { value, .. } => {
                if matches_shortcut(k, &fs.left) || matches_shortcut(k, &fs.right) {
                    *value = !*value;
                } else if matches_shortcut(k, &fs.yes) {
                    *value = true;
                } else if matches_shortcut(k, &fs.no) {
                    *value = false;
                } else if matches_shortcut(k, &fs.prev) {
                    self.focus = self.focus.saturating_sub(1);
                } else if matches_shortcut(k, &fs.next) {
                    self.commit_focused();
                }
            }
        }
    }

    /// Validate and bind the focused field, then advance or finish.
    fn commit_focused(&mut self) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        let value = match field.check() {
            Ok(v) => v,
            Err(reason) => {
                field.error = Some(reason);
                return;
            }
        };
        field.error = None;

        if field.is_confirm() {
            // Declining is a cancel, not a validation failure.
            if value != FieldValue::Flag(true) {
                self.abort();
                return;
            }
            (field.bind)(&mut self.draft, value);
            self.finish();
            return;
        }

        (field.bind)(&mut self.draft, value);
        if self.focus + 1 < self.fields.len() {
            self.focus += 1;
        } else {
            self.finish();
        }
    }

    /// Re-check every field before completing; focus the first rejection.
    fn finish(&mut self) {
        for (i, f) in self.fields.iter_mut().enumerate() {
            match f.check() {
                Ok(v) => (f.bind)(&mut self.draft, v),
                Err(reason) => {
                    f.error = Some(reason);
                    self.focus = i;
                    return;
                }
            }
        }
        self.state = FormState::Completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Draft {
        name: String,
        kind: String,
        tags: Vec<String>,
        ok: bool,
    }

    fn not_empty(v: &FieldValue) -> Result<(), String> {
        if v.as_text().is_empty() {
            Err("required".into())
        } else {
            Ok(())
        }
    }

    fn form() -> Form<Draft> {
        let d = Draft {
            ok: true,
            ..Default::default()
        };
        let fields = vec![
            Field::text("name", "Name", &d.name, |d: &mut Draft, v| d.name = v.into_text())
                .validate(not_empty),
            Field::select(
                "kind",
                "Kind",
                vec![Choice::new("One", "one"), Choice::new("Two", "two")],
                "",
                |d: &mut Draft, v| d.kind = v.into_text(),
            ),
            Field::multi_select(
                "tags",
                "Tags",
                vec![Choice::new("A", "a"), Choice::new("B", "b")],
                &[],
                |d: &mut Draft, v| d.tags = v.into_choices(),
            ),
            Field::confirm("done", "Go?", "Yes", "No", d.ok, |d: &mut Draft, v| {
                d.ok = v == FieldValue::Flag(true)
            }),
        ];
        Form::new("Test", d, fields)
    }

    fn press(f: &mut Form<Draft>, code: KeyCode) {
        f.handle_key(&KeyEvent::new(code, KeyModifiers::empty()), &Shortcuts::default());
    }

    fn type_str(f: &mut Form<Draft>, s: &str) {
        for c in s.chars() {
            press(f, KeyCode::Char(c));
        }
    }

    #[test]
    fn rejection_keeps_focus_and_shows_reason() {
        let mut f = form();
        press(&mut f, KeyCode::Enter);
        assert_eq!(f.focus(), 0);
        assert_eq!(f.fields()[0].error.as_deref(), Some("required"));

        type_str(&mut f, "edge");
        press(&mut f, KeyCode::Enter);
        assert_eq!(f.focus(), 1);
        assert_eq!(f.fields()[0].error, None);
    }

    #[test]
    fn walking_all_fields_with_yes_completes() {
        let mut f = form();
        type_str(&mut f, "edge");
        press(&mut f, KeyCode::Enter);
        press(&mut f, KeyCode::Down);
        press(&mut f, KeyCode::Enter);
        press(&mut f, KeyCode::Down);
        press(&mut f, KeyCode::Char(' '));
        press(&mut f, KeyCode::Enter);
        press(&mut f, KeyCode::Enter);
        assert_eq!(f.state(), FormState::Completed);

        let Some(FormOutcome::Completed(d)) = f.take_outcome() else {
            panic!("expected completion");
        };
        assert_eq!(d.name, "edge");
        assert_eq!(d.kind, "two");
        assert_eq!(d.tags, vec!["b".to_string()]);
        assert!(d.ok);
    }

    #[test]
    fn confirm_no_aborts_instead_of_failing_validation() {
        let mut f = form();
        type_str(&mut f, "edge");
        for _ in 0..3 {
            press(&mut f, KeyCode::Enter);
        }
        press(&mut f, KeyCode::Char('n'));
        press(&mut f, KeyCode::Enter);
        assert_eq!(f.state(), FormState::Aborted);
        assert_eq!(f.fields()[3].error, None);
    }

    #[test]
    fn cancel_key_aborts_from_any_field() {
        let mut f = form();
        type_str(&mut f, "ed");
        press(&mut f, KeyCode::Esc);
        assert_eq!(f.take_outcome(), Some(FormOutcome::Aborted));
    }

    #[test]
    fn outcome_is_observed_once() {
        let mut f = form();
        press(&mut f, KeyCode::Esc);
        assert!(f.take_outcome().is_some());
        assert_eq!(f.state(), FormState::Active);
        assert_eq!(f.take_outcome(), None);
        // Later keys do not re-fire the outcome.
        press(&mut f, KeyCode::Char('x'));
        assert_eq!(f.take_outcome(), None);
    }

    #[test]
    fn typing_n_in_text_field_is_text() {
        let mut f = form();
        type_str(&mut f, "nyx");
        let Widget::Text { input, .. } = &f.fields()[0].widget else {
            panic!("text widget");
        };
        assert_eq!(input.value(), "nyx");
        assert_eq!(f.state(), FormState::Active);
    }

    #[test]
    fn submitting_form_ignores_edits_but_accepts_cancel() {
        let mut f = form();
        f.begin_submit();
        type_str(&mut f, "zz");
        let Widget::Text { input, .. } = &f.fields()[0].widget else {
            panic!("text widget");
        };
        assert_eq!(input.value(), "");
        press(&mut f, KeyCode::Esc);
        assert_eq!(f.state(), FormState::Aborted);
    }

    #[test]
    fn resume_focuses_confirm() {
        let mut f = form();
        f.begin_submit();
        f.resume();
        assert!(!f.is_submitting());
        assert_eq!(f.focus(), 3);
    }

    #[test]
    fn option_refresh_keeps_picks_missing_from_the_list() {
        let mut f = form();
        f.focus = 2;
        press(&mut f, KeyCode::Char(' '));
        press(&mut f, KeyCode::Down);
        press(&mut f, KeyCode::Char(' '));
        f.set_options("tags", vec![Choice::new("B", "b"), Choice::new("C", "c")]);
        assert_eq!(
            f.fields()[2].widget.value(),
            FieldValue::Choices(vec!["b".into(), "a".into()])
        );
    }

    #[test]
    fn picks_survive_an_empty_option_list() {
        let w = Widget::MultiSelect {
            options: Vec::new(),
            cursor: 0,
            picked: vec!["m-2".into(), "m-1".into()],
        };
        assert_eq!(
            w.value(),
            FieldValue::Choices(vec!["m-2".into(), "m-1".into()])
        );

        let mut w = w;
        w.replace_options(vec![Choice::new("one", "m-1"), Choice::new("two", "m-2")]);
        assert_eq!(
            w.value(),
            FieldValue::Choices(vec!["m-1".into(), "m-2".into()])
        );
    }
}
