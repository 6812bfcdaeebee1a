//! Per-panel modal state.

/// What a CRUD panel is currently showing on top of its table.
///
/// `F` is the panel's form buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ScreenState<F> {
    #[default]
    Idle,
    Creating(F),
    Editing {
        id: i64,
        form: F,
    },
    ConfirmingDelete {
        id: i64,
        label: String,
    },
}

/// Request produced when the user confirms a modal.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<F> {
    Create(F),
    Update(i64, F),
    Delete(i64),
}

impl<F: Clone> ScreenState<F> {
    pub fn create(&mut self, form: F) {
        *self = Self::Creating(form);
    }

    pub fn edit(&mut self, id: i64, form: F) {
        *self = Self::Editing { id, form };
    }

    pub fn confirm_delete(&mut self, id: i64, label: impl Into<String>) {
        *self = Self::ConfirmingDelete {
            id,
            label: label.into(),
        };
    }

    pub fn close(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Form being edited, if a create/edit modal is open.
    pub fn form_mut(&mut self) -> Option<&mut F> {
        match self {
            Self::Creating(form) | Self::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&F> {
        match self {
            Self::Creating(form) | Self::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// Build the submission for the open modal. The state is left as-is so
    /// the modal stays open until the backend answers.
    pub fn submission(&self) -> Option<Submission<F>> {
        match self {
            Self::Idle => None,
            Self::Creating(form) => Some(Submission::Create(form.clone())),
            Self::Editing { id, form } => Some(Submission::Update(*id, form.clone())),
            Self::ConfirmingDelete { id, .. } => Some(Submission::Delete(*id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Form {
        name: String,
    }

    #[test]
    fn test_default_is_idle() {
        let state: ScreenState<Form> = ScreenState::default();
        assert!(state.is_idle());
        assert!(state.submission().is_none());
    }

    #[test]
    fn test_create_then_submit() {
        let mut state = ScreenState::Idle;
        state.create(Form::default());
        state.form_mut().unwrap().name = "Metro".to_string();

        assert_eq!(
            state.submission(),
            Some(Submission::Create(Form {
                name: "Metro".to_string()
            }))
        );
        assert!(!state.is_editing());
    }

    #[test]
    fn test_edit_and_delete_submissions() {
        let mut state = ScreenState::Idle;
        state.edit(5, Form { name: "m²".to_string() });
        assert!(state.is_editing());
        assert!(matches!(state.submission(), Some(Submission::Update(5, _))));

        state.confirm_delete(5, "m²");
        assert!(state.form().is_none());
        assert_eq!(state.submission(), Some(Submission::Delete(5)));

        state.close();
        assert!(state.is_idle());
    }

    #[test]
    fn test_opening_one_modal_replaces_another() {
        let mut state = ScreenState::Idle;
        state.create(Form::default());
        state.confirm_delete(9, "X");
        assert!(matches!(state, ScreenState::ConfirmingDelete { id: 9, .. }));
    }
}
