//! Poll-choice editor for the compose form.

/// Editable list of poll options while the compose form is open.
///
/// Validation is deliberately asymmetric: submit is blocked iff slot 0 or
/// slot 1 is the empty string, whatever the state of slots 2 and beyond. Two
/// non-empty options are the minimum for a poll; extra slots may stay empty.
#[derive(Debug, Clone)]
pub struct PollComposer {
    choices: Vec<String>,
}

impl PollComposer {
    /// A fresh composer starts with the two mandatory, still-empty slots.
    pub fn new() -> Self {
        Self {
            choices: vec![String::new(), String::new()],
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Append one empty option slot.
    pub fn add_choice(&mut self) {
        self.choices.push(String::new());
    }

    /// Replace option `index`'s text. Returns false when the slot does not
    /// exist.
    pub fn edit_choice(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.choices.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Whether the submit control must be disabled.
    pub fn submit_disabled(&self) -> bool {
        let empty_at = |index: usize| {
            self.choices
                .get(index)
                .map(|choice| choice.is_empty())
                .unwrap_or(false)
        };
        empty_at(0) || empty_at(1)
    }
}

impl Default for PollComposer {
    fn default() -> Self {
        Self::new()
    }
}
