/// Navigation history of the `?url=` trigger.
///
/// The implicit first page has no trigger; going back past the first entry
/// lands there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerHistory {
    entries: Vec<Option<String>>,
}

impl TriggerHistory {
    pub fn current(&self) -> Option<&str> {
        self.entries.last().and_then(|entry| entry.as_deref())
    }

    /// Records a navigation; repeating the current value is not a new entry.
    pub fn push(&mut self, value: Option<String>) {
        if self.current() != value.as_deref() {
            self.entries.push(value);
        }
    }

    /// Steps back one entry and returns the trigger to navigate to, or
    /// `None` when already at the start.
    pub fn go_back(&mut self) -> Option<Option<String>> {
        self.entries.pop()?;
        Some(self.current().map(ToOwned::to_owned))
    }
}
