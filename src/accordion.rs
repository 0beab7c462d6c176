use std::collections::HashSet;

/// Open/closed flags for independent collapsible sections. Everything starts
/// closed, and opening one section never closes another.
#[derive(Debug, Clone, Default)]
pub struct AccordionState {
    open: HashSet<String>,
}

impl AccordionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, key: &str) -> bool {
        self.open.contains(key)
    }

    /// Flips one section and returns its new state.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.open.remove(key) {
            false
        } else {
            self.open.insert(key.to_string());
            true
        }
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

pub fn division_key(conference: &str, division: &str) -> String {
    format!("{conference} {division}")
}

#[cfg(test)]
mod tests {
    use super::{AccordionState, division_key};

    #[test]
    fn toggles_are_independent() {
        let mut state = AccordionState::new();
        let east = division_key("AFC", "East");
        let west = division_key("AFC", "West");

        assert!(!state.is_open(&east));
        assert!(state.toggle(&east));
        assert!(state.is_open(&east));
        assert!(!state.is_open(&west));

        assert!(state.toggle(&west));
        assert!(state.is_open(&east));

        assert!(!state.toggle(&east));
        assert!(!state.is_open(&east));
        assert!(state.is_open(&west));
        assert_eq!(state.open_count(), 1);
    }

    #[test]
    fn same_division_name_in_other_conference_is_separate() {
        let mut state = AccordionState::new();
        state.toggle(&division_key("AFC", "North"));
        assert!(!state.is_open(&division_key("NFC", "North")));
    }
}
