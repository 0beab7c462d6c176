/// Radio-style tab selection: exactly one tab is active at any time.
#[derive(Debug, Clone)]
pub struct TabSelection<T> {
    tabs: Vec<T>,
    active: usize,
}

impl<T: Copy + PartialEq> TabSelection<T> {
    /// `first` starts active. Duplicates in `others` are ignored.
    pub fn new(first: T, others: &[T]) -> Self {
        let mut tabs = vec![first];
        for tab in others {
            if !tabs.contains(tab) {
                tabs.push(*tab);
            }
        }
        Self { tabs, active: 0 }
    }

    pub fn tabs(&self) -> &[T] {
        &self.tabs
    }

    pub fn active(&self) -> T {
        self.tabs[self.active]
    }

    pub fn is_active(&self, tab: T) -> bool {
        self.active() == tab
    }

    /// Activates `tab` and deactivates every other one. Unknown tabs leave
    /// the selection untouched and return `false`.
    pub fn select(&mut self, tab: T) -> bool {
        match self.tabs.iter().position(|t| *t == tab) {
            Some(idx) => {
                self.active = idx;
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self) {
        self.active = (self.active + 1) % self.tabs.len();
    }

    pub fn select_prev(&mut self) {
        self.active = (self.active + self.tabs.len() - 1) % self.tabs.len();
    }
}
