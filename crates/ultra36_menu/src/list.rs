/// Fixed, ordered option labels for a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuList {
    items: Vec<String>,
}

impl MenuList {
    /// Build a list. Callers guarantee at least one item.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        debug_assert!(!items.is_empty(), "menu list needs at least one item");
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn label(&self, index: usize) -> &str {
        &self.items[index]
    }

    /// Item text as drawn: 1-based number, name, clipped to `width`.
    pub fn line(&self, index: usize, width: u8) -> String {
        let line = format!("{}. {}", index + 1, self.items[index]);
        line.chars().take(width as usize).collect()
    }
}

/// Cursor into a list, always in `0..count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    index: usize,
    count: usize,
}

impl Selection {
    pub fn new(count: usize) -> Self {
        Self {
            index: 0,
            count: count.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move towards the top, stopping at the first item.
    pub fn up(&mut self) -> bool {
        let before = self.index;
        self.index = self.index.saturating_sub(1);
        before != self.index
    }

    /// Move towards the bottom, stopping at the last item.
    pub fn down(&mut self) -> bool {
        let before = self.index;
        self.index = (self.index + 1).min(self.count - 1);
        before != self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_saturates_at_both_ends() {
        let mut selection = Selection::new(3);
        assert!(!selection.up());
        assert_eq!(selection.index(), 0);
        assert!(selection.down());
        assert!(selection.down());
        assert!(!selection.down());
        assert_eq!(selection.index(), 2);
        assert!(selection.up());
        assert_eq!(selection.index(), 1);
    }

    #[test]
    fn single_item_never_moves() {
        let mut selection = Selection::new(1);
        assert!(!selection.down());
        assert!(!selection.up());
        assert_eq!(selection.index(), 0);
    }

    #[test]
    fn lines_are_numbered_from_one_and_clipped() {
        let list = MenuList::new(["JiffyDOS", "Stock KERNAL"]);
        assert_eq!(list.line(0, 36), "1. JiffyDOS");
        assert_eq!(list.line(1, 8), "2. Stock");
    }
}
