use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Indices of preview rows the user intends to commit. Knows nothing about
/// row validity; that is checked again at commit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSelection {
    indices: BTreeSet<usize>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything in `[0, n)`.
    pub fn all(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
        }
    }

    pub fn initialize(&mut self, n: usize) {
        self.indices = (0..n).collect();
    }

    pub fn toggle(&mut self, index: usize) {
        if !self.indices.remove(&index) {
            self.indices.insert(index);
        }
    }

    /// Clear when everything is selected, otherwise select `[0, total)`.
    pub fn toggle_all(&mut self, total: usize) {
        if self.indices.len() == total {
            self.indices.clear();
        } else {
            self.initialize(total);
        }
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}

impl FromIterator<usize> for RowSelection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_selects_every_row() {
        let mut selection = RowSelection::new();
        selection.initialize(4);
        assert_eq!(selection.len(), 4);
        assert_eq!(selection.indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);

        selection.initialize(2);
        assert_eq!(selection.indices().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn toggle_is_symmetric_difference() {
        let mut selection = RowSelection::all(3);
        selection.toggle(1);
        assert!(!selection.contains(1));
        assert_eq!(selection.len(), 2);
        selection.toggle(1);
        assert!(selection.contains(1));
        selection.toggle(7);
        assert!(selection.contains(7));
        assert_eq!(selection.len(), 4);
    }

    #[test]
    fn toggle_all_flips_between_all_and_none() {
        let mut selection = RowSelection::all(5);
        selection.toggle_all(5);
        assert!(selection.is_empty());
        selection.toggle_all(5);
        assert_eq!(selection.len(), 5);

        // Partial selection goes to "all", not "none".
        selection.toggle(2);
        selection.toggle_all(5);
        assert_eq!(selection.len(), 5);
    }

    #[test]
    fn toggle_all_on_empty_preview() {
        let mut selection = RowSelection::new();
        selection.toggle_all(0);
        assert!(selection.is_empty());
    }

    #[test]
    fn indices_are_ascending_regardless_of_insert_order() {
        let selection: RowSelection = [4, 0, 2].into_iter().collect();
        assert_eq!(selection.indices().collect::<Vec<_>>(), vec![0, 2, 4]);
    }
}
