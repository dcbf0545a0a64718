use serde::{Deserialize, Serialize};

/// One of the four colored pads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Green,
    Red,
    Yellow,
    Blue,
}

impl Symbol {
    /// The full alphabet, in pad order (top-left, top-right, bottom-left, bottom-right)
    pub const ALL: [Symbol; 4] = [Symbol::Green, Symbol::Red, Symbol::Yellow, Symbol::Blue];

    /// Position of this symbol in [`Symbol::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Symbol::Green => 0,
            Symbol::Red => 1,
            Symbol::Yellow => 2,
            Symbol::Blue => 3,
        }
    }

    /// Symbol at the given pad index, if any
    pub fn from_index(index: usize) -> Option<Symbol> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Green => "green",
            Symbol::Red => "red",
            Symbol::Yellow => "yellow",
            Symbol::Blue => "blue",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_alphabet_order() {
        for (i, symbol) in Symbol::ALL.iter().enumerate() {
            assert_eq!(symbol.index(), i);
            assert_eq!(Symbol::from_index(i), Some(*symbol));
        }
        assert_eq!(Symbol::from_index(4), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Symbol::Green.to_string(), "green");
        assert_eq!(Symbol::Blue.to_string(), "blue");
    }
}
