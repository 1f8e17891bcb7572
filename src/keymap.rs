//! Keyboard layout of the 21 flame keys and their sound files.
//!
//! Each keyboard column is one element; the three rows of that column are
//! the outer flame, inner flame and flame core.

use std::fmt;
use std::path::{Path, PathBuf};

/// Flame-test element assigned to a keyboard column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    Li,
    Na,
    K,
    Ca,
    Sr,
    Ba,
    Cu,
}

impl Element {
    pub const ALL: [Element; 7] = [
        Element::Li,
        Element::Na,
        Element::K,
        Element::Ca,
        Element::Sr,
        Element::Ba,
        Element::Cu,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Element::Li => "Li",
            Element::Na => "Na",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Sr => "Sr",
            Element::Ba => "Ba",
            Element::Cu => "Cu",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Element> {
        Element::ALL
            .into_iter()
            .find(|e| e.symbol().eq_ignore_ascii_case(symbol))
    }

    /// Letters of this element's keyboard column, top row first
    fn column(self) -> [char; 3] {
        match self {
            Element::Li => ['Q', 'A', 'Z'],
            Element::Na => ['W', 'S', 'X'],
            Element::K => ['E', 'D', 'C'],
            Element::Ca => ['R', 'F', 'V'],
            Element::Sr => ['T', 'G', 'B'],
            Element::Ba => ['Y', 'H', 'N'],
            Element::Cu => ['U', 'J', 'M'],
        }
    }
}

/// Part of the flame a colour was sampled from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Zone {
    Outer,
    Inner,
    Core,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Outer, Zone::Inner, Zone::Core];

    pub fn name(self) -> &'static str {
        match self {
            Zone::Outer => "outer",
            Zone::Inner => "inner",
            Zone::Core => "core",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Zone::Outer => "Outer flame",
            Zone::Inner => "Inner flame",
            Zone::Core => "Flame core",
        }
    }

    fn row(self) -> usize {
        self as usize
    }
}

/// One of the 21 colour/sound keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlameKey {
    pub element: Element,
    pub zone: Zone,
}

impl FlameKey {
    /// All keys in layout order (column by column, outer to core)
    pub const ALL: [FlameKey; 21] = {
        let mut keys = [FlameKey {
            element: Element::Li,
            zone: Zone::Outer,
        }; 21];
        let mut i = 0;
        while i < 21 {
            keys[i] = FlameKey {
                element: Element::ALL[i / 3],
                zone: Zone::ALL[i % 3],
            };
            i += 1;
        }
        keys
    };

    pub fn new(element: Element, zone: Zone) -> Self {
        Self { element, zone }
    }

    /// Look up the key for a letter (case-insensitive)
    pub fn from_letter(letter: char) -> Option<FlameKey> {
        let letter = letter.to_ascii_uppercase();
        FlameKey::ALL.into_iter().find(|k| k.letter() == letter)
    }

    pub fn letter(self) -> char {
        self.element.column()[self.zone.row()]
    }

    /// Position in [`FlameKey::ALL`]
    pub fn index(self) -> usize {
        self.element as usize * 3 + self.zone.row()
    }
}

impl fmt::Display for FlameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {})",
            self.letter(),
            self.element.symbol(),
            self.zone.name()
        )
    }
}

/// Resolves flame keys to sound files inside an assets directory
#[derive(Debug, Clone)]
pub struct SoundLibrary {
    dir: PathBuf,
    template: String,
}

impl SoundLibrary {
    pub const DEFAULT_TEMPLATE: &'static str = "{element}_{zone}.wav";

    /// `template` may use the `{element}` and `{zone}` placeholders
    pub fn new(dir: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            template: template.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(&self, key: FlameKey) -> String {
        self.template
            .replace("{element}", key.element.symbol())
            .replace("{zone}", key.zone.name())
    }

    pub fn path_for(&self, key: FlameKey) -> PathBuf {
        self.dir.join(self.file_name(key))
    }
}

impl Default for SoundLibrary {
    fn default() -> Self {
        Self::new("sounds", Self::DEFAULT_TEMPLATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_layout() {
        let li_outer = FlameKey::from_letter('q').unwrap();
        assert_eq!(li_outer, FlameKey::new(Element::Li, Zone::Outer));

        let na_core = FlameKey::from_letter('X').unwrap();
        assert_eq!(na_core, FlameKey::new(Element::Na, Zone::Core));

        let cu_inner = FlameKey::from_letter('j').unwrap();
        assert_eq!(cu_inner, FlameKey::new(Element::Cu, Zone::Inner));

        assert_eq!(FlameKey::from_letter('P'), None);
        assert_eq!(FlameKey::from_letter('1'), None);
    }

    #[test]
    fn test_all_keys_are_distinct_and_indexed() {
        for (i, key) in FlameKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
            assert_eq!(FlameKey::from_letter(key.letter()), Some(*key));
        }

        let mut letters: Vec<char> = FlameKey::ALL.iter().map(|k| k.letter()).collect();
        letters.sort();
        letters.dedup();
        assert_eq!(letters.len(), 21);
    }

    #[test]
    fn test_sound_paths() {
        let key = FlameKey::new(Element::Sr, Zone::Core);

        let library = SoundLibrary::default();
        assert_eq!(library.path_for(key), PathBuf::from("sounds/Sr_core.wav"));

        let library = SoundLibrary::new("assets", "{element}_AW_flame_sound_{zone}.wav");
        assert_eq!(
            library.path_for(key),
            PathBuf::from("assets/Sr_AW_flame_sound_core.wav")
        );
    }

    #[test]
    fn test_element_symbols() {
        assert_eq!(Element::from_symbol("ba"), Some(Element::Ba));
        assert_eq!(Element::from_symbol("Xe"), None);
    }
}
