//! Matcher compiler: condition/value pairs → bits
//!
//! Every distinct `(condition, value)` pair used by a definition list gets one
//! bit, in list order. A definition matches a query when its mask is zero
//! (unconditional) or shares a bit with the query's mask. Tables are scoped to
//! one list; the same bit means different things in different lists.
//!
//! Values are compared by their text, so a selector holding `"true"` or `"2"`
//! matches a condition requiring `true` or `2`.

use crate::definition::{Matchers, MatcherValue, Selectors, StyleDefinitionList};
use std::collections::{HashMap, HashSet};
use tracing::warn;

pub type Mask = u64;

/// Number of distinct condition/value pairs one list can register
pub const MAX_MATCHER_BITS: usize = Mask::BITS as usize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitTable {
    /// condition name → value text → bit
    bits: HashMap<String, HashMap<String, Mask>>,
    /// Registered pairs in bit order
    order: Vec<(String, MatcherValue)>,
}

impl BitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign bits to every pair of every matcher set in `list`, in order
    pub fn build(list: &StyleDefinitionList) -> Self {
        let mut table = Self::new();
        for matchers in list.matchers() {
            for (name, value) in matchers.iter() {
                table.register(name, value);
            }
        }
        table
    }

    /// Rebuild a table from pairs listed in bit order
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, MatcherValue)>,
    {
        let mut table = Self::new();
        for (name, value) in pairs {
            table.register(&name, &value);
        }
        table
    }

    /// Mask with every registered bit set
    pub fn full_mask(&self) -> Mask {
        match self.order.len() {
            0 => 0,
            len if len >= MAX_MATCHER_BITS => Mask::MAX,
            len => ((1 as Mask) << len) - 1,
        }
    }

    /// Number of distinct pairs `list` would register
    pub fn count_pairs(list: &StyleDefinitionList) -> usize {
        let mut seen: HashMap<&str, HashSet<String>> = HashMap::new();
        let mut count = 0;
        for matchers in list.matchers() {
            for (name, value) in matchers.iter() {
                if seen.entry(name).or_default().insert(value.to_string()) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Bit of a pair, registering it with the next free bit if new.
    /// Returns `None` once every bit is taken.
    pub fn register(&mut self, name: &str, value: &MatcherValue) -> Option<Mask> {
        if let Some(bit) = self.bit(name, value) {
            return Some(bit);
        }

        if self.order.len() >= MAX_MATCHER_BITS {
            warn!(%name, %value, "No bits left for matcher condition");
            return None;
        }

        let bit: Mask = 1 << self.order.len();
        self.bits
            .entry(name.to_string())
            .or_default()
            .insert(value.to_string(), bit);
        self.order.push((name.to_string(), value.clone()));
        Some(bit)
    }

    pub fn bit(&self, name: &str, value: &MatcherValue) -> Option<Mask> {
        self.bits.get(name)?.get(&value.to_string()).copied()
    }

    /// Mask of a definition's matcher set; `None` (always active) is zero
    pub fn matchers_to_bits(&self, matchers: Option<&Matchers>) -> Mask {
        match matchers {
            Some(matchers) => self.pairs_to_mask(matchers.iter()),
            None => 0,
        }
    }

    /// Mask of a query's active selectors. Unknown pairs contribute nothing.
    pub fn selectors_to_mask(&self, selectors: &Selectors) -> Mask {
        self.pairs_to_mask(selectors.iter())
    }

    fn pairs_to_mask<'a>(&self, pairs: impl Iterator<Item = (&'a str, &'a MatcherValue)>) -> Mask {
        pairs.fold(0, |mask, (name, value)| mask | self.bit(name, value).unwrap_or(0))
    }

    /// Registered pairs with their bits, in bit order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &MatcherValue, Mask)> {
        self.order
            .iter()
            .enumerate()
            .map(|(i, (name, value))| (name.as_str(), value, (1 as Mask) << i))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Whether a definition with `mask` applies to a query with `selector_mask`
pub fn mask_matches(mask: Mask, selector_mask: Mask) -> bool {
    mask == 0 || mask & selector_mask != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{Conditions, StyleDefinition};
    use makestyles_css::StyleTree;

    fn list() -> StyleDefinitionList {
        vec![
            StyleDefinition::always(StyleTree::new()),
            StyleDefinition::when(Conditions::new().with("theme", "dark"), StyleTree::new()),
            StyleDefinition::when(
                Conditions::new().with("size", "small").with("primary", true),
                StyleTree::new(),
            ),
            StyleDefinition::when(Conditions::new().with("theme", "dark"), StyleTree::new()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_bits_follow_list_order() {
        let table = BitTable::build(&list());
        assert_eq!(table.len(), 3);
        assert_eq!(table.bit("theme", &"dark".into()), Some(1));
        assert_eq!(table.bit("size", &"small".into()), Some(2));
        assert_eq!(table.bit("primary", &true.into()), Some(4));
        assert_eq!(BitTable::count_pairs(&list()), 3);
    }

    #[test]
    fn test_matchers_to_bits() {
        let list = list();
        let table = BitTable::build(&list);
        let masks: Vec<Mask> = list
            .iter()
            .map(|d| table.matchers_to_bits(d.matchers.as_ref()))
            .collect();
        assert_eq!(masks, vec![0, 1, 6, 1]);
    }

    #[test]
    fn test_selectors_to_mask_ignores_unknown_pairs() {
        let table = BitTable::build(&list());
        let selectors = Conditions::new()
            .with("theme", "light")
            .with("primary", true)
            .with("unknown", 3);
        assert_eq!(table.selectors_to_mask(&selectors), 4);
        assert_eq!(table.selectors_to_mask(&Conditions::new()), 0);
    }

    #[test]
    fn test_mask_matching() {
        let table = BitTable::build(&list());
        let dark = table.selectors_to_mask(&Conditions::new().with("theme", "dark"));
        let light = table.selectors_to_mask(&Conditions::new().with("theme", "light"));

        assert!(mask_matches(1, dark));
        assert!(!mask_matches(1, light));
        assert!(mask_matches(0, light));
        // any shared condition is enough
        assert!(mask_matches(6, table.selectors_to_mask(&Conditions::new().with("size", "small"))));
    }

    #[test]
    fn test_from_pairs_rebuilds_table() {
        let table = BitTable::build(&list());
        let rebuilt = BitTable::from_pairs(
            table
                .entries()
                .map(|(name, value, _)| (name.to_string(), value.clone())),
        );
        assert_eq!(rebuilt, table);
        assert_eq!(rebuilt.full_mask(), 0b111);
        assert_eq!(BitTable::new().full_mask(), 0);
    }

    #[test]
    fn test_values_compare_by_text() {
        let mut table = BitTable::new();
        let bool_bit = table.register("primary", &true.into());
        let text_bit = table.register("primary", &"true".into());
        assert_eq!(text_bit, bool_bit);
        assert_eq!(table.len(), 1);

        let list: StyleDefinitionList = vec![
            StyleDefinition::when(Conditions::new().with("primary", true), StyleTree::new()),
            StyleDefinition::when(Conditions::new().with("level", 2), StyleTree::new()),
            StyleDefinition::when(Conditions::new().with("level", "2"), StyleTree::new()),
        ]
        .into_iter()
        .collect();
        let table = BitTable::build(&list);
        assert_eq!(BitTable::count_pairs(&list), 2);
        assert_eq!(
            table.selectors_to_mask(&Conditions::new().with("primary", "true").with("level", "2")),
            0b11
        );
        assert_eq!(table.selectors_to_mask(&Conditions::new().with("primary", "false")), 0);
    }

    #[test]
    fn test_register_stops_when_bits_run_out() {
        let mut table = BitTable::new();
        for i in 0..MAX_MATCHER_BITS {
            assert!(table.register("index", &(i as i64).into()).is_some());
        }
        assert_eq!(table.register("index", &(-1i64).into()), None);
        assert_eq!(table.register("index", &0i64.into()), Some(1));

        let (name, _, last) = table.entries().last().unwrap();
        assert_eq!(name, "index");
        assert_eq!(last, 1 << 63);
    }
}
