use crate::models::mod_def::{ModDef, ModId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-collection configuration of one mod.
///
/// `selections` maps group names to a zero-based option index for single
/// groups and to a bit-per-option mask for multi groups.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ModSettings {
    pub enabled: bool,
    pub priority: i32,
    pub selections: BTreeMap<String, u32>,
}

impl ModSettings {
    /// Disabled, priority zero, first option of every group.
    pub fn default_for(def: &ModDef) -> Self {
        let mut settings = Self::default();
        settings.fix(def);
        settings
    }

    pub fn selection(&self, group: &str) -> u32 {
        self.selections.get(group).copied().unwrap_or(0)
    }

    /// Brings the selections in line with the mod's current groups.
    ///
    /// Missing groups get a zero entry, out-of-range values are clamped, and
    /// entries for groups the mod no longer has are dropped. Returns whether
    /// anything changed.
    pub fn fix(&mut self, def: &ModDef) -> bool {
        let before = self.selections.len();
        self.selections.retain(|name, _| def.group(name).is_some());
        let mut changed = self.selections.len() != before;

        for group in &def.groups {
            let entry = self.selections.entry(group.name.clone()).or_insert_with(|| {
                changed = true;
                0
            });
            let clamped = group.clamp_selection(*entry);
            if clamped != *entry {
                *entry = clamped;
                changed = true;
            }
        }
        changed
    }
}

/// Persisted state of a collection: `collection.toml`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CollectionSettings {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mods: BTreeMap<ModId, ModSettings>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mod_def::{GroupType, ModOption, OptionGroup};

    fn def() -> ModDef {
        ModDef::new("m", "/mods/m")
            .with_group(
                OptionGroup::new("Color", GroupType::Single)
                    .with_option(ModOption::new("Red"))
                    .with_option(ModOption::new("Blue")),
            )
            .unwrap()
            .with_group(
                OptionGroup::new("Extras", GroupType::Multi)
                    .with_option(ModOption::new("A"))
                    .with_option(ModOption::new("B")),
            )
            .unwrap()
    }

    #[test]
    fn test_default_for_creates_zero_entries() {
        let s = ModSettings::default_for(&def());
        assert!(!s.enabled);
        assert_eq!(s.priority, 0);
        assert_eq!(s.selection("Color"), 0);
        assert_eq!(s.selection("Extras"), 0);
        assert_eq!(s.selections.len(), 2);
    }

    #[test]
    fn test_fix_clamps_and_prunes() {
        let mut s = ModSettings::default();
        s.selections.insert("Color".into(), 5);
        s.selections.insert("Extras".into(), 0b111);
        s.selections.insert("Gone".into(), 1);

        assert!(s.fix(&def()));
        assert_eq!(s.selection("Color"), 1);
        assert_eq!(s.selection("Extras"), 0b11);
        assert!(!s.selections.contains_key("Gone"));
    }

    #[test]
    fn test_fix_is_idempotent() {
        let mut s = ModSettings::default();
        s.selections.insert("Color".into(), 9);
        s.fix(&def());
        let once = s.clone();
        assert!(!s.fix(&def()));
        assert_eq!(s, once);
    }

    #[test]
    fn test_toml_shape() {
        let mut settings = CollectionSettings {
            id: "c".into(),
            name: "Default".into(),
            ..Default::default()
        };
        settings.mods.insert(ModId::from("body"), ModSettings::default_for(&def()));
        let text = toml::to_string(&settings).unwrap();
        let back: CollectionSettings = toml::from_str(&text).unwrap();
        assert_eq!(back.mods[&ModId::from("body")], settings.mods[&ModId::from("body")]);
    }
}
