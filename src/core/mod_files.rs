use crate::models::byte_string::ByteString;
use crate::models::meta_edit::{MetaEdit, MetaEditId};
use crate::models::mod_def::{FileMap, ModDef};
use crate::models::settings::ModSettings;
use std::collections::{BTreeMap, BTreeSet};

/// Files one mod serves under the given settings, ignoring every other mod.
///
/// Always-active files come first, then the selected options of every group.
/// A file mentioned by any option of a group belongs to that group: when none
/// of the selected options lists it, it is not served at all, not even under
/// its own path. Remaining files of the mod are served under their own path.
/// Relative paths are matched without regard to case.
pub fn files_for_config(def: &ModDef, settings: &ModSettings) -> FileMap {
    let mut result = def.default_files.clone();
    let mut claimed: BTreeSet<ByteString<'_>> =
        def.default_files.keys().map(|rel| rel.to_lowercase()).collect();

    for group in def.groups.iter().filter(|g| !g.options.is_empty()) {
        let selected: BTreeSet<usize> = group
            .contributing(settings.selection(&group.name))
            .map(|(i, _)| i)
            .collect();

        for (i, option) in group.options.iter().enumerate() {
            for (rel, games) in &option.files {
                claimed.insert(rel.to_lowercase());
                if selected.contains(&i) {
                    result
                        .entry(rel.clone())
                        .or_default()
                        .extend(games.iter().cloned());
                }
            }
        }
    }

    for rel in &def.files {
        if claimed.contains(&rel.to_lowercase()) {
            continue;
        }
        match rel.to_game_path(0, true) {
            Some(game) => {
                result.entry(rel.clone()).or_default().insert(game);
            }
            None => tracing::debug!("{}: '{}' has no game path spelling", def.id, rel),
        }
    }

    result
}

/// Structured edits one mod applies under the given settings.
///
/// Later sources override earlier ones with the same identity: always-active
/// edits first, then selected options in group order.
pub fn edits_for_config(def: &ModDef, settings: &ModSettings) -> BTreeMap<MetaEditId, MetaEdit> {
    let mut result = BTreeMap::new();
    let selected = def.groups.iter().flat_map(|group| {
        group
            .contributing(settings.selection(&group.name))
            .flat_map(|(_, option)| option.edits.iter())
    });

    for edit in def.default_edits.iter().chain(selected) {
        result.insert(edit.id(), edit.clone());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game_path::GamePath;
    use crate::models::mod_def::{GroupType, ModOption, OptionGroup};
    use crate::models::rel_path::RelPath;
    use pretty_assertions::assert_eq;

    fn rel(s: &str) -> RelPath<'static> {
        RelPath::from_text(s).unwrap()
    }

    fn game(s: &str) -> GamePath<'static> {
        GamePath::from_text(s, true).unwrap()
    }

    fn paths(map: &FileMap) -> Vec<(String, Vec<String>)> {
        map.iter()
            .map(|(r, g)| (r.to_string(), g.iter().map(|p| p.to_string()).collect()))
            .collect()
    }

    fn variant_mod() -> ModDef {
        ModDef::new("variants", "/mods/variants")
            .with_group(
                OptionGroup::new("Variant", GroupType::Single)
                    .with_option(ModOption::new("O1").with_file(rel("f1"), game("g1")))
                    .with_option(ModOption::new("O2").with_file(rel("f1"), game("g2"))),
            )
            .unwrap()
            .with_file(rel("f1"))
    }

    #[test]
    fn test_single_group_selected_option() {
        let def = variant_mod();
        let mut settings = ModSettings::default_for(&def);
        settings.selections.insert("Variant".into(), 1);
        assert_eq!(
            paths(&files_for_config(&def, &settings)),
            vec![("f1".to_string(), vec!["g2".to_string()])]
        );
    }

    #[test]
    fn test_unselected_variant_is_not_served_under_own_name() {
        let def = variant_mod();
        let settings = ModSettings::default();
        let files = files_for_config(&def, &settings);
        assert_eq!(
            paths(&files),
            vec![("f1".to_string(), vec!["g1".to_string()])]
        );
        assert!(!files[&rel("f1")].contains(&game("f1")));
    }

    #[test]
    fn test_file_only_in_unselected_option_is_suppressed() {
        let def = ModDef::new("m", "/mods/m")
            .with_group(
                OptionGroup::new("Extras", GroupType::Multi)
                    .with_option(ModOption::new("A").with_file(rel("a.tex"), game("chara/a.tex")))
                    .with_option(ModOption::new("B").with_file(rel("b.tex"), game("chara/b.tex"))),
            )
            .unwrap()
            .with_file(rel("a.tex"))
            .with_file(rel("b.tex"))
            .with_file(rel("chara\\loose.tex"));
        let mut settings = ModSettings::default_for(&def);
        settings.selections.insert("Extras".into(), 0b01);

        assert_eq!(
            paths(&files_for_config(&def, &settings)),
            vec![
                ("a.tex".to_string(), vec!["chara/a.tex".to_string()]),
                ("chara\\loose.tex".to_string(), vec!["chara/loose.tex".to_string()]),
            ]
        );
    }

    #[test]
    fn test_claimed_file_matched_without_case() {
        let def = ModDef::new("m", "/mods/m")
            .with_group(
                OptionGroup::new("Variant", GroupType::Single)
                    .with_option(ModOption::new("Off"))
                    .with_option(
                        ModOption::new("On")
                            .with_file(rel("variant\\body.tex"), game("chara/body.tex")),
                    ),
            )
            .unwrap()
            .with_default_file(rel("Base\\Skin.tex"), game("chara/skin.tex"))
            .with_file(rel("Variant\\Body.tex"))
            .with_file(rel("base\\skin.tex"));

        let files = files_for_config(&def, &ModSettings::default_for(&def));
        assert_eq!(
            paths(&files),
            vec![("Base\\Skin.tex".to_string(), vec!["chara/skin.tex".to_string()])]
        );
    }

    #[test]
    fn test_multi_group_unions_targets() {
        let def = ModDef::new("m", "/mods/m")
            .with_group(
                OptionGroup::new("Slots", GroupType::Multi)
                    .with_option(ModOption::new("A").with_file(rel("x.tex"), game("a/x.tex")))
                    .with_option(ModOption::new("B").with_file(rel("x.tex"), game("b/x.tex"))),
            )
            .unwrap();
        let mut settings = ModSettings::default_for(&def);
        settings.selections.insert("Slots".into(), 0b11);

        assert_eq!(
            paths(&files_for_config(&def, &settings)),
            vec![(
                "x.tex".to_string(),
                vec!["a/x.tex".to_string(), "b/x.tex".to_string()]
            )]
        );
    }

    #[test]
    fn test_default_files_always_active() {
        let def = ModDef::new("m", "/mods/m")
            .with_default_file(rel("body.tex"), game("chara/body.tex"))
            .with_default_file(rel("body.tex"), game("chara/body_alias.tex"))
            .with_file(rel("body.tex"));
        let files = files_for_config(&def, &ModSettings::default());
        assert_eq!(files[&rel("body.tex")].len(), 2);
        assert!(!files[&rel("body.tex")].contains(&game("body.tex")));
    }

    #[test]
    fn test_edits_later_option_overrides_default() {
        let def = ModDef::new("m", "/mods/m")
            .with_default_edit(MetaEdit::Gmp { set_id: 1, entry: 1 })
            .with_default_edit(MetaEdit::Gmp { set_id: 2, entry: 1 })
            .with_group(
                OptionGroup::new("Hat", GroupType::Single)
                    .with_option(ModOption::new("Off"))
                    .with_option(
                        ModOption::new("On").with_edit(MetaEdit::Gmp { set_id: 1, entry: 7 }),
                    ),
            )
            .unwrap();

        let mut settings = ModSettings::default_for(&def);
        let edits = edits_for_config(&def, &settings);
        assert_eq!(edits[&MetaEditId::Gmp { set_id: 1 }], MetaEdit::Gmp { set_id: 1, entry: 1 });

        settings.selections.insert("Hat".into(), 1);
        let edits = edits_for_config(&def, &settings);
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[&MetaEditId::Gmp { set_id: 1 }], MetaEdit::Gmp { set_id: 1, entry: 7 });
    }
}
