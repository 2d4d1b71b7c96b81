use mod_overlay_lib::core::resolver::{resolve, ModContribution};
use mod_overlay_lib::models::full_path::FullPath;
use mod_overlay_lib::models::game_path::GamePath;
use mod_overlay_lib::models::meta_edit::{MetaEdit, MetaEditId};
use mod_overlay_lib::models::mod_def::{GroupType, ModDef, ModId, ModOption, OptionGroup};
use mod_overlay_lib::models::rel_path::RelPath;
use mod_overlay_lib::models::settings::ModSettings;
use pretty_assertions::assert_eq;
use std::collections::HashMap;

fn game(s: &str) -> GamePath<'static> {
    GamePath::from_text(s, true).unwrap()
}

fn claim(id: &str, priority: i32, paths: &[&str]) -> ModContribution {
    let files: HashMap<_, _> = paths
        .iter()
        .map(|p| (game(p), FullPath::new(format!("/mods/{id}/{p}")).unwrap()))
        .collect();
    ModContribution {
        id: ModId::from(id),
        priority,
        files,
        edits: Vec::new(),
    }
}

#[test]
fn test_priority_decides_winner() {
    let res = resolve(vec![claim("m2", 5, &["p"]), claim("m1", 10, &["p"])]);
    assert_eq!(res.redirect(&game("p")).unwrap().owner, ModId::from("m1"));

    let m1 = res.conflicts().file_conflicts(&ModId::from("m1"));
    let m2 = res.conflicts().file_conflicts(&ModId::from("m2"));
    assert_eq!(m1.len(), 1);
    assert_eq!(m2.len(), 1);
    assert_eq!(m1[0].other, ModId::from("m2"));
    assert_eq!(m2[0].other, ModId::from("m1"));
    assert!(m1[0].resolved && m2[0].resolved);
    assert!(m1[0].won && !m2[0].won);
}

#[test]
fn test_tie_is_unresolved_and_stable() {
    let first = resolve(vec![claim("m1", 10, &["p"]), claim("m2", 10, &["p"])]);
    let owner = first.redirect(&game("p")).unwrap().owner.clone();
    assert!(first.conflicts().has_unresolved(&ModId::from("m1")));
    assert!(first.conflicts().has_unresolved(&ModId::from("m2")));

    for _ in 0..5 {
        let again = resolve(vec![claim("m2", 10, &["p"]), claim("m1", 10, &["p"])]);
        assert_eq!(again.redirect(&game("p")).unwrap().owner, owner);
    }
}

#[test]
fn test_uncontested_paths_pass_through() {
    let res = resolve(vec![
        claim("a", 0, &["chara/a.tex", "shared.tex"]),
        claim("b", 3, &["chara/b.tex", "shared.tex"]),
    ]);
    assert_eq!(res.redirect_count(), 3);
    assert_eq!(res.redirect(&game("chara/a.tex")).unwrap().owner, ModId::from("a"));
    assert_eq!(res.conflicts().file_count(), 2);

    let order: Vec<_> = res.sorted_redirects().iter().map(|(g, _)| g.to_string()).collect();
    assert_eq!(order, vec!["chara/a.tex", "chara/b.tex", "shared.tex"]);
}

#[test]
fn test_partitions_are_independent() {
    let mut a = claim("a", 1, &["p"]);
    a.edits.push(MetaEdit::Gmp { set_id: 1, entry: 1 });
    let mut b = claim("b", 2, &["p"]);
    b.edits.push(MetaEdit::Gmp { set_id: 1, entry: 2 });

    let mut res = resolve(vec![a, b]);
    assert_eq!(res.conflicts().file_count(), 2);
    assert_eq!(res.conflicts().edit_count(), 2);

    res.conflicts_mut().clear_files();
    assert_eq!(res.conflicts().file_count(), 0);
    assert_eq!(res.conflicts().edit_count(), 2);
    assert_eq!(
        res.conflicts().edit_conflicts(&ModId::from("a"))[0].artifact,
        MetaEditId::Gmp { set_id: 1 }
    );
}

#[test]
fn test_contribution_from_definition() {
    let def = ModDef::new("m", "/mods/m")
        .with_group(
            OptionGroup::new("Color", GroupType::Single)
                .with_option(ModOption::new("Red").with_file(
                    RelPath::from_text("red.tex").unwrap(),
                    game("chara/color.tex"),
                ))
                .with_option(
                    ModOption::new("Blue")
                        .with_file(RelPath::from_text("blue.tex").unwrap(), game("chara/color.tex"))
                        .with_edit(MetaEdit::Gmp { set_id: 4, entry: 9 }),
                ),
        )
        .unwrap()
        .with_file(RelPath::from_text("red.tex").unwrap())
        .with_file(RelPath::from_text("blue.tex").unwrap());

    let mut settings = ModSettings::default_for(&def);
    settings.enabled = true;
    settings.selections.insert("Color".into(), 1);

    let contribution = ModContribution::from_def(&def, &settings);
    assert_eq!(contribution.files.len(), 1);
    assert_eq!(
        contribution.files[&game("chara/color.tex")],
        FullPath::new("/mods/m/blue.tex").unwrap()
    );
    assert_eq!(contribution.edits, vec![MetaEdit::Gmp { set_id: 4, entry: 9 }]);
}

#[test]
fn test_same_file_from_two_paths_keeps_first() {
    let def = ModDef::new("m", "/mods/m")
        .with_default_file(RelPath::from_text("b.tex").unwrap(), game("chara/x.tex"))
        .with_default_file(RelPath::from_text("a.tex").unwrap(), game("chara/x.tex"));
    let contribution = ModContribution::from_def(&def, &ModSettings::default());
    assert_eq!(
        contribution.files[&game("chara/x.tex")],
        FullPath::new("/mods/m/a.tex").unwrap()
    );
}

#[test]
fn test_no_contributions() {
    let res = resolve(Vec::new());
    assert_eq!(res.redirect_count(), 0);
    assert_eq!(res.edit_count(), 0);
    assert!(res.conflicts().is_empty());
}
