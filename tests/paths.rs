use mod_overlay_lib::models::byte_string::ByteString;
use mod_overlay_lib::models::full_path::FullPath;
use mod_overlay_lib::models::game_path::GamePath;
use mod_overlay_lib::models::rel_path::RelPath;
use proptest::prelude::*;
use std::cmp::Ordering;

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-][A-Za-z0-9_.-]{0,11}"
}

fn rel_text() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..6).prop_map(|parts| parts.join("\\"))
}

proptest! {
    #[test]
    fn rel_to_game_and_back(text in rel_text()) {
        let rel = RelPath::from_text(&text).unwrap();
        let game = rel.to_game_path(0, false).unwrap();
        prop_assert_eq!(game.to_rel_path().unwrap(), rel.clone());

        let lowered = rel.to_game_path(0, true).unwrap().to_rel_path().unwrap();
        prop_assert!(lowered.eq_ignore_case(&rel));
    }

    #[test]
    fn skipping_folders_drops_leading_segments(parts in prop::collection::vec(segment(), 2..6)) {
        let rel = RelPath::from_text(&parts.join("\\")).unwrap();
        let game = rel.to_game_path(1, false).unwrap();
        prop_assert_eq!(game.to_string(), parts[1..].join("/"));
    }

    #[test]
    fn lowercase_equality_agrees(a in "[a-z/._]{0,16}", b in "[a-z/._]{0,16}") {
        let x = ByteString::from_text(&a, true).unwrap();
        let y = ByteString::from_text(&b, true).unwrap();
        prop_assert_eq!(x == y, x.eq_ignore_case(&y));
    }

    #[test]
    fn ignore_case_is_an_equivalence(a in "[a-zA-Z/]{0,12}", b in "[a-zA-Z/]{0,12}", c in "[a-zA-Z/]{0,12}") {
        let (x, y, z) = (
            ByteString::from_text(&a, false).unwrap(),
            ByteString::from_text(&b, false).unwrap(),
            ByteString::from_text(&c, false).unwrap(),
        );
        prop_assert!(x.eq_ignore_case(&x));
        prop_assert_eq!(x.eq_ignore_case(&y), y.eq_ignore_case(&x));
        if x.eq_ignore_case(&y) && y.eq_ignore_case(&z) {
            prop_assert!(x.eq_ignore_case(&z));
        }
        prop_assert_eq!(x.eq_ignore_case(&y), x.cmp_ignore_case(&y) == Ordering::Equal);
    }

    #[test]
    fn byte_order_matches_slices(a in prop::collection::vec(any::<u8>(), 0..16), b in prop::collection::vec(any::<u8>(), 0..16)) {
        let x = ByteString::from_vec(a.clone()).unwrap();
        let y = ByteString::from_vec(b.clone()).unwrap();
        prop_assert_eq!(x.cmp(&y), a.cmp(&b));
        prop_assert_eq!(x == y, a == b);
    }

    #[test]
    fn split_then_join_restores(text in "[a-c/]{0,20}") {
        let s = ByteString::from_text(&text, false).unwrap();
        let parts = s.split(b'/', None, true);
        prop_assert_eq!(ByteString::join(&parts, b'/').unwrap(), s);
    }

    #[test]
    fn full_path_equality_ignores_case(parts in prop::collection::vec("[A-Za-z]{1,8}", 1..4)) {
        let path = format!("/root/{}", parts.join("/"));
        let a = FullPath::new(path.clone()).unwrap();
        let b = FullPath::new(path.to_lowercase()).unwrap();
        prop_assert_eq!(a.hash64(), b.hash64());
        prop_assert_eq!(a, b);
    }
}

#[test]
fn test_empty_paths() {
    assert!(GamePath::empty().is_empty());
    assert!(RelPath::empty().is_empty());
    assert_eq!(FullPath::empty(), &FullPath::default());
    assert_eq!(GamePath::from_text("", true).unwrap(), *GamePath::empty());
}

#[test]
fn test_rejects_oversized_and_non_ascii() {
    assert!(GamePath::from_text(&"a".repeat(257), true).is_none());
    assert!(GamePath::from_text(&"a".repeat(256), true).is_some());
    assert!(RelPath::from_text(&"a".repeat(251)).is_none());
    assert!(GamePath::from_text("chara/\u{fc}.tex", true).is_none());
}

#[test]
fn test_full_path_relative_conversion() {
    let full = FullPath::new("/mods/m/Chara/Body.tex").unwrap();
    let base = camino::Utf8Path::new("/mods/m");
    assert_eq!(full.to_rel_path(base).unwrap().to_string(), "Chara\\Body.tex");
    assert_eq!(full.to_game_path(base, true).unwrap().to_string(), "chara/body.tex");
    assert!(full.to_rel_path(camino::Utf8Path::new("/elsewhere")).is_none());
}
