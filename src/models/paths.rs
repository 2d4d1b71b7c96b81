use camino::{Utf8Path, Utf8PathBuf};

macro_rules! define_paths {
    ($name:ident { $($field:ident : $default:expr),* $(,)? }) => {
        #[derive(Clone, Debug)]
        pub struct $name {
            $(pub $field: Utf8PathBuf,)*
        }

        impl $name {
            pub fn to_absolute(mut self, base: &Utf8Path) -> Self {
                $(self.$field = base.join(self.$field);)*
                self
            }

            pub fn new(base: &Utf8Path) -> Self {
                Self::default().to_absolute(base)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default.into(),)*
                }
            }
        }
    };
}

define_paths!(CollectionPaths {
    mods: "mods",
    settings: "collection.toml",
});

define_paths!(ModLayout {
    meta: "meta.json",
    default_option: "default_mod.json",
});

/// File names of option group documents start with this.
pub const GROUP_FILE_PREFIX: &str = "group_";

impl ModLayout {
    /// Whether `name`, a file directly in the mod root, describes the mod
    /// rather than being part of its content.
    pub fn is_definition_file(name: &str) -> bool {
        let layout = ModLayout::default();
        name == layout.meta || name == layout.default_option
            || (name.starts_with(GROUP_FILE_PREFIX) && name.ends_with(".json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_paths_are_joined() {
        let paths = CollectionPaths::new(Utf8Path::new("/data/default"));
        assert_eq!(paths.mods, Utf8PathBuf::from("/data/default/mods"));
        assert_eq!(paths.settings, Utf8PathBuf::from("/data/default/collection.toml"));
    }

    #[test]
    fn test_definition_files() {
        assert!(ModLayout::is_definition_file("meta.json"));
        assert!(ModLayout::is_definition_file("group_001_color.json"));
        assert!(!ModLayout::is_definition_file("group_notes.txt"));
        assert!(!ModLayout::is_definition_file("body.tex"));
    }
}
