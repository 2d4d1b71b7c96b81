pub mod collection;
pub mod mod_files;
pub mod mod_loader;
pub mod registry;
pub mod resolver;
