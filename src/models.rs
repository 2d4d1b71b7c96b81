pub mod byte_string;
pub mod conflict;
pub mod error;
pub mod full_path;
pub mod game_path;
pub mod meta_edit;
pub mod mod_def;
pub mod mod_dto;
pub mod paths;
pub mod rel_path;
pub mod settings;
