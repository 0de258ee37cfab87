pub mod content_root;
pub mod path_history;
