pub mod client;
pub mod editor;
pub mod posted_content;
pub mod project;
pub mod project_file;
