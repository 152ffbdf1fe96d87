pub mod contacts;
pub mod lists;
pub mod projects;
pub mod seed;
