pub mod contact;
pub mod custom_list;
pub mod project;
pub mod store;
