pub mod brands;
pub mod categories;
pub mod industries;
pub mod products;
pub mod slug;
pub mod subcategories;

pub use slug::slugify;
