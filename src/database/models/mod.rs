pub mod admin_user;
pub mod brand;
pub mod category;
pub mod external_ref;
pub mod industry;
pub mod intake;
pub mod product;
pub mod subcategory;

pub use admin_user::AdminUser;
pub use brand::Brand;
pub use category::Category;
pub use external_ref::ExternalRef;
pub use industry::Industry;
pub use intake::{BoqRequest, ContactMessage, QuotationRequest};
pub use product::Product;
pub use subcategory::Subcategory;
