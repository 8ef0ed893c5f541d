//! Entity views, request inputs and response bodies
//!
//! Entity views are what the primary store returns with relations loaded;
//! they are also the payloads serialized into the list cache.

pub mod category;
pub mod product;
pub mod requests;
pub mod responses;
pub mod user;

// Re-export commonly used types
pub use category::{Category, CategoryDetail, CategoryListing};
pub use product::{OwnedProduct, Product, ProductSummary, ProductWithoutUser, UserSummary};
pub use requests::{
    CreateCategory, CreateProduct, CreateUser, SearchQuery, UpdateCategory, UpdateProduct,
    UpdateUser,
};
pub use responses::{DeleteResponse, ErrorResponse, HealthResponse, StatsResponse};
pub use user::User;
