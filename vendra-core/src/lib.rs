pub mod account;
pub mod analytics;
pub mod card;
pub mod order;
pub mod repository;
pub mod stock;
pub mod time;
pub mod user;

pub use account::{AccountAccess, NewSellerAccount, SellerAccount};
pub use card::ProductCard;
pub use order::OrderRecord;
pub use stock::StockSnapshot;
pub use user::{NewUser, User};
