pub mod default_price;
pub mod fisherman_profile;
pub mod order;
pub mod planned_trip;
pub mod product;
pub mod slot;
pub mod subscription;
pub mod user;
