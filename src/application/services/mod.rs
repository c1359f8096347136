//! Application services

mod crud;
mod pos;
mod review;
mod user;

pub use crud::CrudService;
pub use pos::PosService;
pub use review::ReviewService;
pub use user::UserService;
