// handlers/public/auth/mod.rs - Public authentication handlers
//
// Account creation and token acquisition. No token is required here.

pub mod login;
pub mod register;

pub use login::login;
pub use register::register;
