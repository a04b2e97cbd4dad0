// handlers/mod.rs - two security tiers
//
// Public (no auth): /register, /login
// Protected (JWT auth): /todo, /todo/:index
pub mod protected;
pub mod public;
