// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind `jwt_auth_middleware`, which injects the
// acting user as `Extension<AuthUser>`.

pub mod todo;
