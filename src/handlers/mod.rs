// Route handlers, one module per collection.
//
// All of these sit behind the bearer-auth middleware and receive the
// verified caller as an AuthUser extension.
pub mod recordings;
pub mod users;
