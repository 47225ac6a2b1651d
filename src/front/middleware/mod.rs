pub mod csrf_token;
pub mod logged_user;
