pub mod login;
pub mod users;
pub mod whoami;

pub use login::{handle_login, handle_logout};
pub use users::{handle_users_add, handle_users_list, handle_users_remove};
pub use whoami::handle_whoami;
