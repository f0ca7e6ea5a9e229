mod change_password;
mod login;
mod register;
mod service;

pub use change_password::ChangePasswordCommand;
pub use login::LoginUserCommand;
pub use register::RegisterAdminCommand;
pub use service::UserCommandService;
