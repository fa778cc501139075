mod forgot_password;
mod login;
mod logout;
mod refresh;
mod register;
mod reset_password;
mod verify_mfa;
mod verify_reset_code;

pub use forgot_password::{forgot_password, ForgotPasswordRequest};
pub use login::{login, LoginRequest, LoginResponse};
pub use logout::{logout, LogoutRequest};
pub use refresh::{refresh, RefreshRequest, RefreshResponse};
pub use register::{register, RegisterRequest};
pub use reset_password::{reset_password, ResetPasswordRequest};
pub use verify_mfa::{verify_mfa, VerifyMfaRequest, VerifyMfaResponse};
pub use verify_reset_code::{verify_reset_code, VerifyResetCodeRequest};
