pub mod dispatch;
pub mod question;
pub mod respond;
pub mod shared;
pub mod survey;
