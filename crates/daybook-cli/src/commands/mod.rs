pub mod check;
pub mod dispatch;
pub mod history;
pub mod pull;
pub mod push;
pub mod shared;
pub mod update;
pub mod watch;
