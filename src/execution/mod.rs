//! Order execution: validation, dispatch and the bot facade tying them to
//! one exchange handle.

pub mod bot;
pub mod dispatcher;
pub mod validator;

pub use bot::TradingBot;
pub use dispatcher::OrderDispatcher;
pub use validator::Validator;
