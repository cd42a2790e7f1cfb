mod action;
mod dispatcher;

pub use {
    action::Action,
    dispatcher::{CommandDispatcher, CommandPublisher},
};
