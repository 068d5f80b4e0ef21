//! Built-in demo games implementing [`crate::game::GameEngine`].

pub mod tictactoe;
