// ABOUTME: Library half of the taskmaster command-line client
// ABOUTME: Terminal rendering and edit helpers shared by the command handlers

pub mod edit;
pub mod output;
