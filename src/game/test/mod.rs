//! Tests for the One Night Werewolf game engine, organized by topic.

#![cfg(test)]

pub mod integration;
pub mod role_assignment;
