//! dallebot — the second stage of a two-stage chat image bot.
//!
//! The first stage (out of scope here) answers the slash command within the
//! chat platform's response deadline and republishes the request as a job
//! message. This crate consumes that message: it transforms the prompt,
//! generates an image, re-hosts it on durable storage, and posts the result
//! back to the requesting channel — exactly once, success or failure.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod handler;
pub mod job;
pub mod manipulate;
pub mod notify;
pub mod store;
pub mod ui;
