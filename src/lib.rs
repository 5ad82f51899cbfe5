// SPDX-License-Identifier: MPL-2.0

pub mod aggregate;
pub mod commands;
pub mod config;
pub mod days;
pub mod error;
pub mod locate;
pub mod parse;
pub mod print;
pub mod resolve;
pub mod stints;
