// SPDX-License-Identifier: MPL-2.0

mod dateparse;
mod timeparse;

pub use dateparse::parse_date;
pub use timeparse::parse_time;
