//! Request payloads parsed from query strings.

pub mod modding_history;
