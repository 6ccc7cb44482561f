//! # Messages
//!
//! Constant strings and format functions for user-facing replies.

pub const PONG: &str = "pong";

pub fn action(verb: &str, target: &str) -> String {
    format!("*{verb} {target}*")
}

pub fn mention_reply(bot: &str) -> String {
    format!("Hi! {bot} is here, try `!help`.")
}

pub fn best_pony(answer: &str) -> String {
    format!("Obviously the best pony is {answer}!")
}

pub fn worst_pony(answer: &str) -> String {
    format!("There is no worst pony, but if you insist: {answer}.")
}
