//! The reinstall confirmation prompt.

use std::io::{self, BufRead};

use verity_core::constants::AFFIRMATIVE_ANSWERS;

use crate::console::Console;

pub const REINSTALL_QUESTION: &str = "Would you like to reinstall these? [Y/n]: ";

/// Whether `answer` is one of the accepted "yes" forms. Empty is no.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    AFFIRMATIVE_ANSWERS.contains(&answer.as_str())
}

/// Print `question` and read one line. End of input counts as "no".
pub fn confirm(console: &Console, input: &mut impl BufRead, question: &str) -> io::Result<bool> {
    console.write(question);
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        console.line("");
        return Ok(false);
    }
    Ok(is_affirmative(&answer))
}
