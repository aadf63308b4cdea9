//! Numbered menus

use colored::Colorize;
use tracing::debug;

use crate::console::Prompter;
use crate::error::PromptError;

/// Options for [`choose`]
#[derive(Debug, Clone, Default)]
pub struct MenuOptions {
    /// 0-based index picked when the user just presses Enter
    pub default: Option<usize>,
    /// Accept `q` to back out, returning `None`
    pub allow_quit: bool,
}

/// Turn 1-based user input into a 0-based index below `count`
pub fn parse_choice(input: &str, count: usize) -> Result<usize, PromptError> {
    let invalid = || PromptError::InvalidSelection {
        input: input.to_string(),
        max: count,
    };

    let n: usize = input.trim().parse().map_err(|_| invalid())?;
    if n == 0 || n > count {
        return Err(invalid());
    }
    Ok(n - 1)
}

/// Ask until a valid choice in `1..=count` is entered.
///
/// Invalid input is reported and asked again; it never escapes this loop.
pub fn choose(
    prompter: &mut dyn Prompter,
    prompt: &str,
    count: usize,
    options: &MenuOptions,
) -> Result<Option<usize>, PromptError> {
    loop {
        let input = prompter.read_line(prompt)?;
        let input = input.trim();

        if options.allow_quit && input.eq_ignore_ascii_case("q") {
            debug!("choose: quit");
            return Ok(None);
        }
        if input.is_empty()
            && let Some(default) = options.default
        {
            return Ok(Some(default));
        }

        match parse_choice(input, count) {
            Ok(index) => return Ok(Some(index)),
            Err(e) => {
                debug!(error = %e, "choose: invalid selection");
                let msg = format!("Please enter a number between 1 and {}", count);
                prompter.say(&msg.yellow().to_string())?;
            }
        }
    }
}
