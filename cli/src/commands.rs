//! Line-oriented command parser for the interactive prompt.

use todoapp_core::Filter;

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(usize),
    Remove(usize),
    SetFilter(Filter),
    ToggleAll,
    ClearCompleted,
    Reload,
    List,
    Quit,
}

/// Parse one input line. Row numbers are 1-based, matching the rendered
/// list. An empty line just redraws.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "" | "ls" | "list" => Ok(Command::List),
        // The title may be empty; the controller decides what to do with it.
        "add" => Ok(Command::Add(rest.to_string())),
        "toggle" => parse_row(rest).map(Command::Toggle),
        "rm" | "remove" => parse_row(rest).map(Command::Remove),
        "all" => Ok(Command::SetFilter(Filter::All)),
        "active" => Ok(Command::SetFilter(Filter::Active)),
        "completed" => Ok(Command::SetFilter(Filter::Completed)),
        "toggle-all" => Ok(Command::ToggleAll),
        "clear" => Ok(Command::ClearCompleted),
        "reload" => Ok(Command::Reload),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command: {other} (try 'ls' or 'add <title>')")),
    }
}

fn parse_row(input: &str) -> Result<usize, String> {
    let row: usize = input
        .parse()
        .map_err(|_| format!("expected a row number, got {input:?}"))?;
    if row == 0 {
        return Err("row numbers start at 1".to_string());
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_the_rest_of_the_line_as_title() {
        assert_eq!(
            parse("add Buy milk and eggs"),
            Ok(Command::Add("Buy milk and eggs".to_string()))
        );
    }

    #[test]
    fn add_without_a_title_is_still_an_add() {
        assert_eq!(parse("add"), Ok(Command::Add(String::new())));
        assert_eq!(parse("add   "), Ok(Command::Add(String::new())));
    }

    #[test]
    fn row_commands_parse_numbers() {
        assert_eq!(parse("toggle 3"), Ok(Command::Toggle(3)));
        assert_eq!(parse("rm 1"), Ok(Command::Remove(1)));
        assert_eq!(parse("remove 2"), Ok(Command::Remove(2)));
    }

    #[test]
    fn row_zero_is_rejected() {
        assert!(parse("toggle 0").is_err());
    }

    #[test]
    fn missing_row_is_rejected() {
        assert!(parse("toggle").is_err());
        assert!(parse("rm one").is_err());
    }

    #[test]
    fn filter_words_map_to_filters() {
        assert_eq!(parse("all"), Ok(Command::SetFilter(Filter::All)));
        assert_eq!(parse("active"), Ok(Command::SetFilter(Filter::Active)));
        assert_eq!(parse("completed"), Ok(Command::SetFilter(Filter::Completed)));
    }

    #[test]
    fn bare_words_parse() {
        assert_eq!(parse("toggle-all"), Ok(Command::ToggleAll));
        assert_eq!(parse("clear"), Ok(Command::ClearCompleted));
        assert_eq!(parse("reload"), Ok(Command::Reload));
        assert_eq!(parse("ls"), Ok(Command::List));
        assert_eq!(parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn empty_line_redraws() {
        assert_eq!(parse(""), Ok(Command::List));
        assert_eq!(parse("   "), Ok(Command::List));
    }

    #[test]
    fn unknown_words_are_reported() {
        let err = parse("frobnicate").unwrap_err();
        assert!(err.contains("frobnicate"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse("  toggle 2  "), Ok(Command::Toggle(2)));
    }
}
