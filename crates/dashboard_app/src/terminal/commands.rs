/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text, appended to the URL input.
    Draft(String),
    Submit,
    /// Navigate to a trigger value, like opening `/dashboard?url=...`.
    Go(String),
    /// Navigate back in the trigger history.
    Prev,
    /// Open a list entry by its 1-based display position.
    Open(usize),
    Back,
    Reset,
    Clear,
    Login { email: String, password: String },
    Register { email: String, password: String },
    Logout,
    WhoAmI,
    Platforms,
    Help,
    Quit,
    Invalid(String),
}

pub const HELP: &[&str] = &[
    "Type or paste URLs (one per line, or comma separated), then :submit.",
    "  :submit              analyze the current input",
    "  :go <urls>           navigate to a dashboard link for <urls>",
    "  :prev                navigate back",
    "  :open <n>            open result <n> of a batch",
    "  :back                back to the results / input",
    "  :reset               start a new analysis",
    "  :clear               clear the input",
    "  :login <email> <pw>  sign in",
    "  :register <email> <pw>",
    "  :logout  :whoami  :platforms  :help  :quit",
];

pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Command::Draft(line.trim_end_matches(['\r', '\n']).to_string());
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match (name, args) {
        ("submit" | "s", "") => Command::Submit,
        ("go", urls) if !urls.is_empty() => Command::Go(urls.to_string()),
        ("go", _) => Command::Go(String::new()),
        ("prev", "") => Command::Prev,
        ("open" | "o", n) => match n.parse::<usize>() {
            Ok(position) if position > 0 => Command::Open(position),
            _ => Command::Invalid(format!("expected a result number, got {n:?}")),
        },
        ("back" | "b", "") => Command::Back,
        ("reset", "") => Command::Reset,
        ("clear", "") => Command::Clear,
        ("login", args) => credentials(args)
            .map(|(email, password)| Command::Login { email, password })
            .unwrap_or_else(|| Command::Invalid("usage: :login <email> <password>".into())),
        ("register", args) => credentials(args)
            .map(|(email, password)| Command::Register { email, password })
            .unwrap_or_else(|| Command::Invalid("usage: :register <email> <password>".into())),
        ("logout", "") => Command::Logout,
        ("whoami", "") => Command::WhoAmI,
        ("platforms", "") => Command::Platforms,
        ("help" | "h" | "?", _) => Command::Help,
        ("quit" | "q" | "exit", _) => Command::Quit,
        _ => Command::Invalid(format!("unknown command :{rest}")),
    }
}

fn credentials(args: &str) -> Option<(String, String)> {
    let mut parts = args.split_whitespace();
    let email = parts.next()?;
    let password = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((email.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_draft_text() {
        assert_eq!(
            parse_line("https://youtube.com/watch?v=abc\r\n"),
            Command::Draft("https://youtube.com/watch?v=abc".to_string())
        );
        assert_eq!(parse_line(""), Command::Draft(String::new()));
    }

    #[test]
    fn go_keeps_the_raw_trigger_value() {
        assert_eq!(
            parse_line(":go urlA, urlB"),
            Command::Go("urlA, urlB".to_string())
        );
        assert_eq!(parse_line(":go"), Command::Go(String::new()));
    }

    #[test]
    fn open_requires_positive_number() {
        assert_eq!(parse_line(":open 2"), Command::Open(2));
        assert!(matches!(parse_line(":open 0"), Command::Invalid(_)));
        assert!(matches!(parse_line(":open two"), Command::Invalid(_)));
    }

    #[test]
    fn login_needs_exactly_two_arguments() {
        assert_eq!(
            parse_line(":login ana@example.com s3cret"),
            Command::Login {
                email: "ana@example.com".to_string(),
                password: "s3cret".to_string(),
            }
        );
        assert!(matches!(parse_line(":login ana@example.com"), Command::Invalid(_)));
        assert!(matches!(parse_line(":register a b c"), Command::Invalid(_)));
    }

    #[test]
    fn short_aliases_and_unknown_commands() {
        assert_eq!(parse_line("  :s  "), Command::Submit);
        assert_eq!(parse_line(":q"), Command::Quit);
        assert_eq!(parse_line(":back"), Command::Back);
        assert!(matches!(parse_line(":dance"), Command::Invalid(_)));
        assert!(matches!(parse_line(":reset now"), Command::Invalid(_)));
    }
}
