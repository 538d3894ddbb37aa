use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use engine_logging::engine_warn;
use spikewatch_core::Msg;

use super::app::AppInput;
use super::ui::constants::*;

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Analyze(Option<String>),
    Keyword(Option<String>),
    SetUrl(String),
    SetKeyword(String),
    Help,
    Quit,
}

impl Command {
    /// The messages a command stands for. Help and quit are handled by the loop.
    pub fn into_msgs(self) -> Vec<Msg> {
        match self {
            Command::Analyze(url) => with_input(url.map(Msg::UrlInputChanged), Msg::AnalyzeClicked),
            Command::Keyword(word) => with_input(
                word.map(Msg::KeywordInputChanged),
                Msg::KeywordAnalyzeClicked,
            ),
            Command::SetUrl(url) => vec![Msg::UrlInputChanged(url)],
            Command::SetKeyword(word) => vec![Msg::KeywordInputChanged(word)],
            Command::Help | Command::Quit => Vec::new(),
        }
    }
}

fn with_input(input: Option<Msg>, click: Msg) -> Vec<Msg> {
    input.into_iter().chain(std::iter::once(click)).collect()
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub(crate) fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let argument = (!rest.is_empty()).then(|| rest.to_string());

    let command = match word {
        CMD_ANALYZE => Command::Analyze(argument),
        CMD_KEYWORD => Command::Keyword(argument),
        // Setting an empty value is allowed; validation happens on analyze.
        CMD_SET_URL => Command::SetUrl(rest.to_string()),
        CMD_SET_KEYWORD => Command::SetKeyword(rest.to_string()),
        CMD_HELP | "?" => Command::Help,
        CMD_QUIT | "exit" => Command::Quit,
        other => return Err(format!("Unknown command `{other}`. Type `help`.")),
    };
    Ok(Some(command))
}

/// Reads stdin on its own thread until EOF or `quit`.
pub(crate) fn spawn_stdin_reader(input_tx: mpsc::Sender<AppInput>) {
    let spawned = thread::Builder::new()
        .name("spikewatch-stdin".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        engine_warn!("Failed to read input: {}", err);
                        break;
                    }
                };
                let input = match parse_command(&line) {
                    Ok(Some(command)) => AppInput::Command(command),
                    Ok(None) => continue,
                    Err(message) => AppInput::Invalid(message),
                };
                if input_tx.send(input).is_err() {
                    return;
                }
            }
            let _ = input_tx.send(AppInput::InputClosed);
        });
    if let Err(err) = spawned {
        engine_warn!("Failed to start input reader: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn analyze_with_url_sets_input_then_clicks() {
        let command = parse_command("  analyze https://youtu.be/x  ").unwrap().unwrap();
        assert_eq!(command, Command::Analyze(Some("https://youtu.be/x".to_string())));
        assert_eq!(
            command.into_msgs(),
            vec![
                Msg::UrlInputChanged("https://youtu.be/x".to_string()),
                Msg::AnalyzeClicked,
            ]
        );
    }

    #[test]
    fn bare_commands_reuse_current_inputs() {
        assert_eq!(
            parse_command("keyword").unwrap().unwrap().into_msgs(),
            vec![Msg::KeywordAnalyzeClicked]
        );
        assert_eq!(
            parse_command("analyze").unwrap().unwrap().into_msgs(),
            vec![Msg::AnalyzeClicked]
        );
    }

    #[test]
    fn keyword_keeps_inner_spaces() {
        assert_eq!(
            parse_command("keyword  nice shot ").unwrap(),
            Some(Command::Keyword(Some("nice shot".to_string())))
        );
        assert_eq!(
            parse_command("kw").unwrap(),
            Some(Command::SetKeyword(String::new()))
        );
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(parse_command("launch").unwrap_err().contains("launch"));
        assert_eq!(parse_command("exit").unwrap(), Some(Command::Quit));
    }
}
