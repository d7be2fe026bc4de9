use super::Command;

const PHRASES: &[(&str, Command)] = &[
    ("next", Command::NextStep),
    ("next step", Command::NextStep),
    ("done", Command::NextStep),
    ("continue", Command::NextStep),
    ("back", Command::PrevStep),
    ("previous", Command::PrevStep),
    ("previous step", Command::PrevStep),
    ("go back", Command::PrevStep),
    ("pause", Command::Pause),
    ("wait", Command::Pause),
    ("hold on", Command::Pause),
    ("resume", Command::Resume),
    ("go on", Command::Resume),
    ("start", Command::Start),
    ("let's cook", Command::Start),
    ("lets cook", Command::Start),
    ("exit", Command::Exit),
    ("quit", Command::Exit),
    ("stop cooking", Command::Exit),
];

/// Map a recognized utterance to a command.
///
/// Matching is exact after lowercasing, dropping punctuation other than
/// apostrophes, collapsing whitespace and stripping a trailing "please".
pub fn parse_voice_command(text: &str) -> Option<Command> {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '\'' {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let words = match words.split_last() {
        Some((&"please", rest)) => rest,
        _ => &words[..],
    };
    let phrase = words.join(" ");

    PHRASES
        .iter()
        .find(|(p, _)| *p == phrase)
        .map(|(_, c)| *c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_phrases() {
        assert_eq!(parse_voice_command("Next"), Some(Command::NextStep));
        assert_eq!(parse_voice_command("  next   step! "), Some(Command::NextStep));
        assert_eq!(parse_voice_command("Go back, please"), Some(Command::PrevStep));
        assert_eq!(parse_voice_command("Let's cook"), Some(Command::Start));
        assert_eq!(parse_voice_command("hold on"), Some(Command::Pause));
        assert_eq!(parse_voice_command("stop cooking"), Some(Command::Exit));
    }

    #[test]
    fn ignores_chatter() {
        assert_eq!(parse_voice_command("how much salt"), None);
        assert_eq!(parse_voice_command(""), None);
        assert_eq!(parse_voice_command("please"), None);
    }
}
