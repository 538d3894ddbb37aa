pub const CMD_ANALYZE: &str = "analyze";
pub const CMD_KEYWORD: &str = "keyword";
pub const CMD_SET_URL: &str = "url";
pub const CMD_SET_KEYWORD: &str = "kw";
pub const CMD_HELP: &str = "help";
pub const CMD_QUIT: &str = "quit";

pub const HELP_TEXT: &str = "\
Commands:
  analyze [url]     start analyzing a stream (uses the current url if omitted)
  keyword [word]    rerun the last completed job for a keyword
  url <url>         set the stream url without starting
  kw <word>         set the keyword without starting
  help              show this text
  quit              exit";

/// Columns of a sparkline chart.
pub const SPARK_WIDTH: usize = 60;
/// Glyphs from lowest to highest bar.
pub const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
