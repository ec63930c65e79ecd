use clap::Parser;

/// Define CLI arguments
#[derive(Parser)]
#[command(
    version,
    about = "Rewrite the child-resource URIs of an HLS playlist",
    long_about = "Fetches an HLS playlist (multivariant manifest or media playlist) and\n\
                  rewrites the URI of every referenced variant, alternate track, or\n\
                  segment: query parameters are appended, an optional base URL is\n\
                  prepended, named parameters are removed, and ../ traversal sequences\n\
                  can be stripped. The rewritten playlist is printed to stdout."
)]
pub struct CliArgs {
    /// Manifest to rewrite
    #[arg(
        required = true,
        help = "HTTP(S) URL or local file path of the playlist to rewrite"
    )]
    pub input: String,

    /// Query parameters appended to every item URI
    #[arg(
        short = 'p',
        long = "param",
        value_name = "KEY=VALUE",
        help = "Query parameter appended to every URI (repeatable, applied in order)"
    )]
    pub params: Vec<String>,

    /// Base URL prepended to every item URI
    #[arg(
        long,
        value_name = "URL",
        help = "Base URL prepended (literal concatenation) to every URI after the parameter merge"
    )]
    pub prepend: Option<String>,

    /// Parameter names stripped from every item URI
    #[arg(
        short = 'r',
        long = "remove",
        value_name = "NAME",
        help = "Query parameter name removed from every URI, all occurrences (repeatable)"
    )]
    pub remove: Vec<String>,

    /// Strip ../ traversal sequences from item URI paths
    #[arg(long, help = "Strip ../ traversal sequences from URI paths")]
    pub chroot: bool,

    /// HTTP request timeout in seconds
    #[arg(
        long,
        default_value = "30",
        help = "Timeout for the manifest request in seconds. Use 0 to disable."
    )]
    pub timeout: u64,

    /// Override the User-Agent header
    #[arg(long, help = "User-Agent header sent with the manifest request")]
    pub user_agent: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable detailed debug logging")]
    pub verbose: bool,
}
